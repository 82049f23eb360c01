//! Cardiology scores: stroke and bleeding risk in atrial fibrillation,
//! coronary syndromes and heart failure.

pub mod adhere;
pub mod atria_bleeding;
pub mod aub_has2;
pub mod cha2ds2_va;
pub mod cha2ds2_vasc;
pub mod chads2;
pub mod dapt;
pub mod duke_treadmill;
pub mod framingham_hf;
pub mod gillmore_staging;
pub mod grace_acs;
pub mod grogan_staging;
pub mod h2fpef;

use crate::catalog::{RegistryError, ScoreRegistryBuilder};

pub fn register(builder: &mut ScoreRegistryBuilder) -> Result<(), RegistryError> {
    builder
        .register(adhere::definition(), adhere::calculate)?
        .register(atria_bleeding::definition(), atria_bleeding::calculate)?
        .register(aub_has2::definition(), aub_has2::calculate)?
        .register(cha2ds2_va::definition(), cha2ds2_va::calculate)?
        .register(cha2ds2_vasc::definition(), cha2ds2_vasc::calculate)?
        .register(chads2::definition(), chads2::calculate)?
        .register(dapt::definition(), dapt::calculate)?
        .register(duke_treadmill::definition(), duke_treadmill::calculate)?
        .register(framingham_hf::definition(), framingham_hf::calculate)?
        .register(gillmore_staging::definition(), gillmore_staging::calculate)?
        .register(grace_acs::definition(), grace_acs::calculate)?
        .register(grogan_staging::definition(), grogan_staging::calculate)?
        .register(h2fpef::definition(), h2fpef::calculate)?;
    Ok(())
}

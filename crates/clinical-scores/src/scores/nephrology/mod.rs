pub mod ckd_epi_2021;

use crate::catalog::{RegistryError, ScoreRegistryBuilder};

pub fn register(builder: &mut ScoreRegistryBuilder) -> Result<(), RegistryError> {
    builder.register(ckd_epi_2021::definition(), ckd_epi_2021::calculate)?;
    Ok(())
}

pub mod curb_65;

use crate::catalog::{RegistryError, ScoreRegistryBuilder};

pub fn register(builder: &mut ScoreRegistryBuilder) -> Result<(), RegistryError> {
    builder.register(curb_65::definition(), curb_65::calculate)?;
    Ok(())
}

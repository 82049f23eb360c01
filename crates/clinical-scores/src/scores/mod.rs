//! Bundled score plug-ins. Each module exposes a `definition()` and a pure
//! `calculate()` that are registered together.

pub mod cardiology;
pub mod nephrology;
pub mod pulmonology;

use crate::catalog::{band_for, InputError, RegistryError, ScoreRegistryBuilder, StageBand};

/// Register every bundled score with `builder`.
pub fn register_all(builder: &mut ScoreRegistryBuilder) -> Result<(), RegistryError> {
    cardiology::register(builder)?;
    nephrology::register(builder)?;
    pulmonology::register(builder)?;
    Ok(())
}

/// Interpretation band holding `value`.
pub(crate) fn banded(bands: &'static [StageBand], value: f64) -> Result<&'static StageBand, InputError> {
    band_for(bands, value).ok_or(InputError::Unbanded { value })
}

/// Round half away from zero to `places` decimals.
pub(crate) fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10_f64.powi(places);
    // adding zero turns a rounded -0.0 into 0.0
    (value * factor).round() / factor + 0.0
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounding_is_half_away_from_zero() {
        assert_eq!(round_to(91.74, 1), 91.7);
        assert_eq!(round_to(-1.05, 0), -1.0);
        assert_eq!(round_to(2.25, 1), 2.3);
    }

    #[test]
    fn rounding_never_yields_negative_zero() {
        for value in [-0.04, -0.0, -0.000_01] {
            let rounded = round_to(value, 1);
            assert_eq!(rounded, 0.0);
            assert!(rounded.is_sign_positive(), "{value}");
        }
    }
}

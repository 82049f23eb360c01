//! Score catalog: declarative definitions, the frozen registry and the
//! dispatch pipeline that validates input, runs a score and checks its output.

pub mod batch;
pub mod definition;
pub mod dispatch;
pub mod error;
pub mod input;
pub mod outcome;
pub mod registry;
pub mod router;
pub mod validation;

#[cfg(test)]
mod tests;

pub use batch::{run_batch, BatchError, BatchReport, BatchRow, BatchRowView};
pub use definition::{
    band_for, InputField, InputKind, OutputField, OutputKind, ScoreCategory, ScoreDefinition,
    ScoreInfo, ScoreShape, StageBand, CORE_OUTPUTS,
};
pub use dispatch::CalculatorDispatcher;
pub use error::{
    DispatchError, ErrorBody, ErrorKind, FieldViolation, InputError, RegistryError,
    ValidationError,
};
pub use input::{FieldValue, ScoreInput};
pub use outcome::{ScoreOutcome, ScoreResult};
pub use registry::{RegistryEntry, ScoreFn, ScoreRegistry, ScoreRegistryBuilder};
pub use router::{catalog_router, ScoreQuery};
pub use validation::{validate_input, validate_output};

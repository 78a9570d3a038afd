pub mod constraints;
pub mod evaluator;
pub mod strategy;

pub use constraints::{ConstraintViolation, Constraints};
pub use evaluator::Evaluator;

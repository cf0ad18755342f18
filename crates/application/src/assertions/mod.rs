//! Assertion helpers.

mod evaluator;
mod eventually;

pub use evaluator::AssertionEvaluator;
pub use eventually::{Eventually, eventually};

//! Pure policy resolution and compliance checking (no IO).
//!
//! Input: an endpoint working set, a rule set, and an annotation inspector, all constructed
//! elsewhere.
//! Output: one verdict per endpoint, aggregated into [`results::ValidatedResults`].

#![forbid(unsafe_code)]

pub mod check;
pub mod discover;
pub mod engine;
pub mod error;
pub mod fingerprint;
pub mod inspect;
pub mod model;
pub mod resolve;
pub mod results;
pub mod rules;

#[cfg(test)]
mod proptest;
#[cfg(test)]
mod test_support;

pub use engine::Validator;
pub use error::{Error, FailureReport};

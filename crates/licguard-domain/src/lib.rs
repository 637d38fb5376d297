//! Pure license policy evaluation (no IO).
//!
//! Input: license/obligation/compatibility records and policies loaded elsewhere.
//! Output: compatibility verdicts, a policy decision, and an obligation checklist, each with lineage.

#![forbid(unsafe_code)]

pub mod compat;
pub mod error;
pub mod matcher;
pub mod model;
pub mod obligations;
pub mod policy;
pub mod registry;

mod engine;
mod fingerprint;

pub use engine::{BatchItem, Engine, EvaluationRequest};
pub use error::{EngineError, LoadError};
pub use fingerprint::fingerprint_for_request;
pub use registry::Registry;

#[cfg(test)]
mod test_support;

#[cfg(test)]
mod proptest;

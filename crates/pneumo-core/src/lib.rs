//! pneumo-core
//!
//! Shared vocabulary of the pneumology calculators: locale-independent number
//! formatting, the evaluation record every calculator produces, and the
//! bounded in-memory evaluation history.
//! No calculator logic lives here.

pub mod error;
pub mod format;
pub mod models;

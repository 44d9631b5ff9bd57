//! pneumo-cli library root.
//!
//! Config handling and session replay live here so that integration tests
//! can exercise them without going through the command line.

pub mod config;
pub mod session;

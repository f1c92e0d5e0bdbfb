//! Defaulting and plugin-registration engine for scheduler configuration.
//!
//! An operator hands the scheduler a partial configuration document. This
//! crate turns it into a fully populated one before validation runs:
//!
//! - **Scalar defaults**: parallelism, backoff, profiling, leader election and
//!   client connection settings are filled when unset
//! - **Plugin pipeline**: every profile's extension points are merged with the
//!   built-in plugin set
//! - **Plugin arguments**: every enabled plugin with a known argument kind
//!   receives a typed, defaulted arguments object
//!
//! The argument registry, the merge function and feature gates are
//! collaborators reached through [`DefaultingContext`]; in-tree
//! implementations are provided and each one can be substituted.

pub mod config;
pub mod errors;

pub use config::*;
pub use errors::DefaultingError;

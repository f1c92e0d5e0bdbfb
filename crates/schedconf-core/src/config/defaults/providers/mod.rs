//! In-tree collaborators for the defaulting pass
//!
//! These are the implementations a scheduler process uses when it does not
//! bring its own: the built-in plugin set, the standard merge function and a
//! static feature gate table.

pub mod builtin_plugins;
pub mod feature_gates;
pub mod merge;

pub use builtin_plugins::*;
pub use feature_gates::*;
pub use merge::*;

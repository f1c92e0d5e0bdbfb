//! Configuration module for the scheduler
//!
//! This module holds the configuration document model, the typed plugin
//! argument kinds, the YAML loader and the defaulting pass that completes a
//! partial document before it is validated.

pub mod args;
pub mod defaults;
pub mod duration;
pub mod loader;
pub mod types;

pub use args::*;
pub use defaults::*;
pub use loader::*;
pub use types::*;

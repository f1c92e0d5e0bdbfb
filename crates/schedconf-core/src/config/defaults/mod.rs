//! Defaulting pass for scheduler configuration
//!
//! The pass runs once per loaded configuration, after decoding and before
//! validation. It only fills unset fields and appends missing plugin args,
//! so running it again on its own output changes nothing.
//!
//! Collaborators (argument registry, merge function, feature gates, built-in
//! plugin set and the scalar defaults table) are bundled in a
//! [`DefaultingContext`]. [`DefaultingContext::standard`] wires the in-tree
//! implementations; each one can be replaced through the `with_*` methods.

pub mod plugins;
pub mod providers;
pub mod registry;
pub mod scalar;
pub mod traits;


pub use plugins::*;
pub use providers::*;
pub use registry::*;
pub use scalar::*;
pub use traits::*;

use crate::config::types::{Configuration, Plugins, Profile};
use crate::errors::DefaultingError;
use std::sync::Arc;

/// Collaborators and constants consulted by the defaulting pass.
#[derive(Clone)]
pub struct DefaultingContext {
    registry: Arc<ArgsRegistry>,
    feature_gate: Arc<dyn FeatureGate>,
    merger: Arc<dyn PluginMerger>,
    default_plugins: Plugins,
    defaults: SchedulerDefaults,
}

impl DefaultingContext {
    /// Context built from the in-tree registry, merge function and gates.
    pub fn standard() -> Self {
        Self {
            registry: Arc::new(ArgsRegistry::with_builtin_kinds()),
            feature_gate: Arc::new(StaticFeatureGate::new()),
            merger: Arc::new(StandardPluginMerger::new()),
            default_plugins: default_plugins(),
            defaults: SchedulerDefaults::STANDARD,
        }
    }

    pub fn with_registry(mut self, registry: Arc<ArgsRegistry>) -> Self {
        self.registry = registry;
        self
    }

    pub fn with_feature_gate<G: FeatureGate + 'static>(mut self, gate: G) -> Self {
        self.feature_gate = Arc::new(gate);
        self
    }

    pub fn with_merger<M: PluginMerger + 'static>(mut self, merger: M) -> Self {
        self.merger = Arc::new(merger);
        self
    }

    pub fn with_default_plugins(mut self, plugins: Plugins) -> Self {
        self.default_plugins = plugins;
        self
    }

    pub fn with_defaults(mut self, defaults: SchedulerDefaults) -> Self {
        self.defaults = defaults;
        self
    }

    pub fn registry(&self) -> &ArgsRegistry {
        &self.registry
    }

    pub fn feature_gate(&self) -> &dyn FeatureGate {
        self.feature_gate.as_ref()
    }

    pub fn merger(&self) -> &dyn PluginMerger {
        self.merger.as_ref()
    }

    pub fn default_plugins(&self) -> &Plugins {
        &self.default_plugins
    }

    pub fn defaults(&self) -> &SchedulerDefaults {
        &self.defaults
    }
}

impl Default for DefaultingContext {
    fn default() -> Self {
        Self::standard()
    }
}

impl std::fmt::Debug for DefaultingContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DefaultingContext")
            .field("registry", &self.registry.kinds())
            .field("defaults", &self.defaults)
            .finish_non_exhaustive()
    }
}

/// Fill every unset field of `config` in place.
///
/// The first profile whose plugin merge fails aborts the pass; the error is
/// returned as the merge function reported it.
pub fn set_defaults_configuration(
    config: &mut Configuration,
    ctx: &DefaultingContext,
) -> Result<(), DefaultingError> {
    let defaults = ctx.defaults();
    set_defaults_parallelism(config, defaults);

    if config.profiles.is_empty() {
        config.profiles.push(Profile::default());
    }
    // Only one profile can inherit the default name; validation rejects
    // unnamed profiles when there are several.
    if let [profile] = config.profiles.as_mut_slice() {
        profile
            .scheduler_name
            .get_or_insert_with(|| defaults.scheduler_name.to_string());
    }

    for profile in config.profiles.iter_mut() {
        set_defaults_profile(profile, ctx)?;
        log::debug!(
            "Defaulted profile {} with {} plugin configs",
            profile.display_name(),
            profile.plugin_config.len()
        );
    }

    set_defaults_scalars(config, defaults);
    Ok(())
}

/// Default a configuration with the in-tree collaborators.
pub fn default_configuration(mut config: Configuration) -> Result<Configuration, DefaultingError> {
    set_defaults_configuration(&mut config, &DefaultingContext::standard())?;
    Ok(config)
}

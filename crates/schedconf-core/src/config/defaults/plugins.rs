//! Plugin pipeline and plugin argument defaulting for a single profile

use super::registry::ArgsRegistry;
use super::traits::FeatureGate;
use super::DefaultingContext;
use crate::config::types::{ArgsKind, PluginArgs, PluginConfig, Plugins, Profile, TypedArgs};
use crate::errors::DefaultingError;
use log::debug;
use std::collections::{BTreeSet, HashSet};

/// Distinct names of every enabled plugin across all extension points.
pub fn plugin_names(plugins: Option<&Plugins>) -> BTreeSet<String> {
    plugins
        .map(|plugins| {
            plugins
                .iter()
                .flat_map(|(_, set)| set.enabled.iter().map(|plugin| plugin.name.clone()))
                .collect()
        })
        .unwrap_or_default()
}

/// Default explicit typed args in place, then append defaulted args for each
/// enabled plugin that has none. Opaque args are never touched. New entries
/// are appended in plugin name order.
pub fn complete_plugin_config(profile: &mut Profile, registry: &ArgsRegistry, gates: &dyn FeatureGate) {
    let mut existing = HashSet::new();
    for plugin_config in profile.plugin_config.iter_mut() {
        existing.insert(plugin_config.name.clone());
        if let PluginArgs::Typed(args) = &mut plugin_config.args {
            registry.default_args(args, gates);
        }
    }

    for name in plugin_names(profile.plugins.as_ref()) {
        if existing.contains(&name) {
            continue;
        }
        let kind = ArgsKind::for_plugin(&name);
        let Some(object) = registry.new_object(&kind) else {
            // Out-of-tree, or the plugin takes no configuration.
            debug!("No argument kind {} registered for plugin {}", kind, name);
            continue;
        };
        let mut args = TypedArgs { kind, object };
        registry.default_args(&mut args, gates);
        profile.plugin_config.push(PluginConfig {
            name,
            args: PluginArgs::Typed(args),
        });
    }
}

/// Merge the built-in plugin set into the profile, then complete its args.
pub fn set_defaults_profile(profile: &mut Profile, ctx: &DefaultingContext) -> Result<(), DefaultingError> {
    let merged = ctx
        .merger()
        .merge(ctx.default_plugins(), profile.plugins.as_ref())?;
    profile.plugins = Some(merged);
    complete_plugin_config(profile, ctx.registry(), ctx.feature_gate());
    Ok(())
}

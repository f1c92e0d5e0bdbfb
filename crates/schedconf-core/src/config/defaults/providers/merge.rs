//! Standard merge of the built-in plugin set with profile overrides

use crate::config::defaults::traits::PluginMerger;
use crate::config::types::{ExtensionPoint, Plugin, PluginSet, Plugins};
use crate::errors::DefaultingError;
use std::collections::{HashMap, HashSet};

/// Disabling this name at an extension point drops every default plugin there.
pub const ALL_PLUGINS: &str = "*";

/// Merges extension point by extension point.
///
/// Default plugins keep their order. A custom plugin with the same name as a
/// default replaces it in place; other custom plugins are appended in their
/// own order. When a custom name repeats, its first entry does the replacing
/// and the rest are appended, so merging a merged set changes nothing. The
/// custom disabled list becomes the merged disabled list so later stages can
/// tell which defaults were switched off.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardPluginMerger;

impl StandardPluginMerger {
    pub fn new() -> Self {
        Self
    }

    fn merge_plugin_set(point: ExtensionPoint, defaults: &PluginSet, custom: &PluginSet) -> PluginSet {
        let disabled: Vec<Plugin> = custom
            .disabled
            .iter()
            .map(|plugin| Plugin::new(plugin.name.clone()))
            .collect();
        let disabled_names: HashSet<&str> = custom.disabled.iter().map(|p| p.name.as_str()).collect();

        let mut custom_by_name: HashMap<&str, (usize, &Plugin)> = HashMap::new();
        for (index, plugin) in custom.enabled.iter().enumerate() {
            custom_by_name.entry(plugin.name.as_str()).or_insert((index, plugin));
        }
        let mut replaced = HashSet::new();

        let mut enabled = Vec::new();
        if !disabled_names.contains(ALL_PLUGINS) {
            for default_plugin in &defaults.enabled {
                if disabled_names.contains(default_plugin.name.as_str()) {
                    continue;
                }
                match custom_by_name.get(default_plugin.name.as_str()) {
                    Some((index, custom_plugin)) => {
                        log::info!(
                            "Default plugin {} is explicitly re-configured at {}; overriding",
                            default_plugin.name,
                            point
                        );
                        replaced.insert(*index);
                        enabled.push((*custom_plugin).clone());
                    }
                    None => enabled.push(default_plugin.clone()),
                }
            }
        }

        enabled.extend(
            custom
                .enabled
                .iter()
                .enumerate()
                .filter(|(index, _)| !replaced.contains(index))
                .map(|(_, plugin)| plugin.clone()),
        );

        PluginSet { enabled, disabled }
    }
}

impl PluginMerger for StandardPluginMerger {
    fn merge(
        &self,
        defaults: &Plugins,
        custom: Option<&Plugins>,
    ) -> Result<Plugins, DefaultingError> {
        let Some(custom) = custom else {
            return Ok(defaults.clone());
        };

        let mut merged = Plugins::default();
        for point in ExtensionPoint::ALL {
            *merged.plugin_set_mut(point) =
                Self::merge_plugin_set(point, defaults.plugin_set(point), custom.plugin_set(point));
        }
        Ok(merged)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::defaults::providers::default_plugins;

    fn names(set: &PluginSet) -> Vec<&str> {
        set.enabled.iter().map(|p| p.name.as_str()).collect()
    }

    fn defaults() -> Plugins {
        Plugins {
            filter: PluginSet {
                enabled: vec![Plugin::new("A"), Plugin::new("B"), Plugin::new("C")],
                disabled: Vec::new(),
            },
            score: PluginSet {
                enabled: vec![Plugin::weighted("S", 1)],
                disabled: Vec::new(),
            },
            ..Default::default()
        }
    }

    #[test]
    fn test_absent_custom_yields_defaults() {
        let merged = StandardPluginMerger.merge(&defaults(), None).unwrap();
        assert_eq!(merged, defaults());
    }

    #[test]
    fn test_disable_and_append() {
        let custom = Plugins {
            filter: PluginSet {
                enabled: vec![Plugin::new("X")],
                disabled: vec![Plugin::new("B")],
            },
            ..Default::default()
        };
        let merged = StandardPluginMerger.merge(&defaults(), Some(&custom)).unwrap();
        assert_eq!(names(&merged.filter), vec!["A", "C", "X"]);
        assert_eq!(merged.filter.disabled, vec![Plugin::new("B")]);
        assert_eq!(names(&merged.score), vec!["S"]);
    }

    #[test]
    fn test_reconfigured_default_keeps_position() {
        let custom = Plugins {
            score: PluginSet {
                enabled: vec![Plugin::weighted("T", 2), Plugin::weighted("S", 5)],
                disabled: Vec::new(),
            },
            ..Default::default()
        };
        let merged = StandardPluginMerger.merge(&defaults(), Some(&custom)).unwrap();
        assert_eq!(
            merged.score.enabled,
            vec![Plugin::weighted("S", 5), Plugin::weighted("T", 2)]
        );
    }

    #[test]
    fn test_wildcard_disables_all_defaults() {
        let custom = Plugins {
            filter: PluginSet {
                enabled: vec![Plugin::new("B")],
                disabled: vec![Plugin::new(ALL_PLUGINS)],
            },
            ..Default::default()
        };
        let merged = StandardPluginMerger.merge(&defaults(), Some(&custom)).unwrap();
        assert_eq!(names(&merged.filter), vec!["B"]);
    }

    #[test]
    fn test_repeated_custom_name_first_entry_replaces() {
        let custom = Plugins {
            score: PluginSet {
                enabled: vec![Plugin::weighted("S", 3), Plugin::weighted("S", 9)],
                disabled: Vec::new(),
            },
            ..Default::default()
        };
        let merger = StandardPluginMerger::new();
        let once = merger.merge(&defaults(), Some(&custom)).unwrap();
        assert_eq!(
            once.score.enabled,
            vec![Plugin::weighted("S", 3), Plugin::weighted("S", 9)]
        );
        let twice = merger.merge(&defaults(), Some(&once)).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_merge_is_idempotent() {
        let custom = Plugins {
            multi_point: PluginSet {
                enabled: vec![Plugin::weighted("ImageLocality", 7), Plugin::new("Coscheduling")],
                disabled: vec![Plugin::new("NodePorts")],
            },
            ..Default::default()
        };
        let merger = StandardPluginMerger::new();
        let once = merger.merge(&default_plugins(), Some(&custom)).unwrap();
        let twice = merger.merge(&default_plugins(), Some(&once)).unwrap();
        assert_eq!(once, twice);
        assert!(!names(&once.multi_point).contains(&"NodePorts"));
        assert!(names(&once.multi_point).contains(&"Coscheduling"));
    }
}

//! Argument type registry
//!
//! Maps an argument kind name (`<PluginName>Args`) to the three capabilities
//! the defaulting pass needs: build a zero value, fill its defaults, and
//! decode it from a raw document. The set of kinds is explicit; out-of-tree
//! plugins add theirs with [`ArgsRegistry::register`] before the registry is
//! shared. After that it is read-only and safe to share across threads.

use super::traits::FeatureGate;
use crate::config::args::*;
use crate::config::types::{ArgsKind, PluginArgs, Profile, TypedArgs};
use crate::errors::DefaultingError;
use log::{debug, warn};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::sync::Arc;

pub type ArgsFactory = Arc<dyn Fn() -> ArgsObject + Send + Sync>;
pub type ArgsDefaulter = Arc<dyn Fn(&mut ArgsObject, &dyn FeatureGate) + Send + Sync>;
/// Decoders report a plain message; the registry attaches the kind.
pub type ArgsDecoder = Arc<dyn Fn(Value) -> Result<ArgsObject, String> + Send + Sync>;

/// Capabilities registered for one argument kind.
#[derive(Clone)]
pub struct ArgsKindEntry {
    factory: ArgsFactory,
    defaulter: ArgsDefaulter,
    decoder: ArgsDecoder,
}

impl ArgsKindEntry {
    pub fn new(factory: ArgsFactory, defaulter: ArgsDefaulter, decoder: ArgsDecoder) -> Self {
        Self {
            factory,
            defaulter,
            decoder,
        }
    }

    /// Entry for an out-of-tree kind whose arguments stay a JSON object.
    pub fn extension<F>(defaulter: F) -> Self
    where
        F: Fn(&mut Map<String, Value>, &dyn FeatureGate) + Send + Sync + 'static,
    {
        Self {
            factory: Arc::new(|| ArgsObject::Extension(Map::new())),
            defaulter: Arc::new(move |object: &mut ArgsObject, gates: &dyn FeatureGate| {
                if let ArgsObject::Extension(map) = object {
                    defaulter(map, gates);
                }
            }),
            decoder: Arc::new(|value: Value| match value {
                Value::Object(map) => Ok(ArgsObject::Extension(map)),
                other => Err(format!("expected an object, found {}", other)),
            }),
        }
    }

    /// Entry for an in-tree structure.
    fn builtin<T>(
        wrap: fn(T) -> ArgsObject,
        unwrap: fn(&mut ArgsObject) -> Option<&mut T>,
        set_defaults: fn(&mut T, &dyn FeatureGate),
    ) -> Self
    where
        T: Default + DeserializeOwned + 'static,
    {
        Self {
            factory: Arc::new(move || wrap(T::default())),
            defaulter: Arc::new(move |object: &mut ArgsObject, gates: &dyn FeatureGate| {
                if let Some(args) = unwrap(object) {
                    set_defaults(args, gates);
                }
            }),
            decoder: Arc::new(move |value: Value| {
                serde_json::from_value::<T>(value)
                    .map(wrap)
                    .map_err(|e| e.to_string())
            }),
        }
    }
}

impl std::fmt::Debug for ArgsKindEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArgsKindEntry").finish_non_exhaustive()
    }
}

#[derive(Debug, Clone, Default)]
pub struct ArgsRegistry {
    kinds: HashMap<ArgsKind, ArgsKindEntry>,
}

impl ArgsRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            kinds: HashMap::new(),
        }
    }

    /// Registry holding every in-tree argument kind.
    pub fn with_builtin_kinds() -> Self {
        let mut registry = Self::new();
        registry.register(
            ArgsKind::new("DefaultPreemptionArgs"),
            ArgsKindEntry::builtin(
                ArgsObject::DefaultPreemption,
                |o| match o {
                    ArgsObject::DefaultPreemption(args) => Some(args),
                    _ => None,
                },
                |args, _| set_defaults_default_preemption_args(args),
            ),
        );
        registry.register(
            ArgsKind::new("InterPodAffinityArgs"),
            ArgsKindEntry::builtin(
                ArgsObject::InterPodAffinity,
                |o| match o {
                    ArgsObject::InterPodAffinity(args) => Some(args),
                    _ => None,
                },
                |args, _| set_defaults_inter_pod_affinity_args(args),
            ),
        );
        registry.register(
            ArgsKind::new("NodeAffinityArgs"),
            ArgsKindEntry::builtin(
                ArgsObject::NodeAffinity,
                |o| match o {
                    ArgsObject::NodeAffinity(args) => Some(args),
                    _ => None,
                },
                |_: &mut NodeAffinityArgs, _| {},
            ),
        );
        registry.register(
            ArgsKind::new("NodeResourcesBalancedAllocationArgs"),
            ArgsKindEntry::builtin(
                ArgsObject::NodeResourcesBalancedAllocation,
                |o| match o {
                    ArgsObject::NodeResourcesBalancedAllocation(args) => Some(args),
                    _ => None,
                },
                |args, _| set_defaults_node_resources_balanced_allocation_args(args),
            ),
        );
        registry.register(
            ArgsKind::new("NodeResourcesFitArgs"),
            ArgsKindEntry::builtin(
                ArgsObject::NodeResourcesFit,
                |o| match o {
                    ArgsObject::NodeResourcesFit(args) => Some(args),
                    _ => None,
                },
                |args, _| set_defaults_node_resources_fit_args(args),
            ),
        );
        registry.register(
            ArgsKind::new("PodTopologySpreadArgs"),
            ArgsKindEntry::builtin(
                ArgsObject::PodTopologySpread,
                |o| match o {
                    ArgsObject::PodTopologySpread(args) => Some(args),
                    _ => None,
                },
                |args, _| set_defaults_pod_topology_spread_args(args),
            ),
        );
        registry.register(
            ArgsKind::new("VolumeBindingArgs"),
            ArgsKindEntry::builtin(
                ArgsObject::VolumeBinding,
                |o| match o {
                    ArgsObject::VolumeBinding(args) => Some(args),
                    _ => None,
                },
                set_defaults_volume_binding_args,
            ),
        );
        registry
    }

    /// Register a kind, replacing any previous entry under the same name.
    pub fn register(&mut self, kind: ArgsKind, entry: ArgsKindEntry) {
        debug!("Registering plugin argument kind {}", kind);
        self.kinds.insert(kind, entry);
    }

    pub fn contains(&self, kind: &ArgsKind) -> bool {
        self.kinds.contains_key(kind)
    }

    /// Registered kind names, sorted.
    pub fn kinds(&self) -> Vec<&str> {
        let mut kinds: Vec<&str> = self.kinds.keys().map(ArgsKind::as_str).collect();
        kinds.sort_unstable();
        kinds
    }

    /// Zero value for `kind`, or `None` when the kind is unknown.
    pub fn new_object(&self, kind: &ArgsKind) -> Option<ArgsObject> {
        self.kinds.get(kind).map(|entry| (entry.factory)())
    }

    /// Fill defaults of a typed arguments object in place.
    pub fn default_args(&self, args: &mut TypedArgs, gates: &dyn FeatureGate) {
        match self.kinds.get(&args.kind) {
            Some(entry) => (entry.defaulter)(&mut args.object, gates),
            None => debug!("No default-filler registered for {}", args.kind),
        }
    }

    pub fn decode(&self, kind: &ArgsKind, value: Value) -> Result<ArgsObject, DefaultingError> {
        let entry = self
            .kinds
            .get(kind)
            .ok_or_else(|| DefaultingError::Registry(format!("unknown argument kind {}", kind)))?;
        let value = match value {
            Value::Null => Value::Object(Map::new()),
            Value::Object(mut map) => {
                map.remove("apiVersion");
                map.remove("kind");
                Value::Object(map)
            }
            other => other,
        };
        (entry.decoder)(value).map_err(|message| DefaultingError::Decode {
            kind: kind.to_string(),
            message,
        })
    }

    /// Lift opaque arguments of known kinds to their typed form.
    ///
    /// Blobs that fail to decode, or that name a different kind than the
    /// plugin implies, stay opaque for validation to report.
    pub fn decode_profile_args(&self, profile: &mut Profile) {
        for plugin_config in profile.plugin_config.iter_mut() {
            let PluginArgs::Opaque(value) = &plugin_config.args else {
                continue;
            };
            let kind = ArgsKind::for_plugin(&plugin_config.name);
            if !self.contains(&kind) {
                continue;
            }
            if let Some(declared) = value.get("kind").and_then(Value::as_str) {
                if declared != kind.as_str() {
                    warn!(
                        "Plugin {} declares args kind {}, expected {}; leaving args undecoded",
                        plugin_config.name, declared, kind
                    );
                    continue;
                }
            }
            match self.decode(&kind, value.clone()) {
                Ok(object) => plugin_config.args = PluginArgs::typed(kind, object),
                Err(e) => warn!("Leaving args of plugin {} undecoded: {}", plugin_config.name, e),
            }
        }
    }
}

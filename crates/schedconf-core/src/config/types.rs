//! Configuration type definitions for the scheduler
//!
//! These types mirror the operator-facing configuration document. Every
//! optional setting is modeled so that "unset" is distinguishable from an
//! explicit value, which is what lets the defaulting pass fill gaps without
//! overwriting operator choices. Wire names are camelCase.

use crate::config::args::ArgsObject;
use crate::config::duration;
use crate::errors::DefaultingError;
use serde::ser::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::fmt;
use std::time::Duration;

/// API group/version stamped on configuration documents and typed args.
pub const API_VERSION: &str = "kubescheduler.config.k8s.io/v1";

/// Kind of the top-level configuration document.
pub const CONFIGURATION_KIND: &str = "KubeSchedulerConfiguration";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Configuration {
    #[serde(default = "default_api_version")]
    pub api_version: String,
    #[serde(default = "default_kind")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parallelism: Option<i32>,
    #[serde(default)]
    pub leader_election: LeaderElectionConfiguration,
    #[serde(default)]
    pub client_connection: ClientConnectionConfiguration,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub percentage_of_nodes_to_score: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pod_initial_backoff_seconds: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pod_max_backoff_seconds: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enable_profiling: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enable_contention_profiling: Option<bool>,
    #[serde(default)]
    pub profiles: Vec<Profile>,
}

fn default_api_version() -> String {
    API_VERSION.to_string()
}

fn default_kind() -> String {
    CONFIGURATION_KIND.to_string()
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            api_version: default_api_version(),
            kind: default_kind(),
            parallelism: None,
            leader_election: LeaderElectionConfiguration::default(),
            client_connection: ClientConnectionConfiguration::default(),
            percentage_of_nodes_to_score: None,
            pod_initial_backoff_seconds: None,
            pod_max_backoff_seconds: None,
            enable_profiling: None,
            enable_contention_profiling: None,
            profiles: Vec::new(),
        }
    }
}

/// Leader election settings. Empty strings and `None` mean "unset".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderElectionConfiguration {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub leader_elect: Option<bool>,
    #[serde(
        default,
        with = "duration::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub lease_duration: Option<Duration>,
    #[serde(
        default,
        with = "duration::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub renew_deadline: Option<Duration>,
    #[serde(
        default,
        with = "duration::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub retry_period: Option<Duration>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub resource_lock: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub resource_name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub resource_namespace: String,
}

/// API server client settings. Zero numbers and empty strings mean "unset".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientConnectionConfiguration {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub kubeconfig: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub accept_content_types: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub content_type: String,
    #[serde(default)]
    pub qps: f32,
    #[serde(default)]
    pub burst: i32,
}

/// A named scheduling pipeline run by the scheduler process.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheduler_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plugins: Option<Plugins>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub plugin_config: Vec<PluginConfig>,
}

impl Profile {
    /// Name used in log lines and error messages.
    pub fn display_name(&self) -> &str {
        self.scheduler_name.as_deref().unwrap_or("<unnamed>")
    }

    pub fn plugin_config(&self, name: &str) -> Option<&PluginConfig> {
        self.plugin_config.iter().find(|pc| pc.name == name)
    }
}

/// Extension points of the scheduling pipeline, in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ExtensionPoint {
    MultiPoint,
    PreFilter,
    Filter,
    PostFilter,
    Reserve,
    PreScore,
    Score,
    PreBind,
    Bind,
    PostBind,
    Permit,
    QueueSort,
}

impl ExtensionPoint {
    pub const ALL: [ExtensionPoint; 12] = [
        ExtensionPoint::MultiPoint,
        ExtensionPoint::PreFilter,
        ExtensionPoint::Filter,
        ExtensionPoint::PostFilter,
        ExtensionPoint::Reserve,
        ExtensionPoint::PreScore,
        ExtensionPoint::Score,
        ExtensionPoint::PreBind,
        ExtensionPoint::Bind,
        ExtensionPoint::PostBind,
        ExtensionPoint::Permit,
        ExtensionPoint::QueueSort,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ExtensionPoint::MultiPoint => "multiPoint",
            ExtensionPoint::PreFilter => "preFilter",
            ExtensionPoint::Filter => "filter",
            ExtensionPoint::PostFilter => "postFilter",
            ExtensionPoint::Reserve => "reserve",
            ExtensionPoint::PreScore => "preScore",
            ExtensionPoint::Score => "score",
            ExtensionPoint::PreBind => "preBind",
            ExtensionPoint::Bind => "bind",
            ExtensionPoint::PostBind => "postBind",
            ExtensionPoint::Permit => "permit",
            ExtensionPoint::QueueSort => "queueSort",
        }
    }
}

impl fmt::Display for ExtensionPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Enabled/disabled plugins for every extension point of a profile.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Plugins {
    #[serde(default, skip_serializing_if = "PluginSet::is_empty")]
    pub multi_point: PluginSet,
    #[serde(default, skip_serializing_if = "PluginSet::is_empty")]
    pub pre_filter: PluginSet,
    #[serde(default, skip_serializing_if = "PluginSet::is_empty")]
    pub filter: PluginSet,
    #[serde(default, skip_serializing_if = "PluginSet::is_empty")]
    pub post_filter: PluginSet,
    #[serde(default, skip_serializing_if = "PluginSet::is_empty")]
    pub reserve: PluginSet,
    #[serde(default, skip_serializing_if = "PluginSet::is_empty")]
    pub pre_score: PluginSet,
    #[serde(default, skip_serializing_if = "PluginSet::is_empty")]
    pub score: PluginSet,
    #[serde(default, skip_serializing_if = "PluginSet::is_empty")]
    pub pre_bind: PluginSet,
    #[serde(default, skip_serializing_if = "PluginSet::is_empty")]
    pub bind: PluginSet,
    #[serde(default, skip_serializing_if = "PluginSet::is_empty")]
    pub post_bind: PluginSet,
    #[serde(default, skip_serializing_if = "PluginSet::is_empty")]
    pub permit: PluginSet,
    #[serde(default, skip_serializing_if = "PluginSet::is_empty")]
    pub queue_sort: PluginSet,
}

impl Plugins {
    pub fn plugin_set(&self, point: ExtensionPoint) -> &PluginSet {
        match point {
            ExtensionPoint::MultiPoint => &self.multi_point,
            ExtensionPoint::PreFilter => &self.pre_filter,
            ExtensionPoint::Filter => &self.filter,
            ExtensionPoint::PostFilter => &self.post_filter,
            ExtensionPoint::Reserve => &self.reserve,
            ExtensionPoint::PreScore => &self.pre_score,
            ExtensionPoint::Score => &self.score,
            ExtensionPoint::PreBind => &self.pre_bind,
            ExtensionPoint::Bind => &self.bind,
            ExtensionPoint::PostBind => &self.post_bind,
            ExtensionPoint::Permit => &self.permit,
            ExtensionPoint::QueueSort => &self.queue_sort,
        }
    }

    pub fn plugin_set_mut(&mut self, point: ExtensionPoint) -> &mut PluginSet {
        match point {
            ExtensionPoint::MultiPoint => &mut self.multi_point,
            ExtensionPoint::PreFilter => &mut self.pre_filter,
            ExtensionPoint::Filter => &mut self.filter,
            ExtensionPoint::PostFilter => &mut self.post_filter,
            ExtensionPoint::Reserve => &mut self.reserve,
            ExtensionPoint::PreScore => &mut self.pre_score,
            ExtensionPoint::Score => &mut self.score,
            ExtensionPoint::PreBind => &mut self.pre_bind,
            ExtensionPoint::Bind => &mut self.bind,
            ExtensionPoint::PostBind => &mut self.post_bind,
            ExtensionPoint::Permit => &mut self.permit,
            ExtensionPoint::QueueSort => &mut self.queue_sort,
        }
    }

    /// Iterate over every extension point together with its plugin set.
    pub fn iter(&self) -> impl Iterator<Item = (ExtensionPoint, &PluginSet)> + '_ {
        ExtensionPoint::ALL
            .into_iter()
            .map(move |point| (point, self.plugin_set(point)))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PluginSet {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub enabled: Vec<Plugin>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub disabled: Vec<Plugin>,
}

impl PluginSet {
    pub fn is_empty(&self) -> bool {
        self.enabled.is_empty() && self.disabled.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plugin {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<i32>,
}

impl Plugin {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            weight: None,
        }
    }

    pub fn weighted(name: impl Into<String>, weight: i32) -> Self {
        Self {
            name: name.into(),
            weight: Some(weight),
        }
    }
}

/// Arguments supplied for one plugin of a profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PluginConfig {
    pub name: String,
    #[serde(default)]
    pub args: PluginArgs,
}

/// Kind name of a plugin's arguments, `<PluginName>Args`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ArgsKind(String);

impl ArgsKind {
    pub fn new(kind: impl Into<String>) -> Self {
        Self(kind.into())
    }

    pub fn for_plugin(plugin_name: &str) -> Self {
        Self(format!("{}Args", plugin_name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ArgsKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A registry-known arguments object tagged with its resolved kind.
#[derive(Debug, Clone, PartialEq)]
pub struct TypedArgs {
    pub kind: ArgsKind,
    pub object: ArgsObject,
}

impl TypedArgs {
    /// Render as a document carrying `apiVersion` and `kind`.
    pub fn to_value(&self) -> Result<Value, DefaultingError> {
        let mut value = self.object.to_value().map_err(|e| DefaultingError::Decode {
            kind: self.kind.to_string(),
            message: e.to_string(),
        })?;
        if let Value::Object(map) = &mut value {
            map.insert("apiVersion".to_string(), Value::String(API_VERSION.to_string()));
            map.insert("kind".to_string(), Value::String(self.kind.to_string()));
        }
        Ok(value)
    }
}

/// Plugin arguments are either typed and registry-known, or an opaque blob
/// that defaulting must leave untouched.
#[derive(Debug, Clone, PartialEq)]
pub enum PluginArgs {
    Typed(TypedArgs),
    Opaque(Value),
}

impl PluginArgs {
    pub fn typed(kind: ArgsKind, object: ArgsObject) -> Self {
        PluginArgs::Typed(TypedArgs { kind, object })
    }

    pub fn as_typed(&self) -> Option<&TypedArgs> {
        match self {
            PluginArgs::Typed(typed) => Some(typed),
            PluginArgs::Opaque(_) => None,
        }
    }

    pub fn is_opaque(&self) -> bool {
        matches!(self, PluginArgs::Opaque(_))
    }
}

impl Default for PluginArgs {
    fn default() -> Self {
        PluginArgs::Opaque(Value::Null)
    }
}

impl Serialize for PluginArgs {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            PluginArgs::Opaque(value) => value.serialize(serializer),
            PluginArgs::Typed(typed) => typed
                .to_value()
                .map_err(S::Error::custom)?
                .serialize(serializer),
        }
    }
}

// Documents always decode to the opaque form; the argument registry lifts
// known kinds to their typed form afterwards.
impl<'de> Deserialize<'de> for PluginArgs {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(PluginArgs::Opaque)
    }
}

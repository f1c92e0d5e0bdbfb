//! Typed argument objects for in-tree plugins and their default-fillers
//!
//! Each in-tree plugin that accepts configuration has a dedicated arguments
//! structure. A default-filler only touches fields that are unset, so running
//! it on operator-supplied arguments keeps every explicit value intact and
//! running it twice changes nothing.

use crate::config::defaults::traits::FeatureGate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Highest score a shape point may assign.
pub const MAX_CUSTOM_PRIORITY_SCORE: i32 = 10;

/// Feature gating the volume-binding capacity scoring shape.
pub const VOLUME_CAPACITY_PRIORITY: &str = "VolumeCapacityPriority";

pub const RESOURCE_CPU: &str = "cpu";
pub const RESOURCE_MEMORY: &str = "memory";

/// Resources scored when none are configured.
pub fn default_resource_spec() -> Vec<ResourceSpec> {
    vec![
        ResourceSpec::new(RESOURCE_CPU, 1),
        ResourceSpec::new(RESOURCE_MEMORY, 1),
    ]
}

/// Payload of a typed arguments object.
#[derive(Debug, Clone, PartialEq)]
pub enum ArgsObject {
    DefaultPreemption(DefaultPreemptionArgs),
    InterPodAffinity(InterPodAffinityArgs),
    NodeAffinity(NodeAffinityArgs),
    NodeResourcesBalancedAllocation(NodeResourcesBalancedAllocationArgs),
    NodeResourcesFit(NodeResourcesFitArgs),
    PodTopologySpread(PodTopologySpreadArgs),
    VolumeBinding(VolumeBindingArgs),
    /// Arguments of a kind registered from outside this crate, kept as a
    /// JSON object that the kind's own default-filler works on.
    Extension(Map<String, Value>),
}

impl ArgsObject {
    pub fn to_value(&self) -> serde_json::Result<Value> {
        match self {
            ArgsObject::DefaultPreemption(args) => serde_json::to_value(args),
            ArgsObject::InterPodAffinity(args) => serde_json::to_value(args),
            ArgsObject::NodeAffinity(args) => serde_json::to_value(args),
            ArgsObject::NodeResourcesBalancedAllocation(args) => serde_json::to_value(args),
            ArgsObject::NodeResourcesFit(args) => serde_json::to_value(args),
            ArgsObject::PodTopologySpread(args) => serde_json::to_value(args),
            ArgsObject::VolumeBinding(args) => serde_json::to_value(args),
            ArgsObject::Extension(map) => Ok(Value::Object(map.clone())),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
#[serde(rename_all = "camelCase")]
pub struct DefaultPreemptionArgs {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_candidate_nodes_percentage: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_candidate_nodes_absolute: Option<i32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
#[serde(rename_all = "camelCase")]
pub struct InterPodAffinityArgs {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hard_pod_affinity_weight: Option<i32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
#[serde(rename_all = "camelCase")]
pub struct NodeAffinityArgs {
    /// Node affinity applied to every pod of the profile, in core API form.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub added_affinity: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ResourceSpec {
    pub name: String,
    #[serde(default)]
    pub weight: i64,
}

impl ResourceSpec {
    pub fn new(name: impl Into<String>, weight: i64) -> Self {
        Self {
            name: name.into(),
            weight,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
#[serde(rename_all = "camelCase")]
pub struct NodeResourcesBalancedAllocationArgs {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub resources: Vec<ResourceSpec>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScoringStrategyType {
    LeastAllocated,
    MostAllocated,
    RequestedToCapacityRatio,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UtilizationShapePoint {
    pub utilization: i32,
    pub score: i32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RequestedToCapacityRatioParam {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub shape: Vec<UtilizationShapePoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
#[serde(rename_all = "camelCase")]
pub struct ScoringStrategy {
    /// Never defaulted; an empty type is reported by validation.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub strategy_type: Option<ScoringStrategyType>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub resources: Vec<ResourceSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requested_to_capacity_ratio: Option<RequestedToCapacityRatioParam>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
#[serde(rename_all = "camelCase")]
pub struct NodeResourcesFitArgs {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ignored_resources: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ignored_resource_groups: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scoring_strategy: Option<ScoringStrategy>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DefaultingType {
    System,
    List,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
#[serde(rename_all = "camelCase")]
pub struct PodTopologySpreadArgs {
    /// Topology spread constraints in core API form.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub default_constraints: Vec<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub defaulting_type: Option<DefaultingType>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
#[serde(rename_all = "camelCase")]
pub struct VolumeBindingArgs {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bind_timeout_seconds: Option<i64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub shape: Vec<UtilizationShapePoint>,
}

pub fn set_defaults_default_preemption_args(args: &mut DefaultPreemptionArgs) {
    args.min_candidate_nodes_percentage.get_or_insert(10);
    args.min_candidate_nodes_absolute.get_or_insert(100);
}

pub fn set_defaults_inter_pod_affinity_args(args: &mut InterPodAffinityArgs) {
    args.hard_pod_affinity_weight.get_or_insert(1);
}

pub fn set_defaults_volume_binding_args(args: &mut VolumeBindingArgs, gates: &dyn FeatureGate) {
    args.bind_timeout_seconds.get_or_insert(600);
    if args.shape.is_empty() && gates.enabled(VOLUME_CAPACITY_PRIORITY) {
        args.shape = vec![
            UtilizationShapePoint {
                utilization: 0,
                score: 0,
            },
            UtilizationShapePoint {
                utilization: 100,
                score: MAX_CUSTOM_PRIORITY_SCORE,
            },
        ];
    }
}

pub fn set_defaults_node_resources_balanced_allocation_args(
    args: &mut NodeResourcesBalancedAllocationArgs,
) {
    if args.resources.is_empty() {
        args.resources = default_resource_spec();
        return;
    }
    normalize_weights(&mut args.resources);
}

pub fn set_defaults_pod_topology_spread_args(args: &mut PodTopologySpreadArgs) {
    args.defaulting_type.get_or_insert(DefaultingType::System);
}

pub fn set_defaults_node_resources_fit_args(args: &mut NodeResourcesFitArgs) {
    let strategy = args.scoring_strategy.get_or_insert_with(|| ScoringStrategy {
        strategy_type: Some(ScoringStrategyType::LeastAllocated),
        resources: default_resource_spec(),
        requested_to_capacity_ratio: None,
    });
    if strategy.resources.is_empty() {
        strategy.resources = default_resource_spec();
    }
    normalize_weights(&mut strategy.resources);
}

/// A weight of zero counts as unset and becomes 1.
fn normalize_weights(resources: &mut [ResourceSpec]) {
    for resource in resources.iter_mut().filter(|r| r.weight == 0) {
        resource.weight = 1;
    }
}

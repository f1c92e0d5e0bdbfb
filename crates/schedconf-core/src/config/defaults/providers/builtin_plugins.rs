//! The plugin set every profile starts from

use crate::config::types::{Plugin, PluginSet, Plugins};

pub const PRIORITY_SORT: &str = "PrioritySort";
pub const NODE_UNSCHEDULABLE: &str = "NodeUnschedulable";
pub const NODE_NAME: &str = "NodeName";
pub const TAINT_TOLERATION: &str = "TaintToleration";
pub const NODE_AFFINITY: &str = "NodeAffinity";
pub const NODE_PORTS: &str = "NodePorts";
pub const NODE_RESOURCES_FIT: &str = "NodeResourcesFit";
pub const VOLUME_RESTRICTIONS: &str = "VolumeRestrictions";
pub const EBS_LIMITS: &str = "EBSLimits";
pub const GCE_PD_LIMITS: &str = "GCEPDLimits";
pub const NODE_VOLUME_LIMITS: &str = "NodeVolumeLimits";
pub const AZURE_DISK_LIMITS: &str = "AzureDiskLimits";
pub const VOLUME_BINDING: &str = "VolumeBinding";
pub const VOLUME_ZONE: &str = "VolumeZone";
pub const POD_TOPOLOGY_SPREAD: &str = "PodTopologySpread";
pub const INTER_POD_AFFINITY: &str = "InterPodAffinity";
pub const DEFAULT_PREEMPTION: &str = "DefaultPreemption";
pub const NODE_RESOURCES_BALANCED_ALLOCATION: &str = "NodeResourcesBalancedAllocation";
pub const IMAGE_LOCALITY: &str = "ImageLocality";
pub const DEFAULT_BINDER: &str = "DefaultBinder";

/// Built-in plugins, all registered at the multi-point extension point.
/// Scoring plugins carry their default weight.
pub fn default_plugins() -> Plugins {
    Plugins {
        multi_point: PluginSet {
            enabled: vec![
                Plugin::new(PRIORITY_SORT),
                Plugin::new(NODE_UNSCHEDULABLE),
                Plugin::new(NODE_NAME),
                Plugin::weighted(TAINT_TOLERATION, 3),
                Plugin::weighted(NODE_AFFINITY, 2),
                Plugin::new(NODE_PORTS),
                Plugin::weighted(NODE_RESOURCES_FIT, 1),
                Plugin::new(VOLUME_RESTRICTIONS),
                Plugin::new(EBS_LIMITS),
                Plugin::new(GCE_PD_LIMITS),
                Plugin::new(NODE_VOLUME_LIMITS),
                Plugin::new(AZURE_DISK_LIMITS),
                Plugin::new(VOLUME_BINDING),
                Plugin::new(VOLUME_ZONE),
                Plugin::weighted(POD_TOPOLOGY_SPREAD, 2),
                Plugin::weighted(INTER_POD_AFFINITY, 2),
                Plugin::new(DEFAULT_PREEMPTION),
                Plugin::weighted(NODE_RESOURCES_BALANCED_ALLOCATION, 1),
                Plugin::weighted(IMAGE_LOCALITY, 1),
                Plugin::new(DEFAULT_BINDER),
            ],
            disabled: Vec::new(),
        },
        ..Default::default()
    }
}

//! Scalar defaults for top-level scheduler settings
//!
//! All constants live in [`SchedulerDefaults`], a single immutable table.
//! The defaulting pass reads it from its context, so tests can substitute a
//! different table without touching global state.

use super::traits::{set_if_unset, ExplicitlySet};
use crate::config::types::{Configuration, LeaderElectionConfiguration};
use std::time::Duration;

/// Recommended leader election timings shared by control-plane components.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LeaderElectionDefaults {
    pub leader_elect: bool,
    pub lease_duration: Duration,
    pub renew_deadline: Duration,
    pub retry_period: Duration,
    pub resource_lock: &'static str,
}

impl LeaderElectionDefaults {
    pub const RECOMMENDED: LeaderElectionDefaults = LeaderElectionDefaults {
        leader_elect: true,
        lease_duration: Duration::from_secs(15),
        renew_deadline: Duration::from_secs(10),
        retry_period: Duration::from_secs(2),
        resource_lock: "leases",
    };

    /// Fill generic leader election fields that are still unset.
    pub fn apply(&self, config: &mut LeaderElectionConfiguration) {
        config.leader_elect.get_or_insert(self.leader_elect);
        config.lease_duration.get_or_insert(self.lease_duration);
        config.renew_deadline.get_or_insert(self.renew_deadline);
        config.retry_period.get_or_insert(self.retry_period);
        set_if_unset(&mut config.resource_lock, || self.resource_lock.to_string());
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SchedulerDefaults {
    pub parallelism: i32,
    /// Zero selects the adaptive percentage computed at scheduling time.
    pub percentage_of_nodes_to_score: i32,
    pub scheduler_name: &'static str,
    pub resource_lock: &'static str,
    pub resource_namespace: &'static str,
    pub resource_name: &'static str,
    pub content_type: &'static str,
    pub qps: f32,
    pub burst: i32,
    pub pod_initial_backoff_seconds: i64,
    pub pod_max_backoff_seconds: i64,
    pub enable_profiling: bool,
    pub enable_contention_profiling: bool,
    pub leader_election: LeaderElectionDefaults,
}

impl SchedulerDefaults {
    pub const STANDARD: SchedulerDefaults = SchedulerDefaults {
        parallelism: 16,
        percentage_of_nodes_to_score: 0,
        scheduler_name: "default-scheduler",
        resource_lock: "leases",
        resource_namespace: "kube-system",
        resource_name: "kube-scheduler",
        content_type: "application/vnd.kubernetes.protobuf",
        qps: 50.0,
        burst: 100,
        pod_initial_backoff_seconds: 1,
        pod_max_backoff_seconds: 10,
        enable_profiling: true,
        enable_contention_profiling: true,
        leader_election: LeaderElectionDefaults::RECOMMENDED,
    };
}

impl Default for SchedulerDefaults {
    fn default() -> Self {
        Self::STANDARD
    }
}

pub fn set_defaults_parallelism(config: &mut Configuration, defaults: &SchedulerDefaults) {
    config.parallelism.get_or_insert(defaults.parallelism);
}

/// Everything except parallelism, which runs before profiles are defaulted.
pub fn set_defaults_scalars(config: &mut Configuration, defaults: &SchedulerDefaults) {
    config
        .percentage_of_nodes_to_score
        .get_or_insert(defaults.percentage_of_nodes_to_score);

    let leader_election = &mut config.leader_election;
    set_if_unset(&mut leader_election.resource_lock, || {
        defaults.resource_lock.to_string()
    });
    set_if_unset(&mut leader_election.resource_namespace, || {
        defaults.resource_namespace.to_string()
    });
    set_if_unset(&mut leader_election.resource_name, || {
        defaults.resource_name.to_string()
    });

    let client = &mut config.client_connection;
    set_if_unset(&mut client.content_type, || defaults.content_type.to_string());
    set_if_unset(&mut client.qps, || defaults.qps);
    set_if_unset(&mut client.burst, || defaults.burst);

    defaults.leader_election.apply(&mut config.leader_election);

    config
        .pod_initial_backoff_seconds
        .get_or_insert(defaults.pod_initial_backoff_seconds);
    config
        .pod_max_backoff_seconds
        .get_or_insert(defaults.pod_max_backoff_seconds);

    let profiling = *config.enable_profiling.get_or_insert(defaults.enable_profiling);
    if profiling && !config.enable_contention_profiling.is_explicitly_set() {
        config.enable_contention_profiling = Some(defaults.enable_contention_profiling);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_configuration_scalars() {
        let mut config = Configuration::default();
        set_defaults_parallelism(&mut config, &SchedulerDefaults::STANDARD);
        set_defaults_scalars(&mut config, &SchedulerDefaults::STANDARD);

        assert_eq!(config.parallelism, Some(16));
        assert_eq!(config.percentage_of_nodes_to_score, Some(0));
        assert_eq!(config.client_connection.qps, 50.0);
        assert_eq!(config.client_connection.burst, 100);
        assert_eq!(
            config.client_connection.content_type,
            "application/vnd.kubernetes.protobuf"
        );
        assert_eq!(config.pod_initial_backoff_seconds, Some(1));
        assert_eq!(config.pod_max_backoff_seconds, Some(10));
        assert_eq!(config.enable_profiling, Some(true));
        assert_eq!(config.enable_contention_profiling, Some(true));

        let le = &config.leader_election;
        assert_eq!(le.resource_lock, "leases");
        assert_eq!(le.resource_namespace, "kube-system");
        assert_eq!(le.resource_name, "kube-scheduler");
        assert_eq!(le.leader_elect, Some(true));
        assert_eq!(le.lease_duration, Some(Duration::from_secs(15)));
        assert_eq!(le.renew_deadline, Some(Duration::from_secs(10)));
        assert_eq!(le.retry_period, Some(Duration::from_secs(2)));
    }

    #[test]
    fn test_contention_profiling_follows_profiling() {
        let mut config = Configuration {
            enable_profiling: Some(false),
            ..Default::default()
        };
        set_defaults_scalars(&mut config, &SchedulerDefaults::STANDARD);
        assert_eq!(config.enable_profiling, Some(false));
        assert_eq!(config.enable_contention_profiling, None);

        let mut explicit = Configuration {
            enable_contention_profiling: Some(false),
            ..Default::default()
        };
        set_defaults_scalars(&mut explicit, &SchedulerDefaults::STANDARD);
        assert_eq!(explicit.enable_profiling, Some(true));
        assert_eq!(explicit.enable_contention_profiling, Some(false));
    }

    #[test]
    fn test_explicit_scalars_survive() {
        let mut config = Configuration {
            parallelism: Some(4),
            pod_initial_backoff_seconds: Some(3),
            ..Default::default()
        };
        config.client_connection.qps = 12.5;
        config.client_connection.burst = 20;
        config.leader_election.resource_lock = "endpointsleases".to_string();
        config.leader_election.lease_duration = Some(Duration::from_secs(60));

        set_defaults_parallelism(&mut config, &SchedulerDefaults::STANDARD);
        set_defaults_scalars(&mut config, &SchedulerDefaults::STANDARD);

        assert_eq!(config.parallelism, Some(4));
        assert_eq!(config.pod_initial_backoff_seconds, Some(3));
        assert_eq!(config.client_connection.qps, 12.5);
        assert_eq!(config.client_connection.burst, 20);
        assert_eq!(config.leader_election.resource_lock, "endpointsleases");
        assert_eq!(config.leader_election.lease_duration, Some(Duration::from_secs(60)));
    }

    #[test]
    fn test_substituted_defaults_table() {
        let table = SchedulerDefaults {
            parallelism: 2,
            burst: 5,
            ..SchedulerDefaults::STANDARD
        };
        let mut config = Configuration::default();
        set_defaults_parallelism(&mut config, &table);
        set_defaults_scalars(&mut config, &table);
        assert_eq!(config.parallelism, Some(2));
        assert_eq!(config.client_connection.burst, 5);
    }
}

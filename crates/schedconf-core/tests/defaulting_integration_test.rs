use schedconf_core::config::{
    plugin_names, set_defaults_configuration, ArgsKind, ArgsObject, ArgsRegistry, ConfigLoader,
    Configuration, DefaultingContext, FeatureGate, NodeResourcesBalancedAllocationArgs, PluginArgs,
    PluginConfig, Profile, ResourceSpec, StaticFeatureGate, UtilizationShapePoint,
    VolumeBindingArgs, MAX_CUSTOM_PRIORITY_SCORE,
};
use std::sync::Arc;
use std::thread;

fn volume_binding(config: &Configuration) -> VolumeBindingArgs {
    let args = config.profiles[0]
        .plugin_config("VolumeBinding")
        .and_then(|pc| pc.args.as_typed())
        .expect("VolumeBinding args");
    match &args.object {
        ArgsObject::VolumeBinding(args) => args.clone(),
        other => panic!("unexpected args {:?}", other),
    }
}

#[test]
fn test_scalar_defaults_of_empty_configuration() {
    let mut config = Configuration::default();
    set_defaults_configuration(&mut config, &DefaultingContext::standard()).unwrap();

    assert_eq!(config.parallelism, Some(16));
    assert_eq!(config.client_connection.qps, 50.0);
    assert_eq!(config.client_connection.burst, 100);
    assert_eq!(config.pod_initial_backoff_seconds, Some(1));
    assert_eq!(config.pod_max_backoff_seconds, Some(10));
    assert_eq!(config.enable_profiling, Some(true));
    assert_eq!(config.enable_contention_profiling, Some(true));
    assert_eq!(config.profiles[0].scheduler_name.as_deref(), Some("default-scheduler"));
}

#[test]
fn test_volume_binding_shape_depends_on_gate() {
    let mut gate_off = Configuration::default();
    set_defaults_configuration(&mut gate_off, &DefaultingContext::standard()).unwrap();
    assert!(volume_binding(&gate_off).shape.is_empty());

    let gates = StaticFeatureGate::from_str("VolumeCapacityPriority=true").unwrap();
    let ctx = DefaultingContext::standard().with_feature_gate(gates);
    let mut gate_on = Configuration::default();
    set_defaults_configuration(&mut gate_on, &ctx).unwrap();
    assert_eq!(
        volume_binding(&gate_on).shape,
        vec![
            UtilizationShapePoint { utilization: 0, score: 0 },
            UtilizationShapePoint { utilization: 100, score: MAX_CUSTOM_PRIORITY_SCORE },
        ]
    );
}

#[test]
fn test_weight_normalization_through_full_pass() {
    let mut config = Configuration {
        profiles: vec![Profile {
            plugin_config: vec![PluginConfig {
                name: "NodeResourcesBalancedAllocation".to_string(),
                args: PluginArgs::typed(
                    ArgsKind::new("NodeResourcesBalancedAllocationArgs"),
                    ArgsObject::NodeResourcesBalancedAllocation(NodeResourcesBalancedAllocationArgs {
                        resources: vec![ResourceSpec::new("cpu", 0), ResourceSpec::new("memory", 3)],
                    }),
                ),
            }],
            ..Default::default()
        }],
        ..Default::default()
    };
    set_defaults_configuration(&mut config, &DefaultingContext::standard()).unwrap();

    let args = config.profiles[0]
        .plugin_config("NodeResourcesBalancedAllocation")
        .and_then(|pc| pc.args.as_typed())
        .unwrap();
    assert_eq!(
        args.object,
        ArgsObject::NodeResourcesBalancedAllocation(NodeResourcesBalancedAllocationArgs {
            resources: vec![ResourceSpec::new("cpu", 1), ResourceSpec::new("memory", 3)],
        })
    );
}

#[test]
fn test_shared_registry_across_threads() {
    let registry = Arc::new(ArgsRegistry::with_builtin_kinds());
    let handles: Vec<_> = (0..4)
        .map(|i| {
            let registry = Arc::clone(&registry);
            thread::spawn(move || {
                let ctx = DefaultingContext::standard().with_registry(registry);
                let mut config = Configuration {
                    parallelism: Some(i + 1),
                    ..Default::default()
                };
                set_defaults_configuration(&mut config, &ctx).unwrap();
                config
            })
        })
        .collect();

    for (i, handle) in handles.into_iter().enumerate() {
        let config = handle.join().unwrap();
        assert_eq!(config.parallelism, Some(i as i32 + 1));
        let profile = &config.profiles[0];
        for name in plugin_names(profile.plugins.as_ref()) {
            let kind = ArgsKind::for_plugin(&name);
            assert_eq!(profile.plugin_config(&name).is_some(), registry.contains(&kind));
        }
    }
}

#[test]
fn test_operator_document_end_to_end() {
    let document = r#"
kind: KubeSchedulerConfiguration
profiles:
  - schedulerName: default-scheduler
    pluginConfig:
      - name: DefaultPreemption
        args:
          minCandidateNodesPercentage: 30
  - schedulerName: no-preemption
    plugins:
      multiPoint:
        disabled:
          - name: DefaultPreemption
"#;
    let ctx = DefaultingContext::standard();
    let mut config = ConfigLoader::from_str(document, ctx.registry()).unwrap();
    set_defaults_configuration(&mut config, &ctx).unwrap();

    let first = &config.profiles[0];
    let preemption = first.plugin_config("DefaultPreemption").unwrap();
    let value = preemption.args.as_typed().unwrap().to_value().unwrap();
    assert_eq!(value["minCandidateNodesPercentage"], 30);
    assert_eq!(value["minCandidateNodesAbsolute"], 100);
    assert_eq!(value["kind"], "DefaultPreemptionArgs");

    let second = &config.profiles[1];
    assert!(second.plugin_config("DefaultPreemption").is_none());
    assert_eq!(second.plugin_config.len(), 6);
}

#[test]
fn test_gate_trait_object_is_consulted_at_call_time() {
    struct Toggle(std::sync::atomic::AtomicBool);

    impl FeatureGate for Toggle {
        fn enabled(&self, _feature: &str) -> bool {
            self.0.load(std::sync::atomic::Ordering::SeqCst)
        }
    }

    fn volume_shape_len(profile: &Profile) -> usize {
        match profile
            .plugin_config("VolumeBinding")
            .and_then(|pc| pc.args.as_typed())
            .map(|args| &args.object)
        {
            Some(ArgsObject::VolumeBinding(v)) => v.shape.len(),
            other => panic!("unexpected args {:?}", other),
        }
    }

    let toggle = Toggle(std::sync::atomic::AtomicBool::new(false));
    let registry = ArgsRegistry::with_builtin_kinds();
    let fresh_profile = || Profile {
        plugins: Some(schedconf_core::config::default_plugins()),
        ..Default::default()
    };

    let mut gate_off = fresh_profile();
    schedconf_core::config::complete_plugin_config(&mut gate_off, &registry, &toggle);
    assert_eq!(volume_shape_len(&gate_off), 0);

    toggle.0.store(true, std::sync::atomic::Ordering::SeqCst);
    let mut gate_on = fresh_profile();
    schedconf_core::config::complete_plugin_config(&mut gate_on, &registry, &toggle);
    assert_eq!(volume_shape_len(&gate_on), 2);
}

#[test]
fn test_misspelled_args_survive_load_and_defaulting() {
    let document = r#"
apiVersion: kubescheduler.config.k8s.io/v1
kind: KubeSchedulerConfiguration
profiles:
  - pluginConfig:
      - name: DefaultPreemption
        args:
          minCandidateNodesPercentag: 30
"#;
    let ctx = DefaultingContext::standard();
    let mut config = ConfigLoader::from_str(document, ctx.registry()).unwrap();
    set_defaults_configuration(&mut config, &ctx).unwrap();

    let preemption = config.profiles[0].plugin_config("DefaultPreemption").unwrap();
    assert!(preemption.args.is_opaque());
    let yaml = ConfigLoader::to_yaml(&config).unwrap();
    assert!(yaml.contains("minCandidateNodesPercentag: 30"));
    assert!(!yaml.contains("minCandidateNodesAbsolute"));
}

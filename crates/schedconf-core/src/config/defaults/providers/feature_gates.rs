//! Static feature gate table

use crate::config::args::VOLUME_CAPACITY_PRIORITY;
use crate::config::defaults::traits::FeatureGate;
use crate::errors::DefaultingError;
use std::collections::BTreeMap;

/// Maturity of a feature, which decides its default state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeatureStage {
    Alpha,
    Beta,
    GA,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeatureSpec {
    pub default: bool,
    pub stage: FeatureStage,
}

/// Features known to the defaulting pass with their default state.
pub fn known_features() -> BTreeMap<&'static str, FeatureSpec> {
    BTreeMap::from([(
        VOLUME_CAPACITY_PRIORITY,
        FeatureSpec {
            default: false,
            stage: FeatureStage::Alpha,
        },
    )])
}

/// Feature gates fixed at startup from defaults plus operator overrides.
#[derive(Debug, Clone)]
pub struct StaticFeatureGate {
    known: BTreeMap<&'static str, FeatureSpec>,
    overrides: BTreeMap<String, bool>,
}

impl Default for StaticFeatureGate {
    fn default() -> Self {
        Self::new()
    }
}

impl StaticFeatureGate {
    pub fn new() -> Self {
        Self {
            known: known_features(),
            overrides: BTreeMap::new(),
        }
    }

    /// Override one feature. Unknown names are rejected.
    pub fn set(&mut self, feature: &str, enabled: bool) -> Result<(), DefaultingError> {
        if !self.known.contains_key(feature) {
            return Err(DefaultingError::FeatureGate(format!(
                "unrecognized feature gate: {}",
                feature
            )));
        }
        self.overrides.insert(feature.to_string(), enabled);
        Ok(())
    }

    /// Apply overrides in `Name=true,Other=false` form.
    pub fn set_from_str(&mut self, spec: &str) -> Result<(), DefaultingError> {
        for pair in spec.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            let (name, value) = pair.split_once('=').ok_or_else(|| {
                DefaultingError::FeatureGate(format!("missing bool value for {}", pair))
            })?;
            let enabled: bool = value.trim().parse().map_err(|_| {
                DefaultingError::FeatureGate(format!(
                    "invalid value of {}={}, expected true or false",
                    name, value
                ))
            })?;
            self.set(name.trim(), enabled)?;
        }
        Ok(())
    }

    pub fn from_str(spec: &str) -> Result<Self, DefaultingError> {
        let mut gate = Self::new();
        gate.set_from_str(spec)?;
        Ok(gate)
    }

    /// Effective state of every known feature.
    pub fn states(&self) -> Vec<(&'static str, bool)> {
        self.known
            .keys()
            .map(|name| (*name, self.enabled(name)))
            .collect()
    }
}

impl FeatureGate for StaticFeatureGate {
    fn enabled(&self, feature: &str) -> bool {
        if let Some(enabled) = self.overrides.get(feature) {
            return *enabled;
        }
        self.known.get(feature).map(|spec| spec.default).unwrap_or(false)
    }
}

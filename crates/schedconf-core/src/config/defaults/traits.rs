//! Collaborator traits consumed by the defaulting pass
//!
//! The defaulting pass never decides how plugin sets merge or which features
//! are switched on. Both questions are answered by implementations of the
//! traits below, which keeps the pass testable with substitutes.

use crate::config::types::Plugins;
use crate::errors::DefaultingError;

/// Boolean oracle keyed by feature name, evaluated at call time.
pub trait FeatureGate: Send + Sync {
    fn enabled(&self, feature: &str) -> bool;
}

/// Reconciles the built-in plugin set with a profile's overrides.
///
/// Implementations must be pure and idempotent
/// (`merge(d, merge(d, x)) == merge(d, x)`), treat every extension point
/// independently, and never drop an enabled custom plugin unless the same
/// profile disables it.
pub trait PluginMerger: Send + Sync {
    fn merge(
        &self,
        defaults: &Plugins,
        custom: Option<&Plugins>,
    ) -> Result<Plugins, DefaultingError>;
}

/// Helper trait for detecting whether a field has been explicitly set
pub trait ExplicitlySet {
    /// Returns true if this value was explicitly set (not default)
    fn is_explicitly_set(&self) -> bool;
}

// Implement ExplicitlySet for Option types (None = not set, Some = explicitly set)
impl<T> ExplicitlySet for Option<T> {
    fn is_explicitly_set(&self) -> bool {
        self.is_some()
    }
}

impl ExplicitlySet for String {
    fn is_explicitly_set(&self) -> bool {
        !self.is_empty()
    }
}

impl ExplicitlySet for i32 {
    fn is_explicitly_set(&self) -> bool {
        *self != 0
    }
}

impl ExplicitlySet for f32 {
    fn is_explicitly_set(&self) -> bool {
        *self != 0.0
    }
}

/// Assign `value` to `field` unless the field was explicitly set.
pub fn set_if_unset<T: ExplicitlySet>(field: &mut T, value: impl FnOnce() -> T) {
    if !field.is_explicitly_set() {
        *field = value();
    }
}

//! Name-keyed table of rule factories and presets.

use serde_json::{Map, Value};

use crate::rule::RuleBox;

/// Zero-argument constructor for a rule instance.
///
/// The registry stores factories rather than instances because rule
/// instances are single-use per check pass and must be re-created for each
/// file.
pub type RuleFactory = fn() -> RuleBox;

#[derive(Debug)]
struct RegistryEntry {
    name: &'static str,
    factory: RuleFactory,
}

/// The set of rules (and presets) available to a checker.
///
/// Built once at process start; iteration order is registration order,
/// which fixes the order rules run in and keeps check output deterministic.
#[derive(Debug, Default)]
pub struct RuleRegistry {
    entries: Vec<RegistryEntry>,
    presets: Vec<(String, Map<String, Value>)>,
}

impl RuleRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a rule factory under the rule's own option name.
    pub fn register(&mut self, factory: RuleFactory) {
        let name = factory().option_name();
        self.entries.push(RegistryEntry { name, factory });
    }

    /// Registers a named preset: a ready-made option map users can expand
    /// with `"preset": "<name>"`.
    pub fn register_preset(&mut self, name: impl Into<String>, options: Map<String, Value>) {
        self.presets.push((name.into(), options));
    }

    /// Returns true if a rule with this option name is registered.
    #[must_use]
    pub fn is_registered(&self, name: &str) -> bool {
        self.entries.iter().any(|e| e.name == name)
    }

    /// Looks up the factory for a rule by option name.
    #[must_use]
    pub fn factory(&self, name: &str) -> Option<RuleFactory> {
        self.entries
            .iter()
            .find(|e| e.name == name)
            .map(|e| e.factory)
    }

    /// Registered option names, in registration order.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|e| e.name)
    }

    /// Looks up a preset's option map by name.
    #[must_use]
    pub fn preset(&self, name: &str) -> Option<&Map<String, Value>> {
        self.presets
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, options)| options)
    }

    /// Registered preset names.
    pub fn preset_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.presets.iter().map(|(n, _)| n.as_str())
    }
}

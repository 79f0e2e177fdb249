//! Declarative rule definitions
//!
//! Validators can be described as JSON documents and turned into engine
//! objects. Custom predicates cannot be serialized, so a definition names them
//! and a [`PredicateRegistry`] supplies the implementation.
//!
//! ```json
//! {
//!   "name": "orders",
//!   "ruleSets": [{
//!     "skipOnError": false,
//!     "rules": [{
//!       "name": "lines match",
//!       "fieldPath": "Order",
//!       "fieldName": "skus",
//!       "fieldComparisonList": [{ "fieldPath": "Invoice", "fieldName": "skus" }]
//!     }]
//!   }]
//! }
//! ```

use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use serde_derive::{Deserialize, Serialize};

use crate::engine::{CustomValidator, FieldComparison, Rule, RuleSet, Validator};
use crate::error::{EngineError, EngineResult};
use crate::graph::Walkable;

/// Named custom predicates available to definitions.
#[derive(Clone, Default)]
pub struct PredicateRegistry {
    predicates: HashMap<String, CustomValidator>,
}

impl PredicateRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `predicate` under `name`, replacing any previous entry.
    pub fn register<F>(&mut self, name: &str, predicate: F) -> &mut Self
    where
        F: Fn(&[&dyn Walkable]) -> bool + Send + Sync + 'static,
    {
        self.predicates.insert(name.to_string(), Arc::new(predicate));
        self
    }

    pub fn get(&self, name: &str) -> Option<CustomValidator> {
        self.predicates.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.predicates.contains_key(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleDefinition {
    pub name: String,
    #[serde(default)]
    pub field_path: String,
    #[serde(default)]
    pub field_name: String,
    #[serde(default)]
    pub array_index: Option<usize>,
    #[serde(default)]
    pub validation_expression: Option<String>,
    #[serde(default)]
    pub field_comparison_list: Option<Vec<FieldComparison>>,
    /// Name of a predicate registered in the [`PredicateRegistry`].
    #[serde(default)]
    pub custom_validator: Option<String>,
}

impl RuleDefinition {
    /// Builds the rule, looking up the custom validator by name.
    pub fn build(&self, registry: &PredicateRegistry) -> EngineResult<Rule> {
        let mut builder = Rule::builder(&self.name)
            .field(&self.field_path, &self.field_name)
            .maybe_index(self.array_index);

        if let Some(expression) = &self.validation_expression {
            builder = builder.pattern(expression);
        }
        if let Some(targets) = &self.field_comparison_list {
            builder = builder.comparisons(targets.clone());
        }
        if let Some(predicate) = &self.custom_validator {
            let custom = registry
                .get(predicate)
                .ok_or_else(|| EngineError::UnknownPredicate {
                    rule: self.name.clone(),
                    predicate: predicate.clone(),
                })?;
            builder = builder.custom_validator(custom);
        }

        builder.build()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleSetDefinition {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub skip_on_error: bool,
    pub rules: Vec<RuleDefinition>,
}

impl RuleSetDefinition {
    pub fn build(&self, registry: &PredicateRegistry) -> EngineResult<RuleSet> {
        let rules = self
            .rules
            .iter()
            .map(|rule| rule.build(registry))
            .collect::<EngineResult<Vec<_>>>()?;

        Ok(RuleSet::new(rules)
            .named(&self.name)
            .skip_on_error(self.skip_on_error))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidatorDefinition {
    pub name: String,
    pub rule_sets: Vec<RuleSetDefinition>,
}

impl ValidatorDefinition {
    pub fn from_json_str(json: &str) -> EngineResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads a definition from a JSON file.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use fieldrules::definitions::{PredicateRegistry, ValidatorDefinition};
    ///
    /// let definition = ValidatorDefinition::from_path("rules/orders.json")?;
    /// let validator = definition.build(&PredicateRegistry::new())?;
    /// # Ok::<(), fieldrules::error::EngineError>(())
    /// ```
    pub fn from_path<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();
        log::debug!("Loading validator definition from {}", path.display());
        let raw = fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    /// Builds every rule set and rule. The first invalid rule aborts the build.
    pub fn build(&self, registry: &PredicateRegistry) -> EngineResult<Validator> {
        let rule_sets = self
            .rule_sets
            .iter()
            .map(|rule_set| rule_set.build(registry))
            .collect::<EngineResult<Vec<_>>>()?;

        Ok(Validator::new(&self.name, rule_sets))
    }
}

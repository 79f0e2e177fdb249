//! Validators run every rule set they hold and merge the outcomes.

use crate::config::EngineConfig;
use crate::engine::path_resolver::PathResolver;
use crate::engine::result::ValidationResult;
use crate::engine::rule_set::RuleSet;
use crate::graph::Walkable;

#[derive(Debug, Clone, Default)]
pub struct Validator {
    name: String,
    rule_sets: Vec<RuleSet>,
    resolver: PathResolver,
}

impl Validator {
    pub fn new(name: &str, rule_sets: Vec<RuleSet>) -> Self {
        Self {
            name: name.to_string(),
            rule_sets,
            resolver: PathResolver::default(),
        }
    }

    /// Applies runtime settings to every rule this validator evaluates.
    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.resolver = PathResolver::new(&config);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn rule_sets(&self) -> &[RuleSet] {
        &self.rule_sets
    }

    /// Runs every rule set in order against the same roots.
    ///
    /// A failing rule set never prevents the following ones from running; the
    /// result succeeds only when every run succeeded. The result borrows the
    /// validator's rules.
    ///
    /// # Examples
    ///
    /// ```
    /// use fieldrules::engine::{Rule, RuleSet, Validator};
    /// use serde_json::json;
    ///
    /// let validator = Validator::new(
    ///     "orders",
    ///     vec![RuleSet::new(vec![Rule::builder("id")
    ///         .field("Order", "id")
    ///         .pattern("[0-9]+")
    ///         .build()
    ///         .unwrap()])],
    /// );
    /// let result = validator.execute(&[&json!({ "id": "42" })]);
    /// assert!(result.succeeded);
    /// ```
    pub fn execute(&self, roots: &[&dyn Walkable]) -> ValidationResult<'_> {
        let span = tracing::debug_span!("validator", name = %self.name, rule_sets = self.rule_sets.len());
        let _enter = span.enter();

        let mut result = ValidationResult::new();
        for rule_set in &self.rule_sets {
            result.merge(rule_set.run_with(&self.resolver, roots));
        }

        if result.succeeded {
            log::debug!("Validator '{}' succeeded", self.name);
        } else {
            log::info!(
                "Validator '{}' failed: {} rule(s) failed, {} not run",
                self.name,
                result.failed_rules.len(),
                result.not_ran_rules.len()
            );
        }

        result
    }
}

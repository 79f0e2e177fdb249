//! Ordered rule pipelines
//!
//! A rule set evaluates its rules in declared order and stops at the first
//! failure. With `skip_on_error`, a failing *first* rule marks the whole set as
//! not applicable and the run succeeds without evaluating anything else.

use std::fmt;
use std::sync::Arc;

use crate::engine::path_resolver::{PathResolver, ResolvedField};
use crate::engine::result::RunReport;
use crate::engine::rule::Rule;
use crate::graph::Walkable;

/// Listener invoked for every field a rule rejects, in rejection order.
pub type InvalidHandler = Arc<dyn Fn(&ResolvedField) + Send + Sync>;

#[derive(Clone, Default)]
pub struct RuleSet {
    name: String,
    rules: Vec<Rule>,
    skip_on_error: bool,
    on_invalid: Option<InvalidHandler>,
}

impl RuleSet {
    pub fn new(rules: Vec<Rule>) -> Self {
        Self {
            rules,
            ..Self::default()
        }
    }

    pub fn named(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }

    pub fn skip_on_error(mut self, skip_on_error: bool) -> Self {
        self.skip_on_error = skip_on_error;
        self
    }

    /// Sets the handler shared by every rule of the set.
    pub fn on_invalid<F>(self, handler: F) -> Self
    where
        F: Fn(&ResolvedField) + Send + Sync + 'static,
    {
        self.with_invalid_handler(Arc::new(handler))
    }

    pub fn with_invalid_handler(mut self, handler: InvalidHandler) -> Self {
        self.on_invalid = Some(handler);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn is_skip_on_error(&self) -> bool {
        self.skip_on_error
    }

    /// Runs the rule set with a default resolver.
    pub fn run(&self, roots: &[&dyn Walkable]) -> RunReport<'_> {
        self.run_with(&PathResolver::default(), roots)
    }

    /// Evaluates the rules in order against `roots`.
    ///
    /// Rejected fields are handed to the invalid handler right after the rule
    /// that rejected them and are also collected in the report. The first
    /// failing rule lands in `failed_rules` and every rule after it in
    /// `not_ran_rules`, unless the skip-on-error probe applies.
    ///
    /// The report lists borrowed rules, so it cannot outlive the rule set.
    ///
    /// # Examples
    ///
    /// ```
    /// use fieldrules::engine::{Rule, RuleSet};
    /// use serde_json::json;
    ///
    /// let rules = RuleSet::new(vec![
    ///     Rule::builder("has code").field("Doc", "code").pattern("[A-Z]{3}").build().unwrap(),
    /// ])
    /// .on_invalid(|field| eprintln!("invalid {} = {}", field.path, field.value));
    ///
    /// let report = rules.run(&[&json!({ "code": "abc" })]);
    /// assert!(!report.succeeded);
    /// assert_eq!(report.failed_rules[0].name(), "has code");
    /// ```
    pub fn run_with(&self, resolver: &PathResolver, roots: &[&dyn Walkable]) -> RunReport<'_> {
        let mut report = RunReport::default();

        for (position, rule) in self.rules.iter().enumerate() {
            let outcome = rule.validate_with(resolver, roots);

            if let Some(handler) = &self.on_invalid {
                outcome.rejected.iter().for_each(|field| handler(field));
            }
            report.rejected_fields.extend(outcome.rejected);

            if outcome.passed {
                report.succeeded_rules.push(rule);
                continue;
            }

            if self.skip_on_error && position == 0 {
                log::debug!(
                    "Rule set '{}' does not apply: first rule '{}' failed",
                    self.name,
                    rule.name()
                );
                report.succeeded = true;
                report.skipped = true;
                return report;
            }

            report.failed_rules.push(rule);
            report.not_ran_rules.extend(&self.rules[position + 1..]);
            log::debug!(
                "Rule set '{}' stopped at rule '{}', {} rule(s) not run",
                self.name,
                rule.name(),
                report.not_ran_rules.len()
            );
            return report;
        }

        report.succeeded = true;
        report
    }
}

impl fmt::Debug for RuleSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuleSet")
            .field("name", &self.name)
            .field("rules", &self.rules)
            .field("skip_on_error", &self.skip_on_error)
            .field("on_invalid", &self.on_invalid.is_some())
            .finish()
    }
}

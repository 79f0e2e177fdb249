//! Per-run reports
//!
//! Reports borrow the rules they classify from the rule set or validator that
//! produced them, so a configuration can be run any number of times while
//! earlier reports are still held.

use serde::ser::{SerializeSeq, Serializer};
use serde_derive::Serialize;

use crate::engine::path_resolver::ResolvedField;
use crate::engine::rule::Rule;

/// Outcome of one `RuleSet::run`.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunReport<'a> {
    pub succeeded: bool,
    /// Set when the first rule failed on a skip-on-error rule set and the run
    /// was considered not applicable.
    pub skipped: bool,
    #[serde(serialize_with = "rule_names")]
    pub succeeded_rules: Vec<&'a Rule>,
    #[serde(serialize_with = "rule_names")]
    pub failed_rules: Vec<&'a Rule>,
    #[serde(serialize_with = "rule_names")]
    pub not_ran_rules: Vec<&'a Rule>,
    pub rejected_fields: Vec<ResolvedField>,
}

/// Aggregate outcome of one `Validator::execute`.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult<'a> {
    pub succeeded: bool,
    #[serde(serialize_with = "rule_names")]
    pub succeeded_rules: Vec<&'a Rule>,
    #[serde(serialize_with = "rule_names")]
    pub failed_rules: Vec<&'a Rule>,
    #[serde(serialize_with = "rule_names")]
    pub not_ran_rules: Vec<&'a Rule>,
    pub rejected_fields: Vec<ResolvedField>,
}

impl<'a> ValidationResult<'a> {
    /// Starts an aggregate that succeeds until a failed run is merged in.
    pub(crate) fn new() -> Self {
        Self {
            succeeded: true,
            ..Self::default()
        }
    }

    pub(crate) fn merge(&mut self, report: RunReport<'a>) {
        self.succeeded &= report.succeeded;
        self.succeeded_rules.extend(report.succeeded_rules);
        self.failed_rules.extend(report.failed_rules);
        self.not_ran_rules.extend(report.not_ran_rules);
        self.rejected_fields.extend(report.rejected_fields);
    }

    /// Names of the failed rules, in execution order.
    pub fn failed_rule_names(&self) -> Vec<&str> {
        self.failed_rules.iter().map(|rule| rule.name()).collect()
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

fn rule_names<S>(rules: &[&Rule], serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    let mut seq = serializer.serialize_seq(Some(rules.len()))?;
    for rule in rules {
        seq.serialize_element(rule.name())?;
    }
    seq.end()
}

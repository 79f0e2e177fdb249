//! Rules and their validation strategies
//!
//! A rule points at one field of the validated graph and checks it with
//! exactly one [`Strategy`]. Rules are immutable once built and return a fresh
//! [`RuleOutcome`] from every validation.

use std::fmt;
use std::sync::Arc;

use itertools::Itertools;
use regex::Regex;
use serde_derive::{Deserialize, Serialize};

use crate::engine::path_resolver::{is_valid_path, PathResolver, ResolvedField};
use crate::error::{EngineError, EngineResult};
use crate::graph::Walkable;

/// Predicate over the raw list of roots handed to the rule.
pub type CustomValidator = Arc<dyn Fn(&[&dyn Walkable]) -> bool + Send + Sync>;

/// The other side of a cross-field comparison.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldComparison {
    pub field_path: String,
    pub field_name: String,
    #[serde(default)]
    pub array_index: Option<usize>,
}

impl FieldComparison {
    pub fn new(field_path: &str, field_name: &str) -> Self {
        Self {
            field_path: field_path.to_string(),
            field_name: field_name.to_string(),
            array_index: None,
        }
    }

    pub fn at(mut self, index: usize) -> Self {
        self.array_index = Some(index);
        self
    }

    pub fn full_path(&self) -> String {
        format!("{}.{}", self.field_path, self.field_name)
    }
}

/// Compiled validation expression, always matched against the whole value.
#[derive(Clone)]
pub struct Pattern {
    expression: String,
    regex: Regex,
}

impl Pattern {
    fn compile(rule: &str, expression: &str) -> EngineResult<Self> {
        let regex = Regex::new(&format!("^(?:{})$", expression)).map_err(|source| {
            EngineError::InvalidPattern {
                rule: rule.to_string(),
                source,
            }
        })?;

        Ok(Self {
            expression: expression.to_string(),
            regex,
        })
    }

    /// The expression as configured, without the added anchors.
    pub fn expression(&self) -> &str {
        &self.expression
    }

    pub fn is_full_match(&self, value: &str) -> bool {
        self.regex.is_match(value)
    }
}

impl fmt::Debug for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Pattern").field(&self.expression).finish()
    }
}

/// How a rule decides whether it passes.
#[derive(Clone)]
pub enum Strategy {
    Custom(CustomValidator),
    Pattern(Pattern),
    /// Resolved values must form the same multiset as every target's values.
    Comparison(Vec<FieldComparison>),
}

impl fmt::Debug for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::Custom(_) => f.write_str("Custom(..)"),
            Strategy::Pattern(pattern) => fmt::Debug::fmt(pattern, f),
            Strategy::Comparison(targets) => f.debug_tuple("Comparison").field(targets).finish(),
        }
    }
}

/// Result of validating a single rule.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RuleOutcome {
    pub passed: bool,
    /// Fields reported as invalid, in the order they were rejected.
    pub rejected: Vec<ResolvedField>,
}

impl RuleOutcome {
    fn passed() -> Self {
        Self {
            passed: true,
            rejected: Vec::new(),
        }
    }

    fn failed(rejected: Vec<ResolvedField>) -> Self {
        Self {
            passed: false,
            rejected,
        }
    }
}

/// One validation unit bound to a field path.
#[derive(Debug, Clone)]
pub struct Rule {
    name: String,
    field_path: String,
    field_name: String,
    array_index: Option<usize>,
    strategy: Strategy,
}

impl Rule {
    /// Starts building a rule.
    ///
    /// # Examples
    ///
    /// ```
    /// use fieldrules::engine::Rule;
    ///
    /// let rule = Rule::builder("Test rule")
    ///     .field("Entity.subClassArray", "testProp")
    ///     .index(0)
    ///     .pattern("^.*TEST.*$")
    ///     .build()
    ///     .expect("rule is valid");
    /// assert_eq!(rule.full_path(), "Entity.subClassArray.testProp");
    /// ```
    pub fn builder(name: &str) -> RuleBuilder {
        RuleBuilder {
            name: name.to_string(),
            ..RuleBuilder::default()
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn field_path(&self) -> &str {
        &self.field_path
    }

    pub fn field_name(&self) -> &str {
        &self.field_name
    }

    pub fn array_index(&self) -> Option<usize> {
        self.array_index
    }

    pub fn strategy(&self) -> &Strategy {
        &self.strategy
    }

    pub fn full_path(&self) -> String {
        format!("{}.{}", self.field_path, self.field_name)
    }

    /// Validates the rule with a default resolver.
    pub fn validate(&self, roots: &[&dyn Walkable]) -> RuleOutcome {
        self.validate_with(&PathResolver::default(), roots)
    }

    /// Validates the rule against `roots`, resolving paths with `resolver`.
    ///
    /// A custom predicate is called with the roots untouched. The pattern and
    /// comparison strategies fail when the rule's own path resolves to nothing.
    pub fn validate_with(&self, resolver: &PathResolver, roots: &[&dyn Walkable]) -> RuleOutcome {
        let outcome = match &self.strategy {
            Strategy::Custom(predicate) => RuleOutcome {
                passed: predicate(roots),
                rejected: Vec::new(),
            },
            Strategy::Pattern(pattern) => self.validate_pattern(resolver, roots, pattern),
            Strategy::Comparison(targets) => self.validate_comparison(resolver, roots, targets),
        };

        log::debug!(
            "Rule '{}' {} ({} rejected field(s))",
            self.name,
            if outcome.passed { "passed" } else { "failed" },
            outcome.rejected.len()
        );
        outcome
    }

    fn validate_pattern(
        &self,
        resolver: &PathResolver,
        roots: &[&dyn Walkable],
        pattern: &Pattern,
    ) -> RuleOutcome {
        let source = resolver.resolve(roots, &self.full_path(), self.array_index);
        if source.is_empty() {
            return RuleOutcome::failed(Vec::new());
        }

        match source
            .into_iter()
            .find(|field| !pattern.is_full_match(&field.value))
        {
            Some(mismatch) => RuleOutcome::failed(vec![mismatch]),
            None => RuleOutcome::passed(),
        }
    }

    fn validate_comparison(
        &self,
        resolver: &PathResolver,
        roots: &[&dyn Walkable],
        targets: &[FieldComparison],
    ) -> RuleOutcome {
        let source = resolver.resolve(roots, &self.full_path(), self.array_index);
        if source.is_empty() {
            return RuleOutcome::failed(Vec::new());
        }

        for target in targets {
            let other = resolver.resolve(roots, &target.full_path(), target.array_index);

            // An empty target lands here as well and fails the rule.
            if source.len() != other.len() {
                let rejected = source.iter().cloned().chain(other).collect();
                return RuleOutcome::failed(rejected);
            }

            let by_value = |a: &&ResolvedField, b: &&ResolvedField| a.value.cmp(&b.value);
            let mismatch = source
                .iter()
                .sorted_by(by_value)
                .zip(other.iter().sorted_by(by_value))
                .find(|(left, right)| left.value != right.value);

            if let Some((left, right)) = mismatch {
                return RuleOutcome::failed(vec![left.clone(), right.clone()]);
            }
        }

        RuleOutcome::passed()
    }
}

/// Collects rule settings before they are checked and compiled.
///
/// Several strategies may be configured; the highest one wins in the order
/// custom predicate, pattern, comparison list.
#[derive(Default)]
pub struct RuleBuilder {
    name: String,
    field_path: Option<String>,
    field_name: Option<String>,
    array_index: Option<usize>,
    expression: Option<String>,
    comparisons: Option<Vec<FieldComparison>>,
    custom: Option<CustomValidator>,
}

impl RuleBuilder {
    pub fn field(mut self, field_path: &str, field_name: &str) -> Self {
        self.field_path = Some(field_path.to_string());
        self.field_name = Some(field_name.to_string());
        self
    }

    pub fn index(mut self, index: usize) -> Self {
        self.array_index = Some(index);
        self
    }

    pub fn maybe_index(mut self, index: Option<usize>) -> Self {
        self.array_index = index;
        self
    }

    /// Sets the validation expression. An empty expression counts as unset.
    pub fn pattern(mut self, expression: &str) -> Self {
        self.expression = Some(expression.to_string()).filter(|e| !e.is_empty());
        self
    }

    pub fn compare_to(mut self, target: FieldComparison) -> Self {
        self.comparisons.get_or_insert_with(Vec::new).push(target);
        self
    }

    pub fn comparisons(mut self, targets: Vec<FieldComparison>) -> Self {
        self.comparisons = Some(targets);
        self
    }

    pub fn custom<F>(self, predicate: F) -> Self
    where
        F: Fn(&[&dyn Walkable]) -> bool + Send + Sync + 'static,
    {
        self.custom_validator(Arc::new(predicate))
    }

    pub fn custom_validator(mut self, predicate: CustomValidator) -> Self {
        self.custom = Some(predicate);
        self
    }

    /// Checks the configuration and compiles the winning strategy.
    ///
    /// # Errors
    ///
    /// `EngineError::Configuration` when no strategy is configured, the
    /// comparison list is empty or a path is malformed;
    /// `EngineError::InvalidPattern` when the expression does not compile.
    pub fn build(self) -> EngineResult<Rule> {
        let field_path = self.field_path.unwrap_or_default();
        let field_name = self.field_name.unwrap_or_default();
        let full_path = format!("{}.{}", field_path, field_name);

        let strategy = if let Some(predicate) = self.custom {
            Strategy::Custom(predicate)
        } else {
            if !is_valid_path(&full_path) {
                return Err(EngineError::configuration(
                    &self.name,
                    &format!("malformed field path '{}'", full_path),
                ));
            }

            match (self.expression, self.comparisons) {
                (Some(expression), _) => Strategy::Pattern(Pattern::compile(&self.name, &expression)?),
                (None, Some(targets)) if targets.is_empty() => {
                    return Err(EngineError::configuration(&self.name, "comparison list is empty"));
                }
                (None, Some(targets)) => {
                    if let Some(bad) = targets.iter().find(|t| !is_valid_path(&t.full_path())) {
                        return Err(EngineError::configuration(
                            &self.name,
                            &format!("malformed comparison path '{}'", bad.full_path()),
                        ));
                    }
                    Strategy::Comparison(targets)
                }
                (None, None) => {
                    return Err(EngineError::configuration(
                        &self.name,
                        "no validation strategy configured",
                    ));
                }
            }
        };

        Ok(Rule {
            name: self.name,
            field_path,
            field_name,
            array_index: self.array_index,
            strategy,
        })
    }
}

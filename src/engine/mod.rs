//! Validation engine
//!
//! `Validator` → `RuleSet` → `Rule` → `PathResolver`. Configuration objects are
//! immutable; every run hands back its own report.

pub mod path_resolver;
pub mod result;
pub mod rule;
pub mod rule_set;
pub mod validator;

pub use path_resolver::{is_valid_path, PathResolver, ResolvedField};
pub use result::{RunReport, ValidationResult};
pub use rule::{CustomValidator, FieldComparison, Pattern, Rule, RuleBuilder, RuleOutcome, Strategy};
pub use rule_set::{InvalidHandler, RuleSet};
pub use validator::Validator;

//! Prelude for the validation engine
//!
//! This module re-exports the types needed to describe, load and run rules so
//! callers can `use fieldrules::prelude::*;`.

pub use crate::config::EngineConfig;
pub use crate::definitions::{PredicateRegistry, ValidatorDefinition};
pub use crate::engine::{
    FieldComparison, ResolvedField, Rule, RuleSet, ValidationResult, Validator,
};
pub use crate::error::{EngineError, EngineResult};
pub use crate::graph::{Field, FieldValue, Walkable};

/// Loads a validator definition file and builds it with the given predicates
/// and the environment configuration.
///
/// # Errors
///
/// Returns an `EngineError` if the environment settings are invalid, the file
/// cannot be read or parsed, or any rule fails to build.
///
/// # Examples
///
/// ```no_run
/// use fieldrules::prelude::*;
///
/// let validator = load_validator("rules/orders.json", &PredicateRegistry::new())
///     .expect("failed to load validator");
/// ```
pub fn load_validator<P: AsRef<std::path::Path>>(
    path: P,
    registry: &PredicateRegistry,
) -> EngineResult<Validator> {
    let config = EngineConfig::from_env()?;
    let validator = ValidatorDefinition::from_path(path)?.build(registry)?;
    Ok(validator.with_config(config))
}

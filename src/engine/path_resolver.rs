//! Dotted path resolution over walkable object graphs
//!
//! A path has the shape `Anchor.segment1...segmentN`. The anchor is only a
//! label for the root; every other segment names a field. Sequence-valued
//! fields are either fanned out (one result per element) or indexed when the
//! caller supplies an index.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_derive::Serialize;

use crate::config::EngineConfig;
use crate::graph::{FieldValue, Walkable};

/// Non-empty segments separated by single dots.
static PATH_SYNTAX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[^.]+(\.[^.]+)*$").unwrap());

/// Returns `true` when `path` is a well-formed dotted path.
pub fn is_valid_path(path: &str) -> bool {
    PATH_SYNTAX.is_match(path)
}

/// One concrete leaf value found while resolving a path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedField {
    /// Type name of the object holding the field.
    pub owner: String,
    /// Full dotted label of the field, anchor included.
    pub path: String,
    pub field_name: String,
    /// Element position for sequence-valued fields.
    pub index: Option<usize>,
    /// String rendering used by every strategy.
    pub value: String,
}

struct Target<'p> {
    path: &'p str,
}

impl Target<'_> {
    /// Segments left after `label` when `label` is a strict segment prefix of the target.
    ///
    /// Counted from the target text, so field names holding dots shift the
    /// count the same way they shift the label.
    fn remaining_after(&self, label: &str) -> Option<usize> {
        let rest = self.path.strip_prefix(label)?.strip_prefix('.')?;
        Some(rest.split('.').count())
    }
}

/// Walks candidate roots and collects every leaf matching a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathResolver {
    max_depth: usize,
}

impl Default for PathResolver {
    fn default() -> Self {
        Self::new(&EngineConfig::default())
    }
}

impl PathResolver {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            max_depth: config.max_depth,
        }
    }

    /// Resolves `path` against each root in turn.
    ///
    /// Roots are alternatives: the first root yielding at least one field wins
    /// and later roots are not consulted. Fields that cannot be read are
    /// skipped, so resolution never fails; an unmatched path yields an empty
    /// vector.
    ///
    /// # Examples
    ///
    /// ```
    /// use fieldrules::engine::PathResolver;
    /// use serde_json::json;
    ///
    /// let order = json!({ "lines": [{ "sku": "A-1" }, { "sku": "B-2" }] });
    /// let found = PathResolver::default().resolve(&[&order], "Order.lines.sku", None);
    /// let skus: Vec<_> = found.iter().map(|f| f.value.as_str()).collect();
    /// assert_eq!(skus, vec!["A-1", "B-2"]);
    /// ```
    pub fn resolve(
        &self,
        roots: &[&dyn Walkable],
        path: &str,
        index: Option<usize>,
    ) -> Vec<ResolvedField> {
        if !is_valid_path(path) {
            log::debug!("Path '{}' is malformed, nothing to resolve", path);
            return Vec::new();
        }

        let segments = path.split('.').count();
        if segments > self.max_depth {
            log::warn!(
                "Path '{}' has {} segments, more than the configured maximum of {}",
                path,
                segments,
                self.max_depth
            );
            return Vec::new();
        }

        let target = Target { path };
        let anchor = path.split('.').next().unwrap_or(path);

        for root in roots {
            let mut found = Vec::new();
            self.walk(*root, anchor, &target, index, &mut found);

            if !found.is_empty() {
                log::trace!("Resolved '{}' to {} field(s)", path, found.len());
                return found;
            }
        }

        log::debug!("Path '{}' did not resolve against {} root(s)", path, roots.len());
        Vec::new()
    }

    fn walk(
        &self,
        object: &dyn Walkable,
        label: &str,
        target: &Target<'_>,
        index: Option<usize>,
        found: &mut Vec<ResolvedField>,
    ) {
        for field in object.fields() {
            let value = match field.value {
                Ok(value) => value,
                Err(err) => {
                    log::trace!("Skipping field under '{}': {}", label, err);
                    continue;
                }
            };

            let full_path = format!("{}.{}", label, field.name);

            if full_path == target.path {
                emit_leaf(object, &field.name, &full_path, value, index, found);
                return;
            }

            // No descendant of a field outside the target prefix can match.
            let remaining = match target.remaining_after(&full_path) {
                Some(remaining) => remaining,
                None => continue,
            };

            match value {
                FieldValue::Sequence(items) => match index {
                    Some(position) if remaining == 1 => {
                        if let Some(FieldValue::Object(element)) = items.get(position) {
                            self.walk(*element, &full_path, target, index, found);
                        }
                    }
                    _ => {
                        for item in &items {
                            if let FieldValue::Object(element) = item {
                                self.walk(*element, &full_path, target, index, found);
                            }
                        }
                    }
                },
                FieldValue::Object(child) => {
                    self.walk(child, &full_path, target, index, found);
                }
                FieldValue::Scalar(_) | FieldValue::Null => {}
            }
        }
    }
}

fn emit_leaf(
    owner: &dyn Walkable,
    field_name: &str,
    path: &str,
    value: FieldValue<'_>,
    index: Option<usize>,
    found: &mut Vec<ResolvedField>,
) {
    let resolved = |value: String, index: Option<usize>| ResolvedField {
        owner: owner.type_name().to_string(),
        path: path.to_string(),
        field_name: field_name.to_string(),
        index,
        value,
    };

    match value {
        FieldValue::Sequence(items) => match index {
            Some(position) => match items.get(position) {
                Some(item) => found.push(resolved(item.render(), Some(position))),
                None => log::debug!(
                    "Index {} is out of range for '{}' ({} elements)",
                    position,
                    path,
                    items.len()
                ),
            },
            None => found.extend(
                items
                    .iter()
                    .enumerate()
                    .map(|(position, item)| resolved(item.render(), Some(position))),
            ),
        },
        scalar => found.push(resolved(scalar.render(), None)),
    }
}

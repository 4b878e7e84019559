//! Indexing projector: prunes non-indexed branches before value validation
//!
//! Collections may be configured to index only a subset of document
//! branches. The projector applies that configuration to a copy of the
//! document ahead of the value-limit pass and the fact traversal, so
//! non-indexed branches produce no facts and are exempt from value limits.
//! The stored document text always retains the full document; pruning never
//! touches the original tree.

use serde_json::{Map, Value};
use shale_core::fields;
use std::collections::BTreeSet;

/// Predicate over document branches selecting which are indexable
///
/// Either an include-list (index only the named branches) or an
/// exclude-list (index everything but the named branches) of dotted
/// property paths. The identity projector keeps everything and lets the
/// shredder skip the document copy entirely. The identity property is never
/// pruned.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IndexingProjector {
    rule: Option<ProjectorRule>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct ProjectorRule {
    include: bool,
    paths: BTreeSet<String>,
}

impl IndexingProjector {
    /// Projector that keeps every branch
    pub fn identity() -> Self {
        IndexingProjector::default()
    }

    /// Projector keeping only the given dotted property paths (plus `_id`)
    pub fn including<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        IndexingProjector {
            rule: Some(ProjectorRule {
                include: true,
                paths: paths.into_iter().map(Into::into).collect(),
            }),
        }
    }

    /// Projector dropping the given dotted property paths
    pub fn excluding<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        IndexingProjector {
            rule: Some(ProjectorRule {
                include: false,
                paths: paths.into_iter().map(Into::into).collect(),
            }),
        }
    }

    /// Whether this projector keeps every branch
    pub fn is_identity(&self) -> bool {
        self.rule.is_none()
    }

    /// Whether the branch at `path` (dotted form) survives projection
    pub fn is_path_indexed(&self, path: &str) -> bool {
        let Some(rule) = &self.rule else {
            return true;
        };
        if path == fields::DOC_ID {
            return true;
        }
        if rule.include {
            rule.paths
                .iter()
                .any(|p| covers(p, path) || covers(path, p))
        } else {
            !rule.paths.iter().any(|p| covers(p, path))
        }
    }

    /// Prune non-indexed branches from `doc` in place
    ///
    /// Callers hand in a copy; the shredder never mutates its input.
    pub fn apply(&self, doc: &mut Map<String, Value>) {
        let Some(rule) = &self.rule else {
            return;
        };
        if rule.include {
            retain_included(doc, "", &rule.paths);
        } else {
            for path in &rule.paths {
                remove_path(doc, path);
            }
        }
    }
}

/// Whether `prefix` addresses `path` or one of its ancestors
fn covers(prefix: &str, path: &str) -> bool {
    path == prefix
        || (path.len() > prefix.len()
            && path.starts_with(prefix)
            && path.as_bytes()[prefix.len()] == b'.')
}

fn remove_path(doc: &mut Map<String, Value>, path: &str) {
    let mut current = doc;
    let mut segments = path.split('.').peekable();
    while let Some(segment) = segments.next() {
        if segments.peek().is_none() {
            current.remove(segment);
            return;
        }
        match current.get_mut(segment) {
            Some(Value::Object(next)) => current = next,
            // Path runs through a non-object; nothing to prune.
            _ => return,
        }
    }
}

fn retain_included(obj: &mut Map<String, Value>, parent: &str, included: &BTreeSet<String>) {
    let keys: Vec<String> = obj.keys().cloned().collect();
    for key in keys {
        let full = if parent.is_empty() {
            key.clone()
        } else {
            format!("{}.{}", parent, key)
        };
        if parent.is_empty() && key == fields::DOC_ID {
            continue;
        }
        if included.iter().any(|p| covers(p, &full)) {
            // Whole subtree included.
            continue;
        }
        if included.iter().any(|p| covers(&full, p)) {
            // An included branch lives below this property; keep the
            // property only if it can actually contain it.
            match obj.get_mut(&key) {
                Some(Value::Object(nested)) => retain_included(nested, &full, included),
                _ => {
                    obj.remove(&key);
                }
            }
        } else {
            obj.remove(&key);
        }
    }
}

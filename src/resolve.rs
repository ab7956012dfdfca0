//! Dotted-path resolution against `Resolve` structures.
//!
//! Resolution walks one segment at a time. At each level the head segment
//! is matched, in order, against:
//!
//! 1. a non-embedded field whose name or alias equals the segment,
//! 2. an embedded field qualified by its type name (`Config.field1`),
//! 3. the promoted fields of each embedded member, without consuming the
//!    segment (`field1` reaching into an embedded `Config`).
//!
//! The first alternative that resolves the whole remaining path wins, so a
//! direct field always shadows a promoted one of the same name. Among
//! promoted matches the shallowest wins, then the earliest declared.

use std::fmt;

use crate::field::{CoercionError, FieldInfo, FieldKind, FieldMut, Resolve, Scalar};
use crate::value::{Value, ValueKind};

/// Identity of a resolved field: the field indices from the root to the leaf.
///
/// Two paths alias the same storage exactly when they produce equal ids.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FieldId(Vec<usize>);

impl FieldId {
    /// Field indices from the root structure down to the leaf.
    pub fn indices(&self) -> &[usize] {
        &self.0
    }

    /// Nesting depth of the leaf (1 for a root-level field).
    pub fn depth(&self) -> usize {
        self.0.len()
    }
}

impl fmt::Display for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.0.iter().map(|i| i.to_string()).collect();
        write!(f, "#{}", parts.join("/"))
    }
}

/// A path that resolved to no field.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("no field matches '{path}'")]
pub struct FieldNotFound {
    /// The unresolved path
    pub path: String,
}

/// Writable handle to a resolved scalar field.
pub struct Slot<'a> {
    id: FieldId,
    target: &'a mut dyn Scalar,
}

impl<'a> Slot<'a> {
    /// Identity of the resolved field.
    pub fn id(&self) -> &FieldId {
        &self.id
    }

    /// Declared kind of the field.
    pub fn kind(&self) -> ValueKind {
        self.target.kind()
    }

    /// Check whether `value` could be assigned, without writing it.
    pub fn check(&self, value: &Value) -> Result<(), CoercionError> {
        self.target.check(value)
    }

    /// Coerce and write `value` into the field.
    pub fn assign(&mut self, value: &Value) -> Result<(), CoercionError> {
        self.target.assign(value)
    }
}

impl fmt::Debug for Slot<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Slot")
            .field("id", &self.id)
            .field("kind", &self.kind())
            .finish()
    }
}

/// Find the identity of the field addressed by `path`.
///
/// Returns `None` for an empty path, an empty segment, or a path that does
/// not end on a scalar field.
pub fn locate(target: &mut dyn Resolve, path: &str) -> Option<FieldId> {
    if path.is_empty() {
        return None;
    }
    let segments: Vec<&str> = path.split('.').collect();
    if segments.iter().any(|s| s.is_empty()) {
        return None;
    }

    let mut indices = Vec::with_capacity(segments.len());
    if locate_segments(target, &segments, &mut indices) {
        Some(FieldId(indices))
    } else {
        None
    }
}

/// Resolve `path` to a writable slot.
///
/// Nothing is written during resolution.
pub fn resolve<'a>(target: &'a mut dyn Resolve, path: &str) -> Result<Slot<'a>, FieldNotFound> {
    let not_found = || FieldNotFound {
        path: path.to_string(),
    };
    let id = locate(&mut *target, path).ok_or_else(not_found)?;
    let slot = slot_at(target, id.indices()).ok_or_else(not_found)?;
    Ok(Slot { id, target: slot })
}

/// Writable slot for a previously located field.
pub fn slot<'a>(target: &'a mut dyn Resolve, id: &FieldId) -> Option<Slot<'a>> {
    slot_at(target, id.indices()).map(|s| Slot {
        id: id.clone(),
        target: s,
    })
}

fn slot_at<'a>(node: &'a mut dyn Resolve, indices: &[usize]) -> Option<&'a mut dyn Scalar> {
    let (first, rest) = indices.split_first()?;
    match node.field_mut(*first)? {
        FieldMut::Scalar(s) if rest.is_empty() => Some(s),
        FieldMut::Struct(child) if !rest.is_empty() => slot_at(child, rest),
        _ => None,
    }
}

fn locate_segments(node: &mut dyn Resolve, segments: &[&str], out: &mut Vec<usize>) -> bool {
    let Some((head, rest)) = segments.split_first() else {
        return false;
    };
    let fields = node.fields();

    for (index, info) in fields.iter().enumerate() {
        if info.kind == FieldKind::Embedded || !info.matches(head) {
            continue;
        }
        match info.kind {
            FieldKind::Scalar if rest.is_empty() => {
                out.push(index);
                return true;
            }
            FieldKind::Nested if !rest.is_empty() => {
                if descend(node, index, rest, out) {
                    return true;
                }
            }
            _ => {}
        }
    }

    let embedded: Vec<(usize, &FieldInfo)> = fields
        .iter()
        .enumerate()
        .filter(|(_, info)| info.kind == FieldKind::Embedded)
        .collect();

    if !rest.is_empty() {
        for &(index, info) in &embedded {
            let qualified = match node.field_mut(index) {
                Some(FieldMut::Struct(child)) => child.type_name() == *head || info.matches(head),
                _ => false,
            };
            if qualified && descend(node, index, rest, out) {
                return true;
            }
        }
    }

    // Promoted: retry the unconsumed segments inside each embedded member.
    // The shallowest match wins; declaration order breaks ties.
    let mut best: Option<Vec<usize>> = None;
    for &(index, _) in &embedded {
        let mut candidate = Vec::new();
        if descend(node, index, segments, &mut candidate)
            && best.as_ref().map_or(true, |b| candidate.len() < b.len())
        {
            best = Some(candidate);
        }
    }

    match best {
        Some(found) => {
            out.extend(found);
            true
        }
        None => false,
    }
}

fn descend(node: &mut dyn Resolve, index: usize, segments: &[&str], out: &mut Vec<usize>) -> bool {
    let Some(FieldMut::Struct(child)) = node.field_mut(index) else {
        return false;
    };
    out.push(index);
    if locate_segments(child, segments, out) {
        true
    } else {
        out.pop();
        false
    }
}

/// Every addressable scalar field of `target`, one path per field.
///
/// Embedded fields are listed in promoted form unless an outer field of the
/// same name shadows them, in which case the qualified form is used.
pub fn field_paths(target: &mut dyn Resolve) -> Vec<String> {
    let mut leaves = Vec::new();
    collect_leaves(&mut *target, "", "", &mut Vec::new(), &mut leaves);

    leaves
        .into_iter()
        .map(|(id, promoted, qualified)| {
            if locate(&mut *target, &promoted).as_ref() == Some(&id) {
                promoted
            } else {
                qualified
            }
        })
        .collect()
}

fn join(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{}.{}", prefix, name)
    }
}

fn collect_leaves(
    node: &mut dyn Resolve,
    promoted: &str,
    qualified: &str,
    indices: &mut Vec<usize>,
    out: &mut Vec<(FieldId, String, String)>,
) {
    for (index, info) in node.fields().iter().enumerate() {
        indices.push(index);
        match node.field_mut(index) {
            Some(FieldMut::Scalar(_)) if info.kind == FieldKind::Scalar => {
                out.push((
                    FieldId(indices.clone()),
                    join(promoted, info.display_name()),
                    join(qualified, info.display_name()),
                ));
            }
            Some(FieldMut::Struct(child)) if info.kind == FieldKind::Nested => {
                let p = join(promoted, info.display_name());
                let q = join(qualified, info.display_name());
                collect_leaves(child, &p, &q, indices, out);
            }
            Some(FieldMut::Struct(child)) if info.kind == FieldKind::Embedded => {
                let q = join(qualified, child.type_name());
                collect_leaves(child, promoted, &q, indices, out);
            }
            _ => {}
        }
        indices.pop();
    }
}

/// Closest known path to `path`, if any is near enough to be a typo.
pub fn suggest<'a>(path: &str, candidates: &'a [String]) -> Option<&'a str> {
    let needle = path.to_lowercase();
    let threshold = (path.len() / 3).max(2);

    candidates
        .iter()
        .map(|c| (edit_distance(&needle, &c.to_lowercase()), c))
        .filter(|(d, _)| *d <= threshold)
        .min_by_key(|(d, _)| *d)
        .map(|(_, c)| c.as_str())
}

fn edit_distance(a: &str, b: &str) -> usize {
    let b: Vec<char> = b.chars().collect();
    let mut prev: Vec<usize> = (0..=b.len()).collect();

    for (i, ca) in a.chars().enumerate() {
        let mut cur = vec![i + 1; b.len() + 1];
        for (j, cb) in b.iter().enumerate() {
            let cost = usize::from(ca != *cb);
            cur[j + 1] = (prev[j] + cost).min(prev[j + 1] + 1).min(cur[j] + 1);
        }
        prev = cur;
    }

    prev[b.len()]
}

//! Shallow-merge protocol for state values.

use std::collections::HashMap;
use std::hash::{BuildHasher, Hash};

use serde_json::Value;

/// How an action result combines with the committed state.
///
/// `merge` must be shallow: keys present in `patch` overwrite, keys absent
/// are preserved from `self`. Types without key structure (plain structs)
/// implement this as whole-value replacement, which matches actions that
/// return a complete next state:
///
/// ```
/// use action_state::Merge;
///
/// #[derive(Clone)]
/// struct Lamps { red: bool, blue: bool }
///
/// impl Merge for Lamps {
///     fn merge(&self, patch: &Self) -> Self {
///         patch.clone()
///     }
/// }
/// ```
pub trait Merge: Clone {
    /// Combine `patch` into `self`, producing the next committed value.
    fn merge(&self, patch: &Self) -> Self;
}

/// Object-spread semantics: when both values are JSON objects, keys in
/// `patch` overwrite and the rest of `self` is preserved. Any other shape
/// replaces wholesale.
impl Merge for Value {
    fn merge(&self, patch: &Self) -> Self {
        match (self, patch) {
            (Value::Object(base), Value::Object(patch)) => {
                let mut merged = base.clone();
                for (key, value) in patch {
                    merged.insert(key.clone(), value.clone());
                }
                Value::Object(merged)
            }
            _ => patch.clone(),
        }
    }
}

/// Union of the two maps; entries in `patch` win.
impl<K, V, H> Merge for HashMap<K, V, H>
where
    K: Eq + Hash + Clone,
    V: Clone,
    H: BuildHasher + Clone,
{
    fn merge(&self, patch: &Self) -> Self {
        let mut merged = self.clone();
        for (key, value) in patch {
            merged.insert(key.clone(), value.clone());
        }
        merged
    }
}

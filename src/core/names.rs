//! ES-003: Object identity resolution: raw environment ids to short names.
//!
//! `Mug|+01.2|+00.9|-00.4` becomes `Mug`; the next distinct `Mug|...` becomes
//! `Mug2`, then `Mug3`, in order of first appearance. The map lives for one
//! file and is dropped with it.

use rustc_hash::{FxHashMap, FxHashSet};

/// Token used for a missing object.
pub const NONE: &str = "None";

/// File-scoped name map.
#[derive(Debug, Default)]
pub struct ObjectNames {
    names: FxHashMap<String, String>,
    counts: FxHashMap<String, usize>,
    taken: FxHashSet<String>,
}

impl ObjectNames {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve a raw id to its display name, allocating one on first sight.
    /// Empty and literal `"None"` ids resolve to `"None"` and are not cached.
    pub fn resolve(&mut self, oid: Option<&str>) -> String {
        let oid = match oid {
            Some(o) if !o.is_empty() && o != NONE => o,
            _ => return NONE.to_string(),
        };
        if let Some(name) = self.names.get(oid) {
            return name.clone();
        }

        let base = oid.split('|').next().unwrap_or(oid);
        let count = self.counts.entry(base.to_string()).or_insert(0);
        // A base type ending in digits can collide with a numbered name;
        // keep counting until the candidate is free.
        let name = loop {
            *count += 1;
            let candidate = if *count == 1 {
                base.to_string()
            } else {
                format!("{}{}", base, count)
            };
            if !self.taken.contains(&candidate) {
                break candidate;
            }
        };

        self.taken.insert(name.clone());
        self.names.insert(oid.to_string(), name.clone());
        name
    }

    /// Number of distinct raw ids seen so far.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_es003_first_and_second_of_type() {
        let mut names = ObjectNames::new();
        assert_eq!(names.resolve(Some("Mug|1|2|3")), "Mug");
        assert_eq!(names.resolve(Some("Mug|4|5|6")), "Mug2");
        assert_eq!(names.resolve(Some("Mug|7|8|9")), "Mug3");
    }

    #[test]
    fn test_es003_repeat_lookup_is_stable() {
        let mut names = ObjectNames::new();
        assert_eq!(names.resolve(Some("Mug|1|2|3")), "Mug");
        assert_eq!(names.resolve(Some("Mug|4|5|6")), "Mug2");
        assert_eq!(names.resolve(Some("Mug|1|2|3")), "Mug");
        assert_eq!(names.len(), 2);
    }

    #[test]
    fn test_es003_types_counted_independently() {
        let mut names = ObjectNames::new();
        assert_eq!(names.resolve(Some("Mug|1")), "Mug");
        assert_eq!(names.resolve(Some("Sink|1")), "Sink");
        assert_eq!(names.resolve(Some("Mug|2")), "Mug2");
        assert_eq!(names.resolve(Some("Sink|2")), "Sink2");
    }

    #[test]
    fn test_es003_none_not_cached() {
        let mut names = ObjectNames::new();
        assert_eq!(names.resolve(None), "None");
        assert_eq!(names.resolve(Some("")), "None");
        assert_eq!(names.resolve(Some("None")), "None");
        assert!(names.is_empty());
    }

    #[test]
    fn test_es003_id_without_separator() {
        let mut names = ObjectNames::new();
        assert_eq!(names.resolve(Some("Faucet")), "Faucet");
        assert_eq!(names.resolve(Some("Faucet|0|0")), "Faucet2");
    }

    #[test]
    fn test_es003_numbered_base_does_not_collide() {
        let mut names = ObjectNames::new();
        assert_eq!(names.resolve(Some("Mug|1")), "Mug");
        assert_eq!(names.resolve(Some("Mug|2")), "Mug2");
        // A type literally named `Mug2` must not reuse `Mug2`.
        let clash = names.resolve(Some("Mug2|9"));
        assert_ne!(clash, "Mug2");
        assert_eq!(clash, "Mug22");
    }

    proptest! {
        #[test]
        fn test_es003_distinct_ids_distinct_names(
            ids in proptest::collection::vec("[A-C][0-9]?\\|[0-9]{1,2}", 1..40)
        ) {
            let mut names = ObjectNames::new();
            let mut seen: FxHashMap<String, String> = FxHashMap::default();
            for id in &ids {
                let name = names.resolve(Some(id.as_str()));
                if let Some(prev) = seen.get(id) {
                    prop_assert_eq!(prev, &name);
                }
                seen.insert(id.clone(), name);
            }
            let distinct: FxHashSet<&String> = seen.values().collect();
            prop_assert_eq!(distinct.len(), seen.len());
        }
    }
}

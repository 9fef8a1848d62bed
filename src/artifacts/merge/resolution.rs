//! Three-way snapshot reconciliation
//!
//! Given the snapshots of the merge base `L`, the current tip `C`, and the
//! other tip `O`, every path in their union resolves per:
//!
//! | condition              | resolution                                  |
//! |------------------------|---------------------------------------------|
//! | `c == o`               | keep `c` (identical change or absence)      |
//! | `l == c` and `o != c`  | take `o`; absent in `o` means delete        |
//! | `l == o` and `c != o`  | keep `c`; absent in `c` means delete        |
//! | otherwise              | conflict on the path                        |
//!
//! Absence is part of the comparison, so an identical deletion on both sides
//! resolves cleanly and a modify/delete split is a conflict.

use crate::artifacts::objects::commit::Snapshot;
use std::collections::BTreeSet;
use std::path::PathBuf;

/// Outcome of reconciling three snapshots
#[derive(Debug, Clone, Default)]
pub struct MergedTree {
    /// The reconciled tree; only meaningful when `conflicts` is empty
    pub snapshot: Snapshot,
    /// Paths where both sides changed in incompatible ways, sorted
    pub conflicts: Vec<PathBuf>,
}

impl MergedTree {
    pub fn has_conflicts(&self) -> bool {
        !self.conflicts.is_empty()
    }
}

/// Reconcile the base, current, and other snapshots path by path
pub fn resolve_three_way(base: &Snapshot, current: &Snapshot, other: &Snapshot) -> MergedTree {
    let paths = base
        .keys()
        .chain(current.keys())
        .chain(other.keys())
        .collect::<BTreeSet<_>>();

    let mut merged = MergedTree::default();

    for path in paths {
        let l = base.get(path);
        let c = current.get(path);
        let o = other.get(path);

        let resolved = if c == o {
            c
        } else if l == c {
            o
        } else if l == o {
            c
        } else {
            merged.conflicts.push(path.clone());
            continue;
        };

        if let Some(blob_oid) = resolved {
            merged.snapshot.insert(path.clone(), blob_oid.clone());
        }
    }

    merged
}

/// Render the conflict-marker file written to the working tree for a path
/// both sides changed; absent content appears as an empty section.
pub fn conflict_markers(current_content: &str, other_content: &str, other_label: &str) -> String {
    format!(
        "<<<<<<< HEAD\n{}\n=======\n{}\n>>>>>>> {}\n",
        current_content, other_content, other_label
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifacts::objects::object_id::ObjectId;
    use pretty_assertions::assert_eq;

    fn oid(seed: char) -> ObjectId {
        ObjectId::try_parse(seed.to_string().repeat(40)).unwrap()
    }

    fn snapshot(entries: &[(&str, char)]) -> Snapshot {
        entries
            .iter()
            .map(|(path, seed)| (PathBuf::from(path), oid(*seed)))
            .collect()
    }

    #[test]
    fn identical_sides_resolve_without_conflict() {
        let base = snapshot(&[("f", '1')]);
        let both = snapshot(&[("f", '2')]);

        let merged = resolve_three_way(&base, &both, &both);

        assert!(!merged.has_conflicts());
        assert_eq!(merged.snapshot, both);
    }

    #[test]
    fn change_on_one_side_only_wins() {
        let base = snapshot(&[("f", '1'), ("g", '1')]);
        let current = snapshot(&[("f", '2'), ("g", '1')]);
        let other = snapshot(&[("f", '1'), ("g", '3')]);

        let merged = resolve_three_way(&base, &current, &other);

        assert!(!merged.has_conflicts());
        assert_eq!(merged.snapshot, snapshot(&[("f", '2'), ("g", '3')]));
    }

    #[test]
    fn additions_on_either_side_are_kept() {
        let base = snapshot(&[("a", '1')]);
        let current = snapshot(&[("a", '1'), ("b", '2')]);
        let other = snapshot(&[("a", '1'), ("c", '3')]);

        let merged = resolve_three_way(&base, &current, &other);

        assert!(!merged.has_conflicts());
        assert_eq!(
            merged.snapshot,
            snapshot(&[("a", '1'), ("b", '2'), ("c", '3')])
        );
    }

    #[test]
    fn deletion_on_one_side_only_deletes() {
        let base = snapshot(&[("a", '1'), ("b", '2')]);
        let current = snapshot(&[("a", '1'), ("b", '2')]);
        let other = snapshot(&[("a", '1')]);

        let merged = resolve_three_way(&base, &current, &other);

        assert!(!merged.has_conflicts());
        assert_eq!(merged.snapshot, snapshot(&[("a", '1')]));
    }

    #[test]
    fn identical_deletion_on_both_sides_is_clean() {
        let base = snapshot(&[("a", '1'), ("b", '2')]);
        let both = snapshot(&[("a", '1')]);

        let merged = resolve_three_way(&base, &both, &both);

        assert!(!merged.has_conflicts());
        assert_eq!(merged.snapshot, both);
    }

    #[test]
    fn divergent_changes_conflict() {
        let base = snapshot(&[("f", '1')]);
        let current = snapshot(&[("f", '2')]);
        let other = snapshot(&[("f", '3')]);

        let merged = resolve_three_way(&base, &current, &other);

        assert_eq!(merged.conflicts, vec![PathBuf::from("f")]);
    }

    #[test]
    fn modify_and_delete_conflict() {
        let base = snapshot(&[("f", '1')]);
        let current = snapshot(&[("f", '2')]);
        let other = snapshot(&[]);

        let merged = resolve_three_way(&base, &current, &other);

        assert_eq!(merged.conflicts, vec![PathBuf::from("f")]);
    }

    #[test]
    fn both_added_differently_conflict() {
        let base = snapshot(&[]);
        let current = snapshot(&[("new", '2')]);
        let other = snapshot(&[("new", '3')]);

        let merged = resolve_three_way(&base, &current, &other);

        assert_eq!(merged.conflicts, vec![PathBuf::from("new")]);
    }

    #[test]
    fn marker_rendering_matches_the_documented_layout() {
        let rendered = conflict_markers("mine", "theirs", "other");

        assert_eq!(
            rendered,
            "<<<<<<< HEAD\nmine\n=======\ntheirs\n>>>>>>> other\n"
        );
    }

    #[test]
    fn marker_rendering_keeps_empty_sections() {
        let rendered = conflict_markers("", "theirs", "other");

        assert_eq!(rendered, "<<<<<<< HEAD\n\n=======\ntheirs\n>>>>>>> other\n");
    }
}

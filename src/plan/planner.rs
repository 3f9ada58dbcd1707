//! Computes the disjoint permission action sets for one run.

use std::collections::{HashMap, HashSet};
use std::path::PathBuf;

use serde::Serialize;

use crate::plan::catalog::DirectoryCatalog;
use crate::plan::inspect::{PathInspector, PathState};

/// The filesystem actions one run needs, in catalog order.
///
/// Computed once per run from the static catalog and a live snapshot of
/// the filesystem; consumed immediately to drive the privileged
/// shell-outs; never persisted. Every set is a subset of its candidate
/// input, deduplicated, with candidate order preserved so the pre-flight
/// report reads deterministically.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PermissionPlan {
    /// Paths to make group writable (`chmod g+rwx`).
    pub group_chmods: Vec<PathBuf>,
    /// Paths to reset to user-only 0755 (`chmod 755`).
    pub user_chmods: Vec<PathBuf>,
    /// Union of the two chmod sets, group entries first.
    pub chmods: Vec<PathBuf>,
    /// Chmod paths whose owner is not the invoking user.
    pub chowns: Vec<PathBuf>,
    /// Chmod paths whose group is not the admin group.
    pub chgrps: Vec<PathBuf>,
    /// Missing directories to create.
    pub mkdirs: Vec<PathBuf>,
}

impl PermissionPlan {
    /// True when no filesystem change is needed.
    pub fn is_empty(&self) -> bool {
        self.chmods.is_empty()
            && self.chowns.is_empty()
            && self.chgrps.is_empty()
            && self.mkdirs.is_empty()
    }
}

/// Compute the permission plan for a catalog against the live state.
///
/// Each unique candidate path is inspected exactly once per call, so the
/// plan is a consistent snapshot; calling again re-inspects everything.
///
/// Membership rules:
/// - a group candidate needs chmod when it does not exist or is not
///   simultaneously readable, writable and executable by the invoking
///   user
/// - a user-only candidate needs chmod when it is a directory whose
///   permission bits differ from 0755
/// - a chmod path needs chown (chgrp) when its owner (group) is not the
///   invoking user (admin group); unreadable paths count as needing both
pub fn plan(catalog: &DirectoryCatalog, inspector: &dyn PathInspector) -> PermissionPlan {
    let mut states: HashMap<&PathBuf, PathState> = HashMap::new();
    for path in catalog
        .group_writable
        .iter()
        .chain(&catalog.user_only)
        .chain(&catalog.create)
    {
        states.entry(path).or_insert_with(|| inspector.inspect(path));
    }
    let state = |path: &PathBuf| states[path];

    let group_chmods = dedup(
        catalog
            .group_writable
            .iter()
            .filter(|path| {
                let s = state(path);
                !(s.exists && s.accessible)
            })
            .cloned(),
    );

    let user_chmods = dedup(
        catalog
            .user_only
            .iter()
            .filter(|path| {
                let s = state(path);
                s.is_dir && s.mode != 0o755
            })
            .cloned(),
    );

    let chmods = dedup(group_chmods.iter().chain(&user_chmods).cloned());

    let chowns = chmods
        .iter()
        .filter(|path| !state(path).owned_by_user)
        .cloned()
        .collect();

    let chgrps = chmods
        .iter()
        .filter(|path| !state(path).group_is_admin)
        .cloned()
        .collect();

    let mkdirs = dedup(
        catalog
            .create
            .iter()
            .filter(|path| !state(path).is_dir)
            .cloned(),
    );

    PermissionPlan {
        group_chmods,
        user_chmods,
        chmods,
        chowns,
        chgrps,
        mkdirs,
    }
}

/// Deduplicate while preserving first-seen order.
fn dedup<I: Iterator<Item = PathBuf>>(paths: I) -> Vec<PathBuf> {
    let mut seen = HashSet::new();
    paths.filter(|path| seen.insert(path.clone())).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    /// Synthetic inspector over a fixed map; unknown paths are missing.
    struct MapInspector(HashMap<PathBuf, PathState>);

    impl MapInspector {
        fn new(entries: &[(&str, PathState)]) -> Self {
            Self(
                entries
                    .iter()
                    .map(|(path, state)| (PathBuf::from(path), *state))
                    .collect(),
            )
        }
    }

    impl PathInspector for MapInspector {
        fn inspect(&self, path: &Path) -> PathState {
            self.0.get(path).copied().unwrap_or(PathState::MISSING)
        }
    }

    fn healthy_dir() -> PathState {
        PathState {
            exists: true,
            is_dir: true,
            mode: 0o755,
            accessible: true,
            owned_by_user: true,
            group_is_admin: true,
        }
    }

    fn catalog() -> DirectoryCatalog {
        DirectoryCatalog::for_prefix(Path::new("/usr/local"))
    }

    /// Every candidate present and healthy: nothing to do.
    #[test]
    fn healthy_tree_yields_empty_plan() {
        let c = catalog();
        let entries: Vec<(PathBuf, PathState)> = c
            .group_writable
            .iter()
            .chain(&c.user_only)
            .chain(&c.create)
            .map(|p| (p.clone(), healthy_dir()))
            .collect();
        let inspector = MapInspector(entries.into_iter().collect());

        let result = plan(&c, &inspector);
        assert!(result.is_empty());
    }

    /// /usr/local/lib exists, 0755, owner root, group wheel; the
    /// invoking user is alice with admin group admin.
    #[test]
    fn root_owned_inaccessible_dir_needs_everything() {
        let mut states: HashMap<PathBuf, PathState> = catalog()
            .group_writable
            .iter()
            .chain(&catalog().user_only)
            .chain(&catalog().create)
            .map(|p| (p.clone(), healthy_dir()))
            .collect();
        states.insert(
            PathBuf::from("/usr/local/lib"),
            PathState {
                exists: true,
                is_dir: true,
                mode: 0o755,
                accessible: false, // alice cannot write
                owned_by_user: false,
                group_is_admin: false,
            },
        );
        let inspector = MapInspector(states.into_iter().collect());

        let result = plan(&catalog(), &inspector);
        let lib = PathBuf::from("/usr/local/lib");
        assert!(result.group_chmods.contains(&lib));
        assert!(!result.user_chmods.contains(&lib));
        assert!(result.chowns.contains(&lib));
        assert!(result.chgrps.contains(&lib));
    }

    /// A zsh dir with mode 0775 gets the user-only chmod; with 0755 it
    /// does not.
    #[test]
    fn zsh_dir_mode_gates_user_chmod() {
        let zsh = "/usr/local/share/zsh";
        let group_writable_zsh = PathState {
            mode: 0o775,
            ..healthy_dir()
        };
        let inspector = MapInspector::new(&[(zsh, group_writable_zsh)]);
        let result = plan(&catalog(), &inspector);
        assert!(result.user_chmods.contains(&PathBuf::from(zsh)));

        let inspector = MapInspector::new(&[(zsh, healthy_dir())]);
        let result = plan(&catalog(), &inspector);
        assert!(!result.user_chmods.contains(&PathBuf::from(zsh)));
    }

    /// A user-only candidate that is not a directory is never chmodded
    /// to 0755.
    #[test]
    fn missing_zsh_dir_is_not_user_chmodded() {
        let inspector = MapInspector::new(&[]);
        let result = plan(&catalog(), &inspector);
        assert!(result.user_chmods.is_empty());
    }

    /// Missing group candidates need chmod (and land in chown/chgrp,
    /// since nothing is known about their ownership).
    #[test]
    fn missing_group_candidate_is_in_chmods() {
        let inspector = MapInspector::new(&[]);
        let result = plan(&catalog(), &inspector);
        let bin = PathBuf::from("/usr/local/bin");
        assert!(result.group_chmods.contains(&bin));
        assert!(result.chmods.contains(&bin));
        assert!(result.chowns.contains(&bin));
        assert!(result.chgrps.contains(&bin));
    }

    /// chowns and chgrps are always subsets of chmods.
    #[test]
    fn ownership_sets_are_subsets_of_chmods() {
        let inspector = MapInspector::new(&[]);
        let result = plan(&catalog(), &inspector);
        for path in result.chowns.iter().chain(&result.chgrps) {
            assert!(result.chmods.contains(path));
        }
    }

    #[test]
    fn chmods_lists_group_entries_before_user_entries() {
        let zsh = "/usr/local/share/zsh";
        let inspector = MapInspector::new(&[(
            zsh,
            PathState {
                mode: 0o775,
                ..healthy_dir()
            },
        )]);
        let result = plan(&catalog(), &inspector);
        // All group candidates are missing, so they fill the front;
        // the zsh entry must come last.
        assert_eq!(result.chmods.last(), Some(&PathBuf::from(zsh)));
        assert_eq!(
            result.chmods.len(),
            result.group_chmods.len() + result.user_chmods.len()
        );
    }

    #[test]
    fn mkdirs_contains_only_missing_directories() {
        let mut states: HashMap<PathBuf, PathState> = HashMap::new();
        states.insert(PathBuf::from("/usr/local/Cellar"), healthy_dir());
        let inspector = MapInspector(states);

        let result = plan(&catalog(), &inspector);
        assert!(!result.mkdirs.contains(&PathBuf::from("/usr/local/Cellar")));
        assert!(result.mkdirs.contains(&PathBuf::from("/usr/local/Caskroom")));
    }

    #[test]
    fn plan_is_idempotent_over_identical_state() {
        let inspector = MapInspector::new(&[("/usr/local/share/zsh", healthy_dir())]);
        let first = plan(&catalog(), &inspector);
        let second = plan(&catalog(), &inspector);
        assert_eq!(first, second);
    }

    #[test]
    fn sets_preserve_catalog_order() {
        let inspector = MapInspector::new(&[]);
        let result = plan(&catalog(), &inspector);
        // First two group candidates in catalog order.
        assert_eq!(result.group_chmods[0], PathBuf::from("/usr/local/bin"));
        assert_eq!(result.group_chmods[1], PathBuf::from("/usr/local/etc"));
        assert_eq!(result.mkdirs[0], PathBuf::from("/usr/local/bin"));
    }

    #[test]
    fn plan_serializes_to_json() {
        let inspector = MapInspector::new(&[]);
        let result = plan(&catalog(), &inspector);
        let rendered = serde_json::to_string(&result).unwrap();
        assert!(rendered.contains("mkdirs"));
        assert!(rendered.contains("/usr/local/Cellar"));
    }
}

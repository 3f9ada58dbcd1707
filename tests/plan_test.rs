//! Integration tests for permission planning against a real directory
//! tree.

use std::fs;
use std::path::{Path, PathBuf};

use strap::plan::{plan, DirectoryCatalog, FsInspector, PathInspector};
use tempfile::TempDir;

#[cfg(unix)]
fn current_uid() -> u32 {
    // SAFETY: geteuid() has no preconditions and cannot fail.
    unsafe { libc::geteuid() }
}

#[cfg(not(unix))]
fn current_uid() -> u32 {
    0
}

#[cfg(unix)]
fn set_mode(path: &Path, mode: u32) {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(mode)).unwrap();
}

/// Inspector whose identity matches the process, with no admin group.
fn own_inspector() -> FsInspector {
    FsInspector::with_identity(current_uid(), None)
}

#[test]
fn empty_prefix_wants_every_create_candidate() {
    let temp = TempDir::new().unwrap();
    let catalog = DirectoryCatalog::for_prefix(temp.path());

    let result = plan(&catalog, &own_inspector());

    assert_eq!(result.mkdirs, catalog.create);
    // Every group candidate is missing, so every one needs chmod.
    assert_eq!(result.group_chmods, catalog.group_writable);
    // Missing user-only candidates are not directories, so no 755 reset.
    assert!(result.user_chmods.is_empty());
}

#[cfg(unix)]
#[test]
fn accessible_directory_is_left_alone() {
    let temp = TempDir::new().unwrap();
    let bin = temp.path().join("bin");
    fs::create_dir(&bin).unwrap();
    set_mode(&bin, 0o755);
    let catalog = DirectoryCatalog::for_prefix(temp.path());

    let result = plan(&catalog, &own_inspector());

    assert!(!result.group_chmods.contains(&bin));
    assert!(!result.mkdirs.contains(&bin));
}

#[cfg(unix)]
#[test]
fn brew_binary_without_execute_bits_needs_chmod() {
    let temp = TempDir::new().unwrap();
    let bin = temp.path().join("bin");
    fs::create_dir(&bin).unwrap();
    let brew = bin.join("brew");
    fs::write(&brew, "#!/bin/sh\n").unwrap();
    set_mode(&brew, 0o644);
    let catalog = DirectoryCatalog::for_prefix(temp.path());

    let result = plan(&catalog, &own_inspector());

    // 0644 is not executable by anyone, so rwx access fails even for
    // privileged users.
    assert!(result.group_chmods.contains(&brew));
    assert!(result.chmods.contains(&brew));
}

#[cfg(unix)]
#[test]
fn group_writable_zsh_dir_gets_user_only_reset() {
    let temp = TempDir::new().unwrap();
    let zsh = temp.path().join("share/zsh");
    fs::create_dir_all(&zsh).unwrap();
    set_mode(&zsh, 0o775);
    let catalog = DirectoryCatalog::for_prefix(temp.path());

    let result = plan(&catalog, &own_inspector());

    assert!(result.user_chmods.contains(&zsh));
    assert_eq!(result.chmods.last(), Some(&zsh));
}

#[cfg(unix)]
#[test]
fn standard_zsh_dir_is_not_reset() {
    let temp = TempDir::new().unwrap();
    let zsh = temp.path().join("share/zsh");
    fs::create_dir_all(&zsh).unwrap();
    set_mode(&zsh, 0o755);
    let catalog = DirectoryCatalog::for_prefix(temp.path());

    let result = plan(&catalog, &own_inspector());

    assert!(!result.user_chmods.contains(&zsh));
}

#[cfg(unix)]
#[test]
fn foreign_owner_lands_in_chowns() {
    let temp = TempDir::new().unwrap();
    let bin = temp.path().join("bin");
    let brew = bin.join("brew");
    fs::create_dir(&bin).unwrap();
    fs::write(&brew, "").unwrap();
    set_mode(&brew, 0o644);
    let catalog = DirectoryCatalog::for_prefix(temp.path());

    // Pretend to be a different user: everything we own looks foreign.
    let inspector = FsInspector::with_identity(current_uid().wrapping_add(1), None);
    let result = plan(&catalog, &inspector);

    assert!(result.chowns.contains(&brew));

    // With our real uid the same path is ours and needs no chown.
    let result = plan(&catalog, &own_inspector());
    assert!(!result.chowns.contains(&brew));
}

#[cfg(unix)]
#[test]
fn admin_group_match_suppresses_chgrp() {
    use std::os::unix::fs::MetadataExt;

    let temp = TempDir::new().unwrap();
    let bin = temp.path().join("bin");
    let brew = bin.join("brew");
    fs::create_dir(&bin).unwrap();
    fs::write(&brew, "").unwrap();
    set_mode(&brew, 0o644);
    let gid = fs::metadata(&brew).unwrap().gid();
    let catalog = DirectoryCatalog::for_prefix(temp.path());

    let matching = FsInspector::with_identity(current_uid(), Some(gid));
    let result = plan(&catalog, &matching);
    assert!(!result.chgrps.contains(&brew));

    let mismatching = FsInspector::with_identity(current_uid(), Some(gid.wrapping_add(1)));
    let result = plan(&catalog, &mismatching);
    assert!(result.chgrps.contains(&brew));
}

#[test]
fn plan_is_idempotent_over_unchanged_tree() {
    let temp = TempDir::new().unwrap();
    fs::create_dir_all(temp.path().join("share/zsh")).unwrap();
    fs::create_dir(temp.path().join("Cellar")).unwrap();
    let catalog = DirectoryCatalog::for_prefix(temp.path());

    let first = plan(&catalog, &own_inspector());
    let second = plan(&catalog, &own_inspector());
    assert_eq!(first, second);
}

#[test]
fn plan_reflects_live_state_without_caching() {
    let temp = TempDir::new().unwrap();
    let cellar = temp.path().join("Cellar");
    fs::create_dir(&cellar).unwrap();
    let catalog = DirectoryCatalog::for_prefix(temp.path());

    let inspector = own_inspector();
    let before = plan(&catalog, &inspector);
    assert!(!before.mkdirs.contains(&cellar));

    fs::remove_dir(&cellar).unwrap();
    let after = plan(&catalog, &inspector);
    assert!(after.mkdirs.contains(&cellar));
}

#[test]
fn planning_never_mutates_the_tree() {
    let temp = TempDir::new().unwrap();
    let catalog = DirectoryCatalog::for_prefix(temp.path());

    let _ = plan(&catalog, &own_inspector());

    assert_eq!(fs::read_dir(temp.path()).unwrap().count(), 0);
}

#[test]
fn every_set_is_a_subset_of_its_candidates() {
    let temp = TempDir::new().unwrap();
    fs::create_dir_all(temp.path().join("share/zsh/site-functions")).unwrap();
    let catalog = DirectoryCatalog::for_prefix(temp.path());

    let result = plan(&catalog, &own_inspector());

    let contains_all = |set: &[PathBuf], candidates: &[PathBuf]| {
        set.iter().all(|p| candidates.contains(p))
    };
    assert!(contains_all(&result.group_chmods, &catalog.group_writable));
    assert!(contains_all(&result.user_chmods, &catalog.user_only));
    assert!(contains_all(&result.mkdirs, &catalog.create));
    assert!(contains_all(&result.chowns, &result.chmods));
    assert!(contains_all(&result.chgrps, &result.chmods));
}

#[test]
fn unreadable_paths_fold_into_needs_action() {
    // A path the inspector cannot stat behaves like a missing path.
    let catalog = DirectoryCatalog::for_prefix(Path::new("/nonexistent/strap-prefix"));
    let result = plan(&catalog, &own_inspector());
    assert_eq!(result.mkdirs.len(), catalog.create.len());

    let inspector = own_inspector();
    let state = inspector.inspect(Path::new("/nonexistent/strap-prefix/bin"));
    assert!(!state.exists);
}

//! Read-only path metadata snapshots.
//!
//! The planner never touches the filesystem directly; it works through
//! [`PathInspector`] so tests can substitute synthetic states. Inspection
//! never fails: a stat or permission error while reading a candidate path
//! folds into [`PathState::MISSING`], which the planner treats as
//! "needs action".

use std::fs;
use std::path::Path;

#[cfg(unix)]
use std::os::unix::fs::MetadataExt;

/// Snapshot of one path's observable attributes at planning time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathState {
    pub exists: bool,
    pub is_dir: bool,
    /// Permission bits (`mode & 0o777`); 0 when the path is missing.
    pub mode: u32,
    /// Readable, writable and executable by the invoking user.
    pub accessible: bool,
    /// Owned by the invoking user.
    pub owned_by_user: bool,
    /// Group-owned by the admin group.
    pub group_is_admin: bool,
}

impl PathState {
    /// State of a path that does not exist or cannot be inspected.
    pub const MISSING: PathState = PathState {
        exists: false,
        is_dir: false,
        mode: 0,
        accessible: false,
        owned_by_user: false,
        group_is_admin: false,
    };
}

/// Source of path snapshots.
pub trait PathInspector {
    fn inspect(&self, path: &Path) -> PathState;
}

/// Live filesystem inspector.
///
/// Resolves the invoking user's uid and the admin group's gid once at
/// construction; every `inspect` call takes a fresh snapshot (no caching
/// across calls).
#[derive(Debug, Clone)]
pub struct FsInspector {
    uid: u32,
    admin_gid: Option<u32>,
}

impl FsInspector {
    pub fn new(admin_group: &str) -> Self {
        Self {
            uid: current_uid(),
            admin_gid: group_id(admin_group),
        }
    }

    /// Inspector with an explicit identity, for tests.
    pub fn with_identity(uid: u32, admin_gid: Option<u32>) -> Self {
        Self { uid, admin_gid }
    }
}

impl PathInspector for FsInspector {
    #[cfg(unix)]
    fn inspect(&self, path: &Path) -> PathState {
        let Ok(meta) = fs::metadata(path) else {
            return PathState::MISSING;
        };
        PathState {
            exists: true,
            is_dir: meta.is_dir(),
            mode: meta.mode() & 0o777,
            accessible: access(path, libc::R_OK | libc::W_OK | libc::X_OK),
            owned_by_user: meta.uid() == self.uid,
            group_is_admin: self.admin_gid.is_some_and(|gid| meta.gid() == gid),
        }
    }

    #[cfg(not(unix))]
    fn inspect(&self, path: &Path) -> PathState {
        let Ok(meta) = fs::metadata(path) else {
            return PathState::MISSING;
        };
        let writable = !meta.permissions().readonly();
        PathState {
            exists: true,
            is_dir: meta.is_dir(),
            mode: if writable { 0o755 } else { 0o555 },
            accessible: writable,
            owned_by_user: true,
            group_is_admin: self.admin_gid.is_some(),
        }
    }
}

/// Whether the invoking user can search (execute) a directory.
#[cfg(unix)]
pub fn is_searchable(path: &Path) -> bool {
    access(path, libc::X_OK)
}

#[cfg(not(unix))]
pub fn is_searchable(path: &Path) -> bool {
    path.exists()
}

#[cfg(unix)]
fn access(path: &Path, mode: i32) -> bool {
    use std::os::unix::ffi::OsStrExt;
    let Ok(c_path) = std::ffi::CString::new(path.as_os_str().as_bytes()) else {
        return false;
    };
    // SAFETY: c_path is a valid NUL-terminated string for the duration
    // of the call; access() reads it and touches nothing else.
    unsafe { libc::access(c_path.as_ptr(), mode) == 0 }
}

#[cfg(unix)]
fn current_uid() -> u32 {
    // SAFETY: geteuid() has no preconditions and cannot fail.
    unsafe { libc::geteuid() }
}

#[cfg(not(unix))]
fn current_uid() -> u32 {
    0
}

/// Look up a group's gid by name. `None` when the group does not exist.
#[cfg(unix)]
fn group_id(name: &str) -> Option<u32> {
    let c_name = std::ffi::CString::new(name).ok()?;
    let mut group: libc::group = unsafe { std::mem::zeroed() };
    let mut buf = vec![0_i8; 4096];
    let mut result: *mut libc::group = std::ptr::null_mut();
    // SAFETY: all pointers reference live buffers for the duration of
    // the call; getgrnam_r writes within the provided bounds.
    let rc = unsafe {
        libc::getgrnam_r(
            c_name.as_ptr(),
            &mut group,
            buf.as_mut_ptr() as *mut libc::c_char,
            buf.len(),
            &mut result,
        )
    };
    if rc == 0 && !result.is_null() {
        Some(group.gr_gid)
    } else {
        None
    }
}

#[cfg(not(unix))]
fn group_id(_name: &str) -> Option<u32> {
    None
}

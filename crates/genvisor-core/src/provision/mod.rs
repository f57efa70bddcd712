//! One-time per-instance filesystem preparation.
//!
//! Runs before an instance's scheduler loop starts: creates the working and
//! public directories, seeds the public tree from a shared asset directory
//! on first start, and fixes ownership of the tree to the daemon's own
//! uid/gid.

use std::path::Path;
use std::{fs, io};

use tracing::{debug, warn};

use genvisor_model::InstanceSpec;

use crate::error::CoreError;

/// Marker file recording that the public tree has been seeded once.
const SEEDED_MARKER: &str = ".seeded";

/// Prepare one instance's directories.
///
/// Directory creation failure is an error and the caller skips the instance.
/// A failed asset copy only logs: the generator may still be able to populate
/// the tree on its own.
pub fn prepare(spec: &InstanceSpec, seed_dir: &Path) -> Result<(), CoreError> {
    for dir in [&spec.dir, &spec.public_dir] {
        fs::create_dir_all(dir).map_err(|source| CoreError::CreateDir {
            path: dir.clone(),
            source,
        })?;
    }

    let marker = spec.dir.join(SEEDED_MARKER);
    if marker.exists() {
        debug!(instance = %spec.name, "public assets already seeded");
    } else {
        match seed_public_tree(seed_dir, &spec.public_dir, &marker) {
            Ok(()) => debug!(instance = %spec.name, "public assets seeded"),
            Err(e) => {
                warn!(instance = %spec.name, error = %e, "seeding public assets failed");
            }
        }
    }

    chown_tree_to_self(&spec.dir);
    Ok(())
}

fn seed_public_tree(seed_dir: &Path, public_dir: &Path, marker: &Path) -> io::Result<()> {
    copy_tree(seed_dir, public_dir)?;
    fs::File::create(marker)?;
    Ok(())
}

fn copy_tree(src: &Path, dst: &Path) -> io::Result<()> {
    fs::create_dir_all(dst)?;
    for entry in fs::read_dir(src)? {
        let entry = entry?;
        let target = dst.join(entry.file_name());
        if entry.file_type()?.is_dir() {
            copy_tree(&entry.path(), &target)?;
        } else {
            fs::copy(entry.path(), &target)?;
        }
    }
    Ok(())
}

/// Best-effort recursive chown to the current uid/gid; errors are ignored.
#[cfg(unix)]
fn chown_tree_to_self(root: &Path) {
    let uid = unsafe { libc::getuid() };
    let gid = unsafe { libc::getgid() };
    chown_tree(root, uid, gid);
}

#[cfg(unix)]
fn chown_tree(path: &Path, uid: u32, gid: u32) {
    let _ = std::os::unix::fs::chown(path, Some(uid), Some(gid));
    let Ok(entries) = fs::read_dir(path) else {
        return;
    };
    for entry in entries.flatten() {
        let child = entry.path();
        if child.is_dir() {
            chown_tree(&child, uid, gid);
        } else {
            let _ = std::os::unix::fs::chown(&child, Some(uid), Some(gid));
        }
    }
}

#[cfg(not(unix))]
fn chown_tree_to_self(_root: &Path) {}

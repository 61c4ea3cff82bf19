//! Write-rename file persistence.
//!
//! The payload goes to `{path}.tmp` first, is flushed with `sync_all()`, and
//! only then renamed over the final path. A crash mid-write leaves the
//! previous file intact; at worst a stale `.tmp` remains, which the next
//! successful write replaces.

use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

/// Atomically replaces the file at `path` with `data`.
///
/// Missing parent directories are created. The rename in the final step is
/// atomic on POSIX filesystems.
pub fn atomic_write(path: &Path, data: &[u8]) -> std::io::Result<()> {
    let mut tmp_path = path.as_os_str().to_owned();
    tmp_path.push(".tmp");

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let mut file = File::create(&tmp_path)?;
    file.write_all(data)?;
    file.sync_all()?;

    fs::rename(&tmp_path, path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::{Path, PathBuf};

    use super::atomic_write;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("headway_atomic_write_{name}"));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_write_creates_file_and_removes_tmp() {
        let dir = scratch_dir("creates");
        let path = dir.join("net.save");

        atomic_write(&path, b"network bytes").unwrap();

        assert_eq!(fs::read(&path).unwrap(), b"network bytes");
        assert!(!Path::new(&format!("{}.tmp", path.display())).exists());

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_write_replaces_previous_contents() {
        let dir = scratch_dir("replaces");
        let path = dir.join("net.save");

        atomic_write(&path, b"first").unwrap();
        atomic_write(&path, b"second").unwrap();

        assert_eq!(fs::read(&path).unwrap(), b"second");
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_write_creates_missing_parent_dirs() {
        let dir = scratch_dir("parents");
        let path = dir.join("saves/slot0/net.save");

        atomic_write(&path, b"nested").unwrap();

        assert_eq!(fs::read(&path).unwrap(), b"nested");
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_stale_tmp_from_a_crashed_write_is_overwritten() {
        let dir = scratch_dir("stale_tmp");
        let path = dir.join("net.save");
        let tmp = dir.join("net.save.tmp");

        fs::write(&path, b"intact").unwrap();
        fs::write(&tmp, b"torn half-write").unwrap();

        atomic_write(&path, b"fresh").unwrap();

        assert_eq!(fs::read(&path).unwrap(), b"fresh");
        assert!(!tmp.exists());
        let _ = fs::remove_dir_all(&dir);
    }
}

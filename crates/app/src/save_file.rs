//! On-disk container for a saved transit network.
//!
//! A save is a single bitcode blob: format version, the map seed, and the
//! `SaveableRegistry` extension map (one entry per non-default resource,
//! keyed by `SAVE_KEY`). The seed is stored so a reload regenerates the same
//! terrain underneath the restored network.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use bitcode::{Decode, Encode};

use crate::atomic_write::atomic_write;

/// Current save format version. Bump on layout changes.
pub const SAVE_FILE_VERSION: u32 = 1;

#[derive(Encode, Decode, Debug, PartialEq)]
pub struct SaveFile {
    pub version: u32,
    pub seed: u64,
    pub extensions: BTreeMap<String, Vec<u8>>,
}

impl SaveFile {
    pub fn new(seed: u64, extensions: BTreeMap<String, Vec<u8>>) -> Self {
        Self {
            version: SAVE_FILE_VERSION,
            seed,
            extensions,
        }
    }

    pub fn encode(&self) -> Vec<u8> {
        bitcode::encode(self)
    }

    /// Decodes a save, rejecting files from newer builds.
    pub fn decode(bytes: &[u8]) -> Result<Self, String> {
        let file: SaveFile =
            bitcode::decode(bytes).map_err(|e| format!("not a readable save file: {e}"))?;
        if file.version > SAVE_FILE_VERSION {
            return Err(format!(
                "save uses format version {}, this build reads up to version {}",
                file.version, SAVE_FILE_VERSION
            ));
        }
        Ok(file)
    }
}

/// Writes the save to disk via the write-rename pattern.
pub fn store(path: &Path, file: &SaveFile) -> std::io::Result<()> {
    atomic_write(path, &file.encode())
}

/// Reads a save from disk. A missing file is `Ok(None)`; an unreadable or
/// incompatible file is an error.
pub fn load(path: &Path) -> Result<Option<SaveFile>, String> {
    if !path.exists() {
        return Ok(None);
    }
    let bytes = fs::read(path).map_err(|e| format!("cannot read {}: {e}", path.display()))?;
    SaveFile::decode(&bytes).map(Some)
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;
    use std::fs;

    use super::*;

    fn sample_extensions() -> BTreeMap<String, Vec<u8>> {
        let mut extensions = BTreeMap::new();
        extensions.insert("street_map".to_string(), vec![1, 2, 3]);
        extensions.insert("transit_map".to_string(), vec![4, 5]);
        extensions
    }

    #[test]
    fn test_encode_decode_roundtrip() {
        let file = SaveFile::new(42, sample_extensions());
        let decoded = SaveFile::decode(&file.encode()).unwrap();
        assert_eq!(decoded, file);
    }

    #[test]
    fn test_newer_format_version_is_rejected() {
        let mut file = SaveFile::new(42, sample_extensions());
        file.version = SAVE_FILE_VERSION + 1;
        let err = SaveFile::decode(&file.encode()).unwrap_err();
        assert!(err.contains("format version"), "unexpected error: {err}");
    }

    #[test]
    fn test_garbage_bytes_are_an_error() {
        assert!(SaveFile::decode(b"definitely not bitcode").is_err());
    }

    #[test]
    fn test_load_of_missing_path_is_none() {
        let path = std::env::temp_dir().join("headway_save_file_missing.save");
        let _ = fs::remove_file(&path);
        assert_eq!(load(&path).unwrap(), None);
    }

    #[test]
    fn test_store_then_load_through_the_filesystem() {
        let path = std::env::temp_dir().join("headway_save_file_roundtrip.save");
        let _ = fs::remove_file(&path);

        let file = SaveFile::new(1337, sample_extensions());
        store(&path, &file).unwrap();

        let loaded = load(&path).unwrap().unwrap();
        assert_eq!(loaded, file);
        let _ = fs::remove_file(&path);
    }
}

//! Persisted per-sample label files.
//!
//! One file per (class-set, expand-size, sample) key, written once by the
//! preprocessing pass and loaded read-only at training time. The format is a
//! small binary header followed by `[f32; 8]` records in little-endian
//! order, one per point.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use crate::engine::LABEL_FIELDS;

const LABEL_MAGIC: &[u8; 4] = b"LSEG";

/// An error type for the label store.
#[derive(Debug, thiserror::Error)]
pub enum LabelStoreError {
    /// Failed to read or write a label file.
    #[error("Failed to read or write label file")]
    Io(#[from] std::io::Error),

    /// The label file for a sample does not exist yet.
    #[error("Label file {0} not found; run the label preprocessing pass first")]
    NotFound(PathBuf),

    /// The label file exists but does not carry the expected header.
    #[error("Malformed label file {0}")]
    MalformedHeader(PathBuf),
}

/// Store of per-sample label files under a root directory.
///
/// File paths are keyed by the class-set identifier, the ground-truth
/// expansion amount (rounded to 3 decimals), and the sample name:
/// `<root>/<set_name>[<expand>]/<sample>.bin`.
#[derive(Debug, Clone)]
pub struct LabelStore {
    root: PathBuf,
}

impl LabelStore {
    /// Create a store rooted at `root`. No directories are created until the
    /// first save.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Full path of the label file for a sample.
    pub fn sample_path(&self, set_name: &str, expand_gt_size: f64, sample_name: &str) -> PathBuf {
        self.root
            .join(format!("{set_name}[{expand_gt_size:.3}]"))
            .join(format!("{sample_name}.bin"))
    }

    /// Whether a sample has already been preprocessed, so the driver can
    /// skip it.
    pub fn exists(&self, set_name: &str, expand_gt_size: f64, sample_name: &str) -> bool {
        self.sample_path(set_name, expand_gt_size, sample_name)
            .exists()
    }

    /// Persist the label records for a sample, creating parent directories
    /// as needed. An existing file is overwritten.
    pub fn save(
        &self,
        set_name: &str,
        expand_gt_size: f64,
        sample_name: &str,
        label_seg: &[[f32; LABEL_FIELDS]],
    ) -> Result<(), LabelStoreError> {
        let path = self.sample_path(set_name, expand_gt_size, sample_name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let mut writer = BufWriter::new(File::create(&path)?);
        writer.write_all(LABEL_MAGIC)?;
        writer.write_all(&(label_seg.len() as u32).to_le_bytes())?;
        for record in label_seg.iter() {
            for value in record.iter() {
                writer.write_all(&value.to_le_bytes())?;
            }
        }
        writer.flush()?;

        log::debug!("saved {} label records to {}", label_seg.len(), path.display());
        Ok(())
    }

    /// Load the label records for a sample.
    ///
    /// # Errors
    ///
    /// [`LabelStoreError::NotFound`] when the file does not exist; the
    /// preprocessing pass is a prerequisite and this is not retryable at
    /// load time.
    pub fn load(
        &self,
        set_name: &str,
        expand_gt_size: f64,
        sample_name: &str,
    ) -> Result<Vec<[f32; LABEL_FIELDS]>, LabelStoreError> {
        let path = self.sample_path(set_name, expand_gt_size, sample_name);
        if !path.exists() {
            return Err(LabelStoreError::NotFound(path));
        }
        read_label_file(&path)
    }
}

fn read_label_file(path: &Path) -> Result<Vec<[f32; LABEL_FIELDS]>, LabelStoreError> {
    let mut reader = BufReader::new(File::open(path)?);

    let mut magic = [0u8; 4];
    reader.read_exact(&mut magic)?;
    if &magic != LABEL_MAGIC {
        return Err(LabelStoreError::MalformedHeader(path.to_path_buf()));
    }

    let mut count_bytes = [0u8; 4];
    reader.read_exact(&mut count_bytes)?;
    let num_records = u32::from_le_bytes(count_bytes) as usize;

    let mut buffer = [0u8; LABEL_FIELDS * 4];
    let mut records = Vec::with_capacity(num_records);
    for _ in 0..num_records {
        reader.read_exact(&mut buffer)?;
        let mut record = [0.0f32; LABEL_FIELDS];
        for (value, chunk) in record.iter_mut().zip(buffer.chunks_exact(4)) {
            let mut bytes = [0u8; 4];
            bytes.copy_from_slice(chunk);
            *value = f32::from_le_bytes(bytes);
        }
        records.push(record);
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_sample_path_rounds_expand_size() {
        let store = LabelStore::new("/data/label_segs");
        let path = store.sample_path("Car", 0.1, "000123");
        assert_eq!(
            path,
            PathBuf::from("/data/label_segs/Car[0.100]/000123.bin")
        );

        let path = store.sample_path("Car_Pedestrian", 0.12345, "000001");
        assert_eq!(
            path,
            PathBuf::from("/data/label_segs/Car_Pedestrian[0.123]/000001.bin")
        );
    }

    #[test]
    fn test_save_load_roundtrip() {
        let dir = TempDir::new().unwrap();
        let store = LabelStore::new(dir.path());

        let labels = vec![
            [1.0, 0.5, -0.2, 3.0, 3.9, 1.6, 1.5, 0.7],
            [0.0; LABEL_FIELDS],
            [2.0, -1.0, 0.0, 10.0, 0.8, 0.6, 1.7, -0.3],
        ];
        store.save("Car", 0.1, "000042", &labels).unwrap();

        assert!(store.exists("Car", 0.1, "000042"));
        let loaded = store.load("Car", 0.1, "000042").unwrap();
        assert_eq!(loaded, labels);
    }

    #[test]
    fn test_save_empty_sample() {
        let dir = TempDir::new().unwrap();
        let store = LabelStore::new(dir.path());

        store.save("Car", 0.0, "000000", &[]).unwrap();
        let loaded = store.load("Car", 0.0, "000000").unwrap();
        assert!(loaded.is_empty());
    }

    #[test]
    fn test_load_missing_names_path() {
        let dir = TempDir::new().unwrap();
        let store = LabelStore::new(dir.path());

        let err = store.load("Car", 0.1, "000099").unwrap_err();
        let message = err.to_string();
        assert!(message.contains("preprocessing"));
        match err {
            LabelStoreError::NotFound(path) => {
                assert!(path.to_string_lossy().contains("000099.bin"));
                assert!(path.to_string_lossy().contains("Car[0.100]"));
            }
            other => panic!("expected NotFound, got {other:?}"),
        }
    }

    #[test]
    fn test_load_rejects_bad_magic() {
        let dir = TempDir::new().unwrap();
        let store = LabelStore::new(dir.path());
        let path = store.sample_path("Car", 0.1, "000007");
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, b"not a label file").unwrap();

        assert!(matches!(
            store.load("Car", 0.1, "000007"),
            Err(LabelStoreError::MalformedHeader(_))
        ));
    }
}

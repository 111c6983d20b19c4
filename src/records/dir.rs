use anyhow::{Context, Result};
use csv::{ReaderBuilder, Trim, WriterBuilder};
use log::info;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fs;
use std::path::{Path, PathBuf};

use crate::errors::{read_context, write_context};

/// Directory of flat record files for one tournament
#[derive(Debug, Clone)]
pub struct RecordDir {
    dir: PathBuf,
}

impl RecordDir {
    /// Open an existing record directory
    pub fn open<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        if !dir.is_dir() {
            anyhow::bail!("Record directory does not exist: {}", dir.display());
        }
        Ok(Self { dir })
    }

    /// Open a record directory, creating it when missing
    pub fn create<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create record directory {}", dir.display()))?;
        Ok(Self { dir })
    }

    pub fn root(&self) -> &Path {
        &self.dir
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.join(name)
    }

    pub fn exists(&self, name: &str) -> bool {
        self.path(name).is_file()
    }

    /// Load every row of a CSV file; the file must exist
    pub fn load<T: DeserializeOwned>(&self, name: &str) -> Result<Vec<T>> {
        let path = self.path(name);
        let rows = self.read_rows(&path)?;
        info!("Loaded {} rows from {}", rows.len(), path.display());
        Ok(rows)
    }

    /// Load a CSV file that may legitimately be absent
    pub fn load_opt<T: DeserializeOwned>(&self, name: &str) -> Result<Option<Vec<T>>> {
        if !self.exists(name) {
            return Ok(None);
        }
        self.load(name).map(Some)
    }

    /// Write a header line followed by one line per row
    pub fn save<T: Serialize>(&self, name: &str, header: &[&str], rows: &[T]) -> Result<()> {
        let path = self.path(name);
        self.write_rows(&path, header, rows)
            .with_context(|| write_context(&path))?;
        info!("Saved {} rows to {}", rows.len(), path.display());
        Ok(())
    }

    pub fn save_lines(&self, name: &str, lines: &[String]) -> Result<()> {
        let path = self.path(name);
        fs::write(&path, lines.join("\n")).with_context(|| write_context(&path))?;
        info!("Saved {} lines to {}", lines.len(), path.display());
        Ok(())
    }

    pub fn save_json<T: Serialize>(&self, name: &str, data: &T) -> Result<()> {
        let path = self.path(name);
        let json = serde_json::to_string_pretty(data).context("Failed to serialize data")?;
        fs::write(&path, json).with_context(|| write_context(&path))?;
        info!("Saved data to {}", path.display());
        Ok(())
    }

    pub fn read_to_string(&self, name: &str) -> Result<String> {
        let path = self.path(name);
        fs::read_to_string(&path).with_context(|| read_context(&path))
    }

    /// Remove a file whose absence carries meaning; returns whether it existed
    pub fn remove_if_exists(&self, name: &str) -> Result<bool> {
        let path = self.path(name);
        if !path.exists() {
            return Ok(false);
        }
        fs::remove_file(&path)
            .with_context(|| format!("Failed to remove {}", path.display()))?;
        info!("Removed {}", path.display());
        Ok(true)
    }

    // --- Helper Methods ---

    fn read_rows<T: DeserializeOwned>(&self, path: &Path) -> Result<Vec<T>> {
        let mut reader = ReaderBuilder::new()
            .trim(Trim::Headers)
            .flexible(true)
            .from_path(path)
            .with_context(|| read_context(path))?;

        let mut rows = Vec::new();
        for (idx, row) in reader.deserialize().enumerate() {
            let row = row.with_context(|| {
                format!("{} (line {})", read_context(path), idx + 2)
            })?;
            rows.push(row);
        }
        Ok(rows)
    }

    fn write_rows<T: Serialize>(&self, path: &Path, header: &[&str], rows: &[T]) -> Result<()> {
        let mut writer = WriterBuilder::new().has_headers(false).from_path(path)?;
        writer.write_record(header)?;
        for row in rows {
            writer.serialize(row)?;
        }
        writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct Row {
        name: String,
        #[serde(default)]
        note: Option<String>,
    }

    #[test]
    fn test_save_writes_header_even_without_rows() {
        let temp_dir = tempfile::tempdir().unwrap();
        let dir = RecordDir::open(temp_dir.path()).unwrap();

        dir.save::<Row>("empty.csv", &["name", "note"], &[]).unwrap();

        assert_eq!(dir.read_to_string("empty.csv").unwrap(), "name,note\n");
    }

    #[test]
    fn test_load_fills_missing_optional_columns() {
        let temp_dir = tempfile::tempdir().unwrap();
        let dir = RecordDir::open(temp_dir.path()).unwrap();
        fs::write(dir.path("rows.csv"), "name\njane\n").unwrap();

        let rows: Vec<Row> = dir.load("rows.csv").unwrap();

        assert_eq!(
            rows,
            vec![Row {
                name: "jane".to_string(),
                note: None
            }]
        );
        assert!(dir.load_opt::<Row>("absent.csv").unwrap().is_none());
    }

    #[test]
    fn test_remove_if_exists_reports_presence() {
        let temp_dir = tempfile::tempdir().unwrap();
        let dir = RecordDir::open(temp_dir.path()).unwrap();
        dir.save_lines("list.txt", &["a".to_string()]).unwrap();

        assert!(dir.remove_if_exists("list.txt").unwrap());
        assert!(!dir.remove_if_exists("list.txt").unwrap());
    }

    #[test]
    fn test_open_requires_existing_directory() {
        let temp_dir = tempfile::tempdir().unwrap();
        assert!(RecordDir::open(temp_dir.path().join("missing")).is_err());
    }
}

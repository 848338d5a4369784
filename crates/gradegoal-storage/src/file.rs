//! JSON file repository.
//!
//! The whole store lives in one JSON file. A missing or undecodable file
//! reads as "nothing stored", so the store seeds instead of failing.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use gradegoal_core::store::StoreSnapshot;
use gradegoal_core::traits::CourseRepository;

/// Persists the course store to a single JSON file.
#[derive(Debug, Clone)]
pub struct JsonFileRepository {
    path: PathBuf,
}

impl JsonFileRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "state.json".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl CourseRepository for JsonFileRepository {
    fn load(&self) -> Result<Option<StoreSnapshot>> {
        if !self.path.exists() {
            tracing::debug!("no state file at {}", self.path.display());
            return Ok(None);
        }
        let content = std::fs::read_to_string(&self.path)
            .with_context(|| format!("failed to read state from {}", self.path.display()))?;
        let snapshot = StoreSnapshot::decode(&content);
        if snapshot.is_none() {
            tracing::warn!(
                "ignoring unusable state file {}, starting fresh",
                self.path.display()
            );
        }
        Ok(snapshot)
    }

    fn save(&self, snapshot: &StoreSnapshot) -> Result<()> {
        let json = snapshot.encode().context("failed to serialize courses")?;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        let temp = self.temp_path();
        std::fs::write(&temp, json)
            .with_context(|| format!("failed to write state to {}", temp.display()))?;
        std::fs::rename(&temp, &self.path)
            .with_context(|| format!("failed to replace {}", self.path.display()))?;
        tracing::debug!("saved {} course(s) to {}", snapshot.courses.len(), self.path.display());
        Ok(())
    }
}

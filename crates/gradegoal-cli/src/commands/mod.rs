//! Subcommand implementations and the session they share.

pub mod course;
pub mod item;
pub mod show;
pub mod transfer;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};

use gradegoal_core::model::Course;
use gradegoal_core::store::CourseStore;
use gradegoal_core::traits::UuidIds;
use gradegoal_storage::{load_config_from, GradegoalConfig, JsonFileRepository};

/// An opened course store plus the configuration it came from.
pub struct Session {
    pub store: CourseStore,
    pub config: GradegoalConfig,
}

impl Session {
    pub fn open(config_path: Option<&Path>, state_file: Option<PathBuf>) -> Result<Self> {
        let mut config = load_config_from(config_path)?;
        if let Some(state_file) = state_file {
            config.state_file = state_file;
        }

        let repo = Arc::new(JsonFileRepository::new(&config.state_file));
        tracing::debug!("using state file {}", repo.path().display());
        let store = CourseStore::open(repo, Arc::new(UuidIds)).with_context(|| {
            format!(
                "failed to open course store at {}",
                config.state_file.display()
            )
        })?;

        Ok(Self { store, config })
    }

    /// Resolve a course reference (id or exact name), or the selected course.
    pub fn course_id(&self, reference: Option<&str>) -> Result<String> {
        let Some(reference) = reference else {
            return self
                .store
                .selected()
                .map(|c| c.id.clone())
                .context("no courses");
        };

        if let Some(course) = self.store.course(reference) {
            return Ok(course.id.clone());
        }

        let named: Vec<&Course> = self
            .store
            .courses()
            .iter()
            .filter(|c| c.name == reference)
            .collect();
        match named.as_slice() {
            [course] => Ok(course.id.clone()),
            [] => anyhow::bail!("no course with id or name \"{reference}\""),
            _ => anyhow::bail!(
                "{} courses are named \"{reference}\", use the course id",
                named.len()
            ),
        }
    }

    pub fn course(&self, id: &str) -> Result<&Course> {
        self.store
            .course(id)
            .with_context(|| format!("course not found: {id}"))
    }
}

/// Resolve an item reference: an item id, or a 1-based position.
pub fn item_id(course: &Course, reference: &str) -> Result<String> {
    if let Some(item) = course.item(reference) {
        return Ok(item.id.clone());
    }
    if let Ok(position) = reference.parse::<usize>() {
        if let Some(item) = position.checked_sub(1).and_then(|i| course.items.get(i)) {
            return Ok(item.id.clone());
        }
        anyhow::bail!(
            "\"{}\" has {} item(s), there is no item {position}",
            course.name,
            course.items.len()
        );
    }
    anyhow::bail!("no item \"{reference}\" in \"{}\"", course.name)
}

/// Name shown for an item, with a placeholder when it has none.
pub fn item_label(course: &Course, index: usize) -> String {
    match course.items.get(index) {
        Some(item) if !item.name.is_empty() => item.name.clone(),
        _ => format!("Item {}", index + 1),
    }
}

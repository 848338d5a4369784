//! Course export and import files.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use gradegoal_core::model::Course;
use gradegoal_core::transfer::{self, ALL_COURSES_FILE};

/// Write one course to `<dir>/<sanitized name>.json`.
pub fn export_course_to(dir: &Path, course: &Course) -> Result<PathBuf> {
    let json = transfer::export_course(course).context("failed to serialize course")?;
    write_export(dir, &transfer::export_file_name(course), &json)
}

/// Write every course to `<dir>/all-courses.json`.
pub fn export_all_to(dir: &Path, courses: &[Course]) -> Result<PathBuf> {
    let json = transfer::export_all(courses).context("failed to serialize courses")?;
    write_export(dir, ALL_COURSES_FILE, &json)
}

fn write_export(dir: &Path, file_name: &str, json: &str) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("failed to create export directory {}", dir.display()))?;
    let path = dir.join(file_name);
    std::fs::write(&path, json)
        .with_context(|| format!("failed to write export to {}", path.display()))?;
    tracing::info!("exported to {}", path.display());
    Ok(path)
}

/// Read and decode a single-course file.
pub fn read_course_file(path: &Path) -> Result<Course> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    transfer::parse_course(&content)
        .with_context(|| format!("failed to import {}", path.display()))
}

/// Read and decode an all-courses file.
pub fn read_bundle_file(path: &Path) -> Result<Vec<Course>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    transfer::parse_all(&content).with_context(|| format!("failed to import {}", path.display()))
}

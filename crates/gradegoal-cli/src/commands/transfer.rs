//! The `gradegoal export`, `export-all`, `import`, and `import-all` commands.

use std::path::{Path, PathBuf};

use anyhow::Result;

use gradegoal_storage::exchange;

use super::Session;

pub fn export(session: &Session, reference: Option<&str>, out: Option<PathBuf>) -> Result<()> {
    let id = session.course_id(reference)?;
    let dir = out.unwrap_or_else(|| session.config.export_dir.clone());
    let path = exchange::export_course_to(&dir, session.course(&id)?)?;
    println!("Exported to {}", path.display());
    Ok(())
}

pub fn export_all(session: &Session, out: Option<PathBuf>) -> Result<()> {
    let dir = out.unwrap_or_else(|| session.config.export_dir.clone());
    let path = exchange::export_all_to(&dir, session.store.courses())?;
    println!("Exported {} course(s) to {}", session.store.courses().len(), path.display());
    Ok(())
}

pub fn import(session: &mut Session, file: &Path) -> Result<()> {
    let course = exchange::read_course_file(file)?;
    let original_id = course.id.clone();
    let id = session.store.import_course(course)?;
    if id != original_id {
        println!("Course id {original_id} is already in use, imported as {id}");
    }
    println!("Imported {} ({id})", session.course(&id)?.name);
    Ok(())
}

pub fn import_all(session: &mut Session, file: &Path) -> Result<()> {
    let courses = exchange::read_bundle_file(file)?;
    session.store.replace_all(courses)?;
    println!("Replaced all courses, {} imported", session.store.courses().len());
    Ok(())
}

//! The `gradegoal course` and `gradegoal select` commands.

use anyhow::Result;

use gradegoal_core::StoreError;

use super::Session;
use crate::CourseAction;

pub fn select(session: &mut Session, reference: &str) -> Result<()> {
    let id = session.course_id(Some(reference))?;
    session.store.select(&id)?;
    println!("Selected {}", session.course(&id)?.name);
    Ok(())
}

pub fn execute(session: &mut Session, reference: Option<&str>, action: CourseAction) -> Result<()> {
    match action {
        CourseAction::Add { name } => {
            let id = session.store.add_course_named(name.as_deref())?;
            println!("Added course {} ({id})", session.course(&id)?.name);
        }
        CourseAction::Duplicate => {
            let source = session.course_id(reference)?;
            let id = session.store.duplicate_course(&source)?;
            println!("Created {} ({id})", session.course(&id)?.name);
        }
        CourseAction::Delete { yes } => {
            let id = session.course_id(reference)?;
            let name = session.course(&id)?.name.clone();
            match session.store.delete_course(&id, yes) {
                Err(StoreError::ConfirmationRequired { name }) => {
                    anyhow::bail!(
                        "deleting \"{name}\" cannot be undone, pass --yes to confirm"
                    )
                }
                other => other?,
            }
            println!("Deleted {name}");
        }
        CourseAction::Rename { name } => {
            let id = session.course_id(reference)?;
            session.store.rename_course(&id, &name)?;
            println!("Renamed course to {name}");
        }
        CourseAction::Target { value } => {
            let id = session.course_id(reference)?;
            session.store.set_target(&id, value)?;
            match value.value() {
                Some(t) => println!("Target set to {t}%"),
                None => println!("Target cleared"),
            }
        }
    }
    Ok(())
}

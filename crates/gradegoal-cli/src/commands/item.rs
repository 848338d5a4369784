//! The `gradegoal item` command.

use anyhow::Result;

use gradegoal_core::model::ItemPatch;

use super::{item_id, Session};
use crate::ItemAction;

pub fn execute(session: &mut Session, reference: Option<&str>, action: ItemAction) -> Result<()> {
    let course_id = session.course_id(reference)?;

    match action {
        ItemAction::Add {
            name,
            weight,
            score,
        } => {
            let patch = ItemPatch {
                name,
                weight,
                score,
            };
            let id = session.store.add_item(&course_id, &patch)?;
            let position = session.course(&course_id)?.items.len();
            println!("Added item {position} ({id})");
        }
        ItemAction::Set {
            item,
            name,
            weight,
            score,
        } => {
            let patch = ItemPatch {
                name,
                weight,
                score,
            };
            if patch.is_empty() {
                anyhow::bail!("nothing to change, pass --name, --weight, or --score");
            }
            let id = item_id(session.course(&course_id)?, &item)?;
            session.store.update_item(&course_id, &id, &patch)?;
            println!("Updated item {id}");
        }
        ItemAction::Remove { item } => {
            let id = item_id(session.course(&course_id)?, &item)?;
            session.store.remove_item(&course_id, &id)?;
            println!("Removed item {id}");
        }
    }
    Ok(())
}

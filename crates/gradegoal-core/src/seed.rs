//! Default and example courses.

use crate::model::{Course, Item, Mark, DEFAULT_TARGET, NEW_COURSE_NAME};
use crate::traits::IdGenerator;

/// Names of the items every new course starts with.
pub const DEFAULT_ITEM_NAMES: [&str; 6] = ["A1S1", "A2S1", "A1S2", "A2S2", "AF1", "AF2"];

/// Name of the course seeded on first run.
pub const EXAMPLE_COURSE_NAME: &str = "Man Acc 288";

pub fn default_items(ids: &dyn IdGenerator) -> Vec<Item> {
    DEFAULT_ITEM_NAMES
        .iter()
        .map(|name| Item::blank(ids.next_id(), *name))
        .collect()
}

/// A new course with the default blank items.
pub fn new_course(ids: &dyn IdGenerator) -> Course {
    Course {
        id: ids.next_id(),
        name: NEW_COURSE_NAME.to_string(),
        target: Mark::new(DEFAULT_TARGET),
        items: default_items(ids),
    }
}

/// The course created when no saved state exists.
pub fn example_course(ids: &dyn IdGenerator) -> Course {
    let preset = |name: &str| -> (Mark, Mark) {
        match name {
            "A1S1" => (Mark::new(10.0), Mark::new(47.0)),
            "A2S1" => (Mark::new(10.0), Mark::new(60.0)),
            "A1S2" => (Mark::new(10.0), Mark::new(38.0)),
            "A2S2" => (Mark::new(20.0), Mark::Blank),
            "AF1" => (Mark::new(25.0), Mark::new(95.0)),
            "AF2" => (Mark::new(25.0), Mark::new(90.0)),
            _ => (Mark::Blank, Mark::Blank),
        }
    };

    let mut course = new_course(ids);
    course.name = EXAMPLE_COURSE_NAME.to_string();
    course.items = course
        .items
        .into_iter()
        .map(|item| {
            let (weight, score) = preset(&item.name);
            Item {
                weight,
                score,
                ..item
            }
        })
        .collect();
    course
}

//! The course store: ordered courses plus the selected course.
//!
//! Every mutation builds a replacement course list, hands it to the
//! repository, and only swaps it in after the save succeeds. Courses and
//! items are addressed by id, never by position.

use std::collections::HashSet;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::engine::{compute, GradeResults};
use crate::error::StoreError;
use crate::model::{Course, Item, ItemPatch, Mark, COPY_SUFFIX};
use crate::seed;
use crate::traits::{CourseRepository, IdGenerator};

/// The persisted record: all courses and the selected one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreSnapshot {
    pub courses: Vec<Course>,
    #[serde(default)]
    pub selected_id: Option<String>,
}

impl StoreSnapshot {
    /// Decode a stored record, or `None` when it is malformed or has no
    /// courses.
    pub fn decode(raw: &str) -> Option<Self> {
        match serde_json::from_str::<StoreSnapshot>(raw) {
            Ok(snapshot) if !snapshot.courses.is_empty() => Some(snapshot),
            Ok(_) => {
                tracing::warn!("stored state has no courses");
                None
            }
            Err(e) => {
                tracing::warn!("stored state is malformed: {e}");
                None
            }
        }
    }

    pub fn encode(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Owns the course list and keeps the repository in step with it.
pub struct CourseStore {
    courses: Vec<Course>,
    selected_id: Option<String>,
    repo: Arc<dyn CourseRepository>,
    ids: Arc<dyn IdGenerator>,
}

impl std::fmt::Debug for CourseStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CourseStore")
            .field("courses", &self.courses.len())
            .field("selected_id", &self.selected_id)
            .finish()
    }
}

impl CourseStore {
    /// Load the store from `repo`, seeding the example course when nothing
    /// usable is stored.
    pub fn open(
        repo: Arc<dyn CourseRepository>,
        ids: Arc<dyn IdGenerator>,
    ) -> anyhow::Result<Self> {
        let loaded = repo.load()?.filter(|s| !s.courses.is_empty());

        let mut store = Self {
            courses: Vec::new(),
            selected_id: None,
            repo,
            ids,
        };

        match loaded {
            Some(snapshot) => {
                let selected = snapshot
                    .selected_id
                    .filter(|id| snapshot.courses.iter().any(|c| &c.id == id))
                    .or_else(|| snapshot.courses.first().map(|c| c.id.clone()));
                store.courses = snapshot.courses;
                store.selected_id = selected;
                tracing::debug!(courses = store.courses.len(), "loaded course store");
            }
            None => {
                let course = seed::example_course(store.ids.as_ref());
                tracing::info!(course = %course.id, "no saved courses, seeding example course");
                let selected = Some(course.id.clone());
                store.commit(vec![course], selected)?;
            }
        }

        Ok(store)
    }

    // -- reads ---------------------------------------------------------------

    pub fn courses(&self) -> &[Course] {
        &self.courses
    }

    pub fn course(&self, id: &str) -> Option<&Course> {
        self.courses.iter().find(|c| c.id == id)
    }

    pub fn selected_id(&self) -> Option<&str> {
        self.selected_id.as_deref()
    }

    /// The selected course, falling back to the first one.
    pub fn selected(&self) -> Option<&Course> {
        self.selected_id
            .as_deref()
            .and_then(|id| self.course(id))
            .or_else(|| self.courses.first())
    }

    /// Fresh grade results for a course.
    pub fn results(&self, id: &str) -> Result<GradeResults, StoreError> {
        self.course(id)
            .map(compute)
            .ok_or_else(|| StoreError::CourseNotFound(id.to_string()))
    }

    pub fn snapshot(&self) -> StoreSnapshot {
        StoreSnapshot {
            courses: self.courses.clone(),
            selected_id: self.selected_id.clone(),
        }
    }

    // -- course mutations ----------------------------------------------------

    pub fn select(&mut self, id: &str) -> Result<(), StoreError> {
        self.require(id)?;
        self.commit(self.courses.clone(), Some(id.to_string()))
    }

    /// Append a new course with the default items and select it.
    pub fn add_course(&mut self) -> Result<String, StoreError> {
        self.add_course_named(None)
    }

    /// Like [`add_course`](Self::add_course), naming the course in the same
    /// save.
    pub fn add_course_named(&mut self, name: Option<&str>) -> Result<String, StoreError> {
        let mut course = seed::new_course(self.ids.as_ref());
        if let Some(name) = name {
            course.name = name.to_string();
        }
        let id = course.id.clone();
        let mut next = self.courses.clone();
        next.push(course);
        self.commit(next, Some(id.clone()))?;
        tracing::info!(course = %id, "added course");
        Ok(id)
    }

    /// Deep-copy a course under fresh ids and select the copy.
    pub fn duplicate_course(&mut self, id: &str) -> Result<String, StoreError> {
        let source = self.require(id)?;
        let copy = Course {
            id: self.ids.next_id(),
            name: format!("{}{COPY_SUFFIX}", source.name),
            target: source.target,
            items: source
                .items
                .iter()
                .map(|it| Item {
                    id: self.ids.next_id(),
                    ..it.clone()
                })
                .collect(),
        };
        let copy_id = copy.id.clone();
        let mut next = self.courses.clone();
        next.push(copy);
        self.commit(next, Some(copy_id.clone()))?;
        tracing::info!(source = %id, course = %copy_id, "duplicated course");
        Ok(copy_id)
    }

    /// Delete a course. The last remaining course cannot be deleted, and
    /// any other deletion must be confirmed. Selection moves to the first
    /// remaining course.
    pub fn delete_course(&mut self, id: &str, confirmed: bool) -> Result<(), StoreError> {
        let course = self.require(id)?;
        if self.courses.len() <= 1 {
            tracing::warn!(course = %id, "refusing to delete the last course");
            return Err(StoreError::LastCourse);
        }
        if !confirmed {
            return Err(StoreError::ConfirmationRequired {
                name: course.name.clone(),
            });
        }

        let next: Vec<Course> = self
            .courses
            .iter()
            .filter(|c| c.id != id)
            .cloned()
            .collect();
        let selected = next.first().map(|c| c.id.clone());
        self.commit(next, selected)?;
        tracing::info!(course = %id, "deleted course");
        Ok(())
    }

    pub fn rename_course(&mut self, id: &str, name: &str) -> Result<(), StoreError> {
        let next = self.patched(id, |c| Course {
            name: name.to_string(),
            ..c.clone()
        })?;
        self.commit(next, self.selected_id.clone())
    }

    pub fn set_target(&mut self, id: &str, target: Mark) -> Result<(), StoreError> {
        let next = self.patched(id, |c| Course {
            target,
            ..c.clone()
        })?;
        self.commit(next, self.selected_id.clone())
    }

    // -- item mutations ------------------------------------------------------

    /// Append a blank item, with `patch` applied, to a course.
    pub fn add_item(&mut self, course_id: &str, patch: &ItemPatch) -> Result<String, StoreError> {
        let item = patch.apply(&Item::blank(self.ids.next_id(), ""));
        let item_id = item.id.clone();
        let next = self.patched(course_id, move |c| {
            let mut items = c.items.clone();
            items.push(item);
            Course {
                items,
                ..c.clone()
            }
        })?;
        self.commit(next, self.selected_id.clone())?;
        tracing::info!(course = %course_id, item = %item_id, "added item");
        Ok(item_id)
    }

    pub fn update_item(
        &mut self,
        course_id: &str,
        item_id: &str,
        patch: &ItemPatch,
    ) -> Result<(), StoreError> {
        self.require_item(course_id, item_id)?;
        let next = self.patched(course_id, |c| Course {
            items: c
                .items
                .iter()
                .map(|it| if it.id == item_id { patch.apply(it) } else { it.clone() })
                .collect(),
            ..c.clone()
        })?;
        self.commit(next, self.selected_id.clone())
    }

    pub fn remove_item(&mut self, course_id: &str, item_id: &str) -> Result<(), StoreError> {
        self.require_item(course_id, item_id)?;
        let next = self.patched(course_id, |c| Course {
            items: c.items.iter().filter(|it| it.id != item_id).cloned().collect(),
            ..c.clone()
        })?;
        self.commit(next, self.selected_id.clone())?;
        tracing::info!(course = %course_id, item = %item_id, "removed item");
        Ok(())
    }

    // -- imports -------------------------------------------------------------

    /// Append an imported course and select it.
    ///
    /// The imported id is kept unless another course already uses it, in
    /// which case a fresh id is assigned. Item ids repeated inside the
    /// course are regenerated as well. Returns the id the course ends up
    /// with.
    pub fn import_course(&mut self, course: Course) -> Result<String, StoreError> {
        let taken: HashSet<&str> = self.courses.iter().map(|c| c.id.as_str()).collect();
        let mut course = self.unique_items(course);
        if taken.contains(course.id.as_str()) {
            let fresh = self.ids.next_id();
            tracing::warn!(imported = %course.id, course = %fresh, "course id already in use, assigning a new one");
            course.id = fresh;
        }

        let id = course.id.clone();
        let mut next = self.courses.clone();
        next.push(course);
        self.commit(next, Some(id.clone()))?;
        tracing::info!(course = %id, "imported course");
        Ok(id)
    }

    /// Replace every course and select the first. Ids repeated within the
    /// bundle are regenerated.
    pub fn replace_all(&mut self, courses: Vec<Course>) -> Result<(), StoreError> {
        if courses.is_empty() {
            tracing::warn!("refusing to replace courses with an empty import");
            return Err(StoreError::EmptyImport);
        }

        let mut seen = HashSet::new();
        let next: Vec<Course> = courses
            .into_iter()
            .map(|course| {
                let mut course = self.unique_items(course);
                if !seen.insert(course.id.clone()) {
                    course.id = self.ids.next_id();
                    seen.insert(course.id.clone());
                }
                course
            })
            .collect();

        let selected = next.first().map(|c| c.id.clone());
        let count = next.len();
        self.commit(next, selected)?;
        tracing::info!(courses = count, "replaced all courses");
        Ok(())
    }

    // -- internals -----------------------------------------------------------

    fn require(&self, id: &str) -> Result<&Course, StoreError> {
        self.course(id)
            .ok_or_else(|| StoreError::CourseNotFound(id.to_string()))
    }

    fn require_item(&self, course_id: &str, item_id: &str) -> Result<&Item, StoreError> {
        self.require(course_id)?
            .item(item_id)
            .ok_or_else(|| StoreError::ItemNotFound {
                course_id: course_id.to_string(),
                item_id: item_id.to_string(),
            })
    }

    /// A copy of the course list with course `id` replaced by `patch(course)`.
    fn patched(
        &self,
        id: &str,
        patch: impl FnOnce(&Course) -> Course,
    ) -> Result<Vec<Course>, StoreError> {
        let index = self
            .courses
            .iter()
            .position(|c| c.id == id)
            .ok_or_else(|| StoreError::CourseNotFound(id.to_string()))?;
        let mut next = self.courses.clone();
        next[index] = patch(&self.courses[index]);
        Ok(next)
    }

    fn unique_items(&self, mut course: Course) -> Course {
        let mut seen = HashSet::new();
        for item in &mut course.items {
            if !seen.insert(item.id.clone()) {
                item.id = self.ids.next_id();
                seen.insert(item.id.clone());
            }
        }
        course
    }

    fn commit(
        &mut self,
        courses: Vec<Course>,
        selected_id: Option<String>,
    ) -> Result<(), StoreError> {
        let snapshot = StoreSnapshot {
            courses,
            selected_id,
        };
        self.repo.save(&snapshot).map_err(StoreError::Persistence)?;
        self.courses = snapshot.courses;
        self.selected_id = snapshot.selected_id;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed::EXAMPLE_COURSE_NAME;
    use crate::traits::{MemoryRepository, SequentialIds};

    struct FailingRepository;

    impl CourseRepository for FailingRepository {
        fn load(&self) -> anyhow::Result<Option<StoreSnapshot>> {
            Ok(Some(StoreSnapshot {
                courses: vec![Course {
                    id: "c1".into(),
                    name: "Stats".into(),
                    target: Mark::new(50.0),
                    items: vec![],
                }],
                selected_id: None,
            }))
        }

        fn save(&self, _: &StoreSnapshot) -> anyhow::Result<()> {
            anyhow::bail!("disk full")
        }
    }

    fn open_fresh() -> (Arc<MemoryRepository>, CourseStore) {
        let repo = Arc::new(MemoryRepository::new());
        let store = CourseStore::open(repo.clone(), Arc::new(SequentialIds::new("t"))).unwrap();
        (repo, store)
    }

    #[test]
    fn open_seeds_and_saves_example_course() {
        let (repo, store) = open_fresh();
        assert_eq!(store.courses().len(), 1);
        let selected = store.selected().unwrap();
        assert_eq!(selected.name, EXAMPLE_COURSE_NAME);
        assert_eq!(store.selected_id(), Some(selected.id.as_str()));
        assert_eq!(repo.save_count(), 1);
        assert_eq!(repo.stored().unwrap(), store.snapshot());
    }

    #[test]
    fn open_falls_back_to_first_course_for_stale_selection() {
        let (repo, mut store) = open_fresh();
        store.add_course().unwrap();
        let mut snapshot = repo.stored().unwrap();
        snapshot.selected_id = Some("gone".into());

        let reopened = CourseStore::open(
            Arc::new(MemoryRepository::with_snapshot(snapshot)),
            Arc::new(SequentialIds::new("r")),
        )
        .unwrap();
        assert_eq!(reopened.selected_id(), Some(reopened.courses()[0].id.as_str()));
    }

    #[test]
    fn add_course_selects_it() {
        let (_, mut store) = open_fresh();
        let id = store.add_course().unwrap();
        assert_eq!(store.courses().len(), 2);
        assert_eq!(store.selected_id(), Some(id.as_str()));
        assert_eq!(store.selected().unwrap().items.len(), 6);
    }

    #[test]
    fn add_course_named_saves_once() {
        let (repo, mut store) = open_fresh();
        let saves = repo.save_count();
        let id = store.add_course_named(Some("Physics")).unwrap();
        assert_eq!(repo.save_count(), saves + 1);
        assert_eq!(store.course(&id).unwrap().name, "Physics");
        assert_eq!(repo.stored().unwrap(), store.snapshot());
    }

    #[test]
    fn duplicate_uses_fresh_ids_everywhere() {
        let (_, mut store) = open_fresh();
        let source = store.selected().unwrap().clone();
        let copy_id = store.duplicate_course(&source.id).unwrap();
        let copy = store.course(&copy_id).unwrap();

        assert_ne!(copy.id, source.id);
        assert_eq!(copy.name, format!("{} (Copy)", source.name));
        assert_eq!(copy.items.len(), source.items.len());
        for (a, b) in copy.items.iter().zip(&source.items) {
            assert_ne!(a.id, b.id);
            assert_eq!(a.name, b.name);
            assert_eq!(a.weight, b.weight);
            assert_eq!(a.score, b.score);
        }
        assert_eq!(store.selected_id(), Some(copy_id.as_str()));
    }

    #[test]
    fn delete_requires_confirmation_and_refuses_last() {
        let (repo, mut store) = open_fresh();
        let first = store.courses()[0].id.clone();
        let saves = repo.save_count();
        assert!(matches!(
            store.delete_course(&first, true),
            Err(StoreError::LastCourse)
        ));
        assert_eq!(repo.save_count(), saves);

        let second = store.add_course().unwrap();
        assert!(matches!(
            store.delete_course(&first, false),
            Err(StoreError::ConfirmationRequired { .. })
        ));
        assert_eq!(store.courses().len(), 2);

        store.delete_course(&first, true).unwrap();
        assert_eq!(store.courses().len(), 1);
        assert_eq!(store.selected_id(), Some(second.as_str()));
    }

    #[test]
    fn delete_unknown_course_is_not_found_even_when_last() {
        let (_, mut store) = open_fresh();
        assert!(matches!(
            store.delete_course("nope", true),
            Err(StoreError::CourseNotFound(_))
        ));
    }

    #[test]
    fn delete_selects_first_remaining() {
        let (_, mut store) = open_fresh();
        let first = store.courses()[0].id.clone();
        let second = store.add_course().unwrap();
        store.add_course().unwrap();
        store.delete_course(&second, true).unwrap();
        assert_eq!(store.selected_id(), Some(first.as_str()));
    }

    #[test]
    fn item_crud_preserves_identity() {
        let (_, mut store) = open_fresh();
        let course_id = store.courses()[0].id.clone();

        let item_id = store
            .add_item(
                &course_id,
                &ItemPatch {
                    name: Some("Lab".into()),
                    weight: Some(Mark::new(15.0)),
                    ..Default::default()
                },
            )
            .unwrap();
        let course = store.course(&course_id).unwrap();
        assert_eq!(course.items.len(), 7);
        assert_eq!(course.items[6].id, item_id);
        assert_eq!(course.items[6].name, "Lab");
        assert!(course.items[6].score.is_blank());

        store
            .update_item(
                &course_id,
                &item_id,
                &ItemPatch {
                    score: Some(Mark::new(88.0)),
                    ..Default::default()
                },
            )
            .unwrap();
        let item = store.course(&course_id).unwrap().item(&item_id).unwrap();
        assert_eq!(item.score, Mark::new(88.0));
        assert_eq!(item.weight, Mark::new(15.0));

        store.remove_item(&course_id, &item_id).unwrap();
        assert!(store.course(&course_id).unwrap().item(&item_id).is_none());
        assert!(matches!(
            store.remove_item(&course_id, &item_id),
            Err(StoreError::ItemNotFound { .. })
        ));
    }

    #[test]
    fn rename_and_target_change_results() {
        let (_, mut store) = open_fresh();
        let id = store.courses()[0].id.clone();
        store.rename_course(&id, "Managerial Accounting").unwrap();
        store.set_target(&id, Mark::new(95.0)).unwrap();

        let course = store.course(&id).unwrap();
        assert_eq!(course.name, "Managerial Accounting");
        let needed = store.results(&id).unwrap().needed_average_on_remaining.unwrap();
        assert!((needed - 171.25).abs() < 1e-9);
    }

    #[test]
    fn out_of_range_marks_are_clamped_when_stored() {
        let (_, mut store) = open_fresh();
        let id = store.courses()[0].id.clone();
        store.set_target(&id, Mark::new(250.0)).unwrap();
        let item_id = store
            .add_item(
                &id,
                &ItemPatch {
                    weight: Some(Mark::new(-20.0)),
                    score: Some("150".parse().unwrap()),
                    ..Default::default()
                },
            )
            .unwrap();

        let course = store.course(&id).unwrap();
        assert_eq!(course.target.value(), Some(100.0));
        let item = course.item(&item_id).unwrap();
        assert_eq!(item.weight.value(), Some(0.0));
        assert_eq!(item.score.value(), Some(100.0));

        let needed = store.results(&id).unwrap().needed_average_on_remaining.unwrap();
        assert!((needed - 196.25).abs() < 1e-9, "needed {needed}");

        let json = crate::transfer::export_course(course).unwrap();
        assert_eq!(&crate::transfer::parse_course(&json).unwrap(), course);
    }

    #[test]
    fn unknown_course_is_reported() {
        let (_, mut store) = open_fresh();
        assert!(matches!(
            store.rename_course("nope", "x"),
            Err(StoreError::CourseNotFound(_))
        ));
        assert!(matches!(store.select("nope"), Err(StoreError::CourseNotFound(_))));
        assert!(store.results("nope").is_err());
    }

    #[test]
    fn import_regenerates_colliding_ids() {
        let (_, mut store) = open_fresh();
        let existing = store.courses()[0].clone();

        let mut imported = existing.clone();
        imported.items[1].id = imported.items[0].id.clone();
        let id = store.import_course(imported).unwrap();

        assert_ne!(id, existing.id);
        assert_eq!(store.selected_id(), Some(id.as_str()));
        let course = store.course(&id).unwrap();
        assert_ne!(course.items[0].id, course.items[1].id);
        assert_eq!(course.items[0].id, existing.items[0].id);
    }

    #[test]
    fn import_keeps_unique_id() {
        let (_, mut store) = open_fresh();
        let course = Course {
            id: "imported".into(),
            name: "Imported".into(),
            target: Mark::new(70.0),
            items: vec![],
        };
        assert_eq!(store.import_course(course).unwrap(), "imported");
    }

    #[test]
    fn replace_all_rejects_empty_and_selects_first() {
        let (_, mut store) = open_fresh();
        let before = store.snapshot();
        assert!(matches!(store.replace_all(vec![]), Err(StoreError::EmptyImport)));
        assert_eq!(store.snapshot(), before);

        let make = |id: &str| Course {
            id: id.into(),
            name: id.into(),
            target: Mark::new(50.0),
            items: vec![],
        };
        store.replace_all(vec![make("x"), make("x"), make("y")]).unwrap();
        let ids: Vec<&str> = store.courses().iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids[0], "x");
        assert_ne!(ids[1], "x");
        assert_eq!(ids[2], "y");
        assert_eq!(store.selected_id(), Some("x"));
    }

    #[test]
    fn failed_save_leaves_store_unchanged() {
        let mut store =
            CourseStore::open(Arc::new(FailingRepository), Arc::new(SequentialIds::default()))
                .unwrap();
        let before = store.snapshot();
        assert!(matches!(
            store.rename_course("c1", "Other"),
            Err(StoreError::Persistence(_))
        ));
        assert!(store.add_course().is_err());
        assert_eq!(store.snapshot(), before);
    }

    #[test]
    fn snapshot_decode_rejects_malformed_or_empty() {
        assert!(StoreSnapshot::decode("not json").is_none());
        assert!(StoreSnapshot::decode(r#"{"courses": []}"#).is_none());
        assert!(StoreSnapshot::decode(r#"{"selectedId": "a"}"#).is_none());

        let decoded = StoreSnapshot::decode(
            r#"{"courses": [{"id": "a", "name": "A", "target": 60, "items": []}], "selectedId": "a"}"#,
        )
        .unwrap();
        assert_eq!(decoded.selected_id.as_deref(), Some("a"));
        assert_eq!(decoded.courses[0].target, Mark::new(60.0));
    }

    #[test]
    fn snapshot_uses_camel_case_selection_key() {
        let (_, store) = open_fresh();
        let json = store.snapshot().encode().unwrap();
        assert!(json.contains("\"selectedId\""));
    }
}

//! JSON export and import of courses.
//!
//! Import never touches the store directly: callers parse first and only
//! hand a decoded course to the store, so a bad file changes nothing.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::TransferError;
use crate::model::Course;

/// File name used when exporting every course.
pub const ALL_COURSES_FILE: &str = "all-courses.json";

/// Wire shape of a full export.
#[derive(Debug, Serialize, Deserialize)]
struct CourseBundle {
    courses: Vec<Course>,
}

/// File name for a single-course export: the course name reduced to ASCII
/// letters, digits, spaces, `-` and `_`, or `course` if nothing is left.
pub fn export_file_name(course: &Course) -> String {
    let kept: String = course
        .name
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, ' ' | '-' | '_'))
        .collect();
    let stem = kept.trim();
    if stem.is_empty() {
        "course.json".to_string()
    } else {
        format!("{stem}.json")
    }
}

/// Pretty-printed JSON for one course.
pub fn export_course(course: &Course) -> serde_json::Result<String> {
    serde_json::to_string_pretty(course)
}

/// Pretty-printed JSON `{ "courses": [...] }`.
pub fn export_all(courses: &[Course]) -> serde_json::Result<String> {
    #[derive(Serialize)]
    struct BundleRef<'a> {
        courses: &'a [Course],
    }
    serde_json::to_string_pretty(&BundleRef { courses })
}

/// Parse a single exported course.
///
/// The record must carry a non-empty `id` and `name`. Non-zero numbers are
/// accepted for either and read as text.
pub fn parse_course(raw: &str) -> Result<Course, TransferError> {
    let mut value: Value = serde_json::from_str(raw).map_err(TransferError::InvalidJson)?;

    if !require_text(&mut value, "id") || !require_text(&mut value, "name") {
        return Err(TransferError::InvalidCourse);
    }

    serde_json::from_value(value).map_err(|e| {
        tracing::debug!("course record did not decode: {e}");
        TransferError::InvalidCourse
    })
}

/// Whether `record[key]` is a non-empty string or a non-zero number. Numbers
/// are rewritten in place as strings.
fn require_text(record: &mut Value, key: &str) -> bool {
    let text = match record.get(key) {
        Some(Value::String(s)) => return !s.is_empty(),
        Some(Value::Number(n)) if n.as_f64() != Some(0.0) => n.to_string(),
        _ => return false,
    };
    record[key] = Value::String(text);
    true
}

/// Parse a full export. The `courses` array must be present and non-empty.
pub fn parse_all(raw: &str) -> Result<Vec<Course>, TransferError> {
    let value: Value = serde_json::from_str(raw).map_err(TransferError::InvalidJson)?;

    let non_empty = value
        .get("courses")
        .and_then(Value::as_array)
        .is_some_and(|a| !a.is_empty());
    if !non_empty {
        return Err(TransferError::InvalidBundle);
    }

    let bundle: CourseBundle = serde_json::from_value(value).map_err(|e| {
        tracing::debug!("course bundle did not decode: {e}");
        TransferError::InvalidBundle
    })?;
    Ok(bundle.courses)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Item, Mark};

    fn sample() -> Course {
        Course {
            id: "c1".into(),
            name: "Man Acc 288".into(),
            target: Mark::new(65.0),
            items: vec![
                Item {
                    id: "i1".into(),
                    name: "A1S1".into(),
                    weight: Mark::new(10.0),
                    score: Mark::new(47.0),
                },
                Item::blank("i2", "A2S2"),
            ],
        }
    }

    #[test]
    fn file_name_is_sanitized() {
        let mut course = sample();
        assert_eq!(export_file_name(&course), "Man Acc 288.json");
        course.name = "  Physics/II: Waves! ".into();
        assert_eq!(export_file_name(&course), "PhysicsII Waves.json");
        course.name = "stats_101-b".into();
        assert_eq!(export_file_name(&course), "stats_101-b.json");
        course.name = "???".into();
        assert_eq!(export_file_name(&course), "course.json");
        course.name = String::new();
        assert_eq!(export_file_name(&course), "course.json");
        course.name = "Café".into();
        assert_eq!(export_file_name(&course), "Caf.json");
    }

    #[test]
    fn exported_course_imports_back_unchanged() {
        let course = sample();
        let json = export_course(&course).unwrap();
        assert!(json.contains("\n  \"id\": \"c1\""));
        assert_eq!(parse_course(&json).unwrap(), course);
    }

    #[test]
    fn export_all_wraps_courses() {
        let json = export_all(&[sample()]).unwrap();
        let value: Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["courses"][0]["name"], "Man Acc 288");
        assert_eq!(parse_all(&json).unwrap(), vec![sample()]);
    }

    #[test]
    fn malformed_json_is_reported() {
        assert!(matches!(
            parse_course("{not json"),
            Err(TransferError::InvalidJson(_))
        ));
        assert!(matches!(parse_all("]"), Err(TransferError::InvalidJson(_))));
    }

    #[test]
    fn course_without_id_or_name_is_rejected() {
        for raw in [
            r#"{"name": "Bio"}"#,
            r#"{"id": "c1"}"#,
            r#"{"id": "", "name": "Bio"}"#,
            r#"{"id": "c1", "name": ""}"#,
            r#"[1, 2, 3]"#,
            r#"{"courses": []}"#,
        ] {
            assert!(
                matches!(parse_course(raw), Err(TransferError::InvalidCourse)),
                "accepted {raw}"
            );
        }
    }

    #[test]
    fn numeric_course_id_is_read_as_text() {
        let course = parse_course(r#"{"id": 7, "name": "Bio", "items": []}"#).unwrap();
        assert_eq!(course.id, "7");
        assert_eq!(course.name, "Bio");
        assert!(matches!(
            parse_course(r#"{"id": 0, "name": "Bio"}"#),
            Err(TransferError::InvalidCourse)
        ));
        assert!(matches!(
            parse_course(r#"{"id": true, "name": "Bio"}"#),
            Err(TransferError::InvalidCourse)
        ));
    }

    #[test]
    fn course_with_broken_items_is_rejected() {
        let raw = r#"{"id": "c1", "name": "Bio", "items": [{"name": "no id"}]}"#;
        assert!(matches!(parse_course(raw), Err(TransferError::InvalidCourse)));
    }

    #[test]
    fn blank_strings_from_older_exports_decode() {
        let raw = r#"{"id": "c1", "name": "Bio", "target": 50,
            "items": [{"id": "i1", "name": "Quiz", "weight": "", "score": ""}]}"#;
        let course = parse_course(raw).unwrap();
        assert!(course.items[0].weight.is_blank());
        assert!(course.items[0].score.is_blank());
    }

    #[test]
    fn bundle_requires_non_empty_courses() {
        assert!(matches!(
            parse_all(r#"{"courses": []}"#),
            Err(TransferError::InvalidBundle)
        ));
        assert!(matches!(
            parse_all(r#"{"id": "c1", "name": "Bio"}"#),
            Err(TransferError::InvalidBundle)
        ));
        assert!(matches!(
            parse_all(r#"{"courses": [{"name": "no id"}]}"#),
            Err(TransferError::InvalidBundle)
        ));
    }
}

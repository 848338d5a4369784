//! Error types for the course store and file transfer.
//!
//! The grade engine itself has no error type: it treats malformed numeric
//! fields as absent.

use thiserror::Error;

/// Errors raised by [`crate::store::CourseStore`] mutations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The store must always keep at least one course.
    #[error("keep at least one course")]
    LastCourse,

    /// Deleting a course needs explicit confirmation.
    #[error("delete course \"{name}\"? This cannot be undone (confirmation required)")]
    ConfirmationRequired { name: String },

    /// No course with this id exists.
    #[error("course not found: {0}")]
    CourseNotFound(String),

    /// No item with this id exists in the given course.
    #[error("item not found: {item_id} (course {course_id})")]
    ItemNotFound { course_id: String, item_id: String },

    /// A bulk import carried no courses.
    #[error("import contains no courses")]
    EmptyImport,

    /// The repository failed to persist the new state.
    #[error("failed to save courses: {0:#}")]
    Persistence(anyhow::Error),
}

/// Errors raised while decoding imported course files.
#[derive(Debug, Error)]
pub enum TransferError {
    /// The file is not valid JSON.
    #[error("Invalid JSON file")]
    InvalidJson(#[source] serde_json::Error),

    /// The JSON parsed but is not a course record.
    #[error("Invalid course file")]
    InvalidCourse,

    /// The JSON parsed but has no non-empty `courses` array.
    #[error("Invalid courses file")]
    InvalidBundle,
}

/// A weight, score, or target that is not a number.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("not a number: {0:?}")]
pub struct InvalidMark(pub String);

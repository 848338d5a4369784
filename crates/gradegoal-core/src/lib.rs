//! gradegoal-core — Grade engine, course model, and course store.
//!
//! This crate defines the course data model, the pure grade computation,
//! and the store that owns the ordered list of courses.

pub mod display;
pub mod engine;
pub mod error;
pub mod model;
pub mod seed;
pub mod store;
pub mod traits;
pub mod transfer;

pub use engine::{compute, GradeResults, ItemRow};
pub use error::{InvalidMark, StoreError, TransferError};
pub use model::{Course, Item, ItemPatch, Mark, Percent};
pub use store::{CourseStore, StoreSnapshot};

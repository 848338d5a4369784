//! gradegoal-storage — File persistence and configuration.
//!
//! Implements `CourseRepository` over a JSON state file, reads and writes
//! course export files, and loads the TOML configuration.

pub mod config;
pub mod exchange;
pub mod file;

pub use config::{load_config, load_config_from, GradegoalConfig};
pub use file::JsonFileRepository;

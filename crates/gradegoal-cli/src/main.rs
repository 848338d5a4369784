//! gradegoal CLI — track weighted course grades and what you still need.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use gradegoal_core::model::Mark;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(
    name = "gradegoal",
    version,
    about = "Weighted grade calculator: current grade, grade needed, projected final"
)]
struct Cli {
    /// Config file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// State file path (overrides the config file and GRADEGOAL_STATE)
    #[arg(long, global = true)]
    state: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show grades for a course
    Show {
        /// Course id or name (default: selected course)
        #[arg(long)]
        course: Option<String>,

        /// Output format: text, json
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// List courses
    List,

    /// Select the course other commands act on
    Select {
        /// Course id or name
        course: String,
    },

    /// Add, duplicate, delete, rename, or retarget a course
    Course {
        /// Course id or name (default: selected course)
        #[arg(long, global = true)]
        course: Option<String>,

        #[command(subcommand)]
        action: CourseAction,
    },

    /// Add, edit, or remove items of a course
    Item {
        /// Course id or name (default: selected course)
        #[arg(long, global = true)]
        course: Option<String>,

        #[command(subcommand)]
        action: ItemAction,
    },

    /// Export a course to <name>.json
    Export {
        /// Course id or name (default: selected course)
        #[arg(long)]
        course: Option<String>,

        /// Output directory (default: export_dir from config)
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Export every course to all-courses.json
    ExportAll {
        /// Output directory (default: export_dir from config)
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Import a single course file and select it
    Import {
        /// Course JSON file
        file: PathBuf,
    },

    /// Replace all courses with the contents of an all-courses file
    ImportAll {
        /// All-courses JSON file
        file: PathBuf,
    },
}

#[derive(Subcommand)]
pub enum CourseAction {
    /// Create a course with the default items and select it
    Add {
        /// Name for the new course
        #[arg(long)]
        name: Option<String>,
    },

    /// Copy a course under new ids and select the copy
    Duplicate,

    /// Delete a course
    Delete {
        /// Confirm the deletion
        #[arg(long)]
        yes: bool,
    },

    /// Rename a course
    Rename {
        /// New name
        name: String,
    },

    /// Set the target grade (0-100, "" to clear)
    Target {
        #[arg(allow_negative_numbers = true, value_parser = parse_mark)]
        value: Mark,
    },
}

#[derive(Subcommand)]
pub enum ItemAction {
    /// Append an item
    Add {
        /// Item name
        #[arg(long)]
        name: Option<String>,

        /// Weight in percent (0-100)
        #[arg(long, allow_negative_numbers = true, value_parser = parse_mark)]
        weight: Option<Mark>,

        /// Score in percent (0-100); leave out for ungraded work
        #[arg(long, allow_negative_numbers = true, value_parser = parse_mark)]
        score: Option<Mark>,
    },

    /// Edit an item's fields ("" clears weight or score)
    Set {
        /// Item id or 1-based position
        item: String,

        /// Item name
        #[arg(long)]
        name: Option<String>,

        /// Weight in percent (0-100)
        #[arg(long, allow_negative_numbers = true, value_parser = parse_mark)]
        weight: Option<Mark>,

        /// Score in percent (0-100)
        #[arg(long, allow_negative_numbers = true, value_parser = parse_mark)]
        score: Option<Mark>,
    },

    /// Remove an item
    Remove {
        /// Item id or 1-based position
        item: String,
    },
}

/// Values outside 0-100 are clamped; non-numbers are rejected.
fn parse_mark(s: &str) -> Result<Mark, String> {
    s.parse::<Mark>().map_err(|e| e.to_string())
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("gradegoal=warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = commands::Session::open(cli.config.as_deref(), cli.state).and_then(|mut session| {
        match cli.command {
            Commands::Show { course, format } => {
                commands::show::execute(&session, course.as_deref(), &format)
            }
            Commands::List => commands::show::list(&session),
            Commands::Select { course } => commands::course::select(&mut session, &course),
            Commands::Course { course, action } => {
                commands::course::execute(&mut session, course.as_deref(), action)
            }
            Commands::Item { course, action } => {
                commands::item::execute(&mut session, course.as_deref(), action)
            }
            Commands::Export { course, out } => {
                commands::transfer::export(&session, course.as_deref(), out)
            }
            Commands::ExportAll { out } => commands::transfer::export_all(&session, out),
            Commands::Import { file } => commands::transfer::import(&mut session, &file),
            Commands::ImportAll { file } => commands::transfer::import_all(&mut session, &file),
        }
    });

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

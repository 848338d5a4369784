//! The `gradegoal show` and `gradegoal list` commands.

use anyhow::Result;
use comfy_table::{Cell, Table};
use serde::Serialize;

use gradegoal_core::display::{format_percent, NeedStatus, Pill};
use gradegoal_core::engine::{compute, GradeResults};
use gradegoal_core::model::Course;

use super::{item_label, Session};

#[derive(Serialize)]
struct CourseReport<'a> {
    course: &'a Course,
    results: &'a GradeResults,
    need: NeedStatus,
}

pub fn execute(session: &Session, course: Option<&str>, format: &str) -> Result<()> {
    let id = session.course_id(course)?;
    let course = session.course(&id)?;
    let results = compute(course);

    match format {
        "json" => {
            let report = CourseReport {
                course,
                results: &results,
                need: NeedStatus::of(&results),
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        "text" => print_course(course, &results),
        other => anyhow::bail!("unknown format: {other} (expected text or json)"),
    }

    Ok(())
}

fn target_text(course: &Course) -> String {
    course
        .target
        .value()
        .map_or_else(|| "—".to_string(), |t| format!("{t}%"))
}

fn print_course(course: &Course, results: &GradeResults) {
    let target = target_text(course);

    println!("{}", course.name);
    println!(
        "  current grade:   {:<8} completed weight: {}%",
        format_percent(results.current_average),
        results.completed_weight
    );
    println!(
        "  target grade:    {:<8} remaining weight: {}%",
        target, results.remaining_weight
    );
    println!(
        "  needed on remaining weight: {}",
        NeedStatus::of(results)
    );
    println!(
        "  projected final with entered scores: {}",
        format_percent(results.projected_final)
    );
    println!(
        "  total weight: {}%, {} item(s) ungraded",
        results.total_weight,
        results.pending_count()
    );

    let mut table = Table::new();
    table.set_header(vec!["#", "Item", "Weight", "Score", "Status", "Id"]);

    for (index, row) in results.rows.iter().enumerate() {
        let pill = Pill::for_row(results, row);
        let status = if pill.exceeds_maximum() {
            format!("{pill} (over 100%)")
        } else {
            pill.to_string()
        };
        table.add_row(vec![
            Cell::new(index + 1),
            Cell::new(item_label(course, index)),
            Cell::new(row.item.weight),
            Cell::new(row.item.score),
            Cell::new(status),
            Cell::new(&row.item.id),
        ]);
    }

    println!("\n{table}");
}

pub fn list(session: &Session) -> Result<()> {
    let selected = session.store.selected().map(|c| c.id.as_str());

    let mut table = Table::new();
    table.set_header(vec!["", "Course", "Target", "Items", "Current", "Id"]);

    for course in session.store.courses() {
        let results = compute(course);
        let marker = if Some(course.id.as_str()) == selected { "*" } else { "" };
        table.add_row(vec![
            Cell::new(marker),
            Cell::new(&course.name),
            Cell::new(target_text(course)),
            Cell::new(course.items.len()),
            Cell::new(format_percent(results.current_average)),
            Cell::new(&course.id),
        ]);
    }

    println!("{table}");
    Ok(())
}

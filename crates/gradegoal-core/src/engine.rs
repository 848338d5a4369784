//! Grade computation over weighted, partially graded items.
//!
//! [`compute`] is a pure function of a course. It never fails: blank or
//! non-finite weights count as zero and blank scores mark an item pending.

use serde::Serialize;

use crate::model::{Course, Item};

/// An item with its weight and score resolved for computation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemRow {
    pub item: Item,
    /// Resolved weight; `None` when blank.
    pub weight: Option<f64>,
    /// Resolved score; `None` when not yet graded.
    pub score: Option<f64>,
}

impl ItemRow {
    fn resolve(item: &Item) -> Self {
        Self {
            item: item.clone(),
            weight: item.weight.value(),
            score: item.score.value(),
        }
    }

    /// An item without a score.
    pub fn is_pending(&self) -> bool {
        self.score.is_none()
    }

    /// Grade points this row contributes, with blanks counted as zero.
    fn points(&self) -> f64 {
        (self.weight.unwrap_or(0.0) * self.score.unwrap_or(0.0)) / 100.0
    }
}

/// Derived figures for one course. Recomputed on every read, never stored.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GradeResults {
    pub rows: Vec<ItemRow>,
    /// Sum of all declared weights.
    pub total_weight: f64,
    /// Sum of weights of graded items.
    pub completed_weight: f64,
    /// `total_weight - completed_weight`, floored at zero.
    pub remaining_weight: f64,
    /// Grade points banked so far, on a `0..total_weight` scale.
    pub weighted_points_earned: f64,
    /// Average over graded work only.
    pub current_average: f64,
    /// Uniform average the remaining weight needs to land the whole course on
    /// target. Not clamped: negative means the target is already secured and
    /// above 100 means it is out of reach.
    pub needed_average_on_remaining: Option<f64>,
    /// Final grade if every ungraded item scored zero.
    pub projected_final: f64,
}

impl GradeResults {
    /// The "need" figure shown on a pending item.
    ///
    /// All pending items share the same value: the aggregate need floored
    /// at zero. Graded items have none.
    pub fn need_for(&self, row: &ItemRow) -> Option<f64> {
        if !row.is_pending() {
            return None;
        }
        self.needed_average_on_remaining
            .filter(|n| n.is_finite())
            .map(|n| n.max(0.0))
    }

    /// Number of items without a score yet.
    pub fn pending_count(&self) -> usize {
        self.rows.iter().filter(|r| r.is_pending()).count()
    }
}

/// Compute the grade results for a course.
pub fn compute(course: &Course) -> GradeResults {
    let rows: Vec<ItemRow> = course.items.iter().map(ItemRow::resolve).collect();

    let total_weight: f64 = rows.iter().map(|r| r.weight.unwrap_or(0.0)).sum();

    let completed: Vec<&ItemRow> = rows.iter().filter(|r| !r.is_pending()).collect();
    let completed_weight: f64 = completed.iter().map(|r| r.weight.unwrap_or(0.0)).sum();
    let weighted_points_earned: f64 = completed.iter().map(|r| r.points()).sum();

    let current_average = if completed_weight > 0.0 {
        weighted_points_earned / completed_weight * 100.0
    } else {
        0.0
    };

    // Live edits can leave completed weight above the total.
    let remaining_weight = (total_weight - completed_weight).max(0.0);

    let needed_average_on_remaining = match course.target.value() {
        Some(target) if remaining_weight > 0.0 => {
            Some((target / 100.0 * total_weight - weighted_points_earned) / remaining_weight * 100.0)
        }
        _ => None,
    };

    let projected_points: f64 = rows.iter().map(ItemRow::points).sum();
    let projected_final = if total_weight > 0.0 {
        projected_points / total_weight * 100.0
    } else {
        0.0
    };

    tracing::debug!(
        course = %course.id,
        total_weight,
        completed_weight,
        current_average,
        ?needed_average_on_remaining,
        projected_final,
        "computed grade results"
    );

    GradeResults {
        rows,
        total_weight,
        completed_weight,
        remaining_weight,
        weighted_points_earned,
        current_average,
        needed_average_on_remaining,
        projected_final,
    }
}

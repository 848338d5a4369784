//! Presentation policy for grade results.
//!
//! The engine leaves the needed average unclamped. Surfaces go through
//! [`NeedStatus`] and [`Pill`] so every front end reads it the same way.

use std::fmt;

use serde::Serialize;

use crate::engine::{GradeResults, ItemRow};

/// Render a percentage with one decimal place, or `—` when not a number.
pub fn format_percent(value: f64) -> String {
    if value.is_finite() {
        format!("{value:.1}%")
    } else {
        "—".to_string()
    }
}

/// How the aggregate needed average should be read.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "status", content = "value", rename_all = "snake_case")]
pub enum NeedStatus {
    /// Nothing left to grade, or no target set.
    Unavailable,
    /// The target is secured even if every remaining item scores zero.
    AlreadyMet,
    /// This uniform average on the remaining weight reaches the target.
    Reachable(f64),
    /// More than 100% would be needed.
    OutOfReach(f64),
}

impl NeedStatus {
    pub fn classify(needed: Option<f64>) -> Self {
        match needed {
            Some(n) if !n.is_finite() => NeedStatus::Unavailable,
            Some(n) if n <= 0.0 => NeedStatus::AlreadyMet,
            Some(n) if n > 100.0 => NeedStatus::OutOfReach(n),
            Some(n) => NeedStatus::Reachable(n),
            None => NeedStatus::Unavailable,
        }
    }

    pub fn of(results: &GradeResults) -> Self {
        Self::classify(results.needed_average_on_remaining)
    }
}

impl fmt::Display for NeedStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NeedStatus::Unavailable => f.write_str("—"),
            NeedStatus::AlreadyMet => f.write_str("target already met"),
            NeedStatus::Reachable(n) => write!(f, "{}", format_percent(*n)),
            NeedStatus::OutOfReach(n) => {
                write!(f, "{} (exceeds maximum possible)", format_percent(*n))
            }
        }
    }
}

/// The badge next to an item.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Pill {
    /// Pending item with the uniform need, if any.
    Need(Option<f64>),
    /// Graded item with its score.
    Got(f64),
}

impl Pill {
    pub fn for_row(results: &GradeResults, row: &ItemRow) -> Self {
        match row.score {
            Some(score) => Pill::Got(score),
            None => Pill::Need(results.need_for(row)),
        }
    }

    /// True when a pending item needs more than a perfect score.
    pub fn exceeds_maximum(&self) -> bool {
        matches!(self, Pill::Need(Some(n)) if *n > 100.0)
    }
}

impl fmt::Display for Pill {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Pill::Need(Some(n)) => write!(f, "need {n:.0}%"),
            Pill::Need(None) => f.write_str("need —"),
            Pill::Got(score) => write!(f, "got {score}/100"),
        }
    }
}

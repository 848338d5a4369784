//! Core data model types for gradegoal.
//!
//! A [`Course`] is a named, ordered list of weighted [`Item`]s plus a target
//! grade. Weights, scores, and targets are [`Mark`]s: either blank or a
//! number clamped to `[0, 100]`.

use std::fmt;
use std::str::FromStr;

use serde::de::{self, IgnoredAny, MapAccess, SeqAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::InvalidMark;

/// Target grade given to new courses and to records that omit one.
pub const DEFAULT_TARGET: f64 = 50.0;

/// Name of a freshly created course.
pub const NEW_COURSE_NAME: &str = "New Course";

/// Appended to the name of a duplicated course.
pub const COPY_SUFFIX: &str = " (Copy)";

/// A finite percentage in `[0, 100]`. Only [`Mark::new`] builds one.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Percent(f64);

impl Percent {
    pub fn get(self) -> f64 {
        self.0
    }
}

/// A percentage field that may be left blank.
///
/// Blank is distinct from a set `0` while editing, but both contribute
/// nothing to weight sums.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Mark {
    #[default]
    Blank,
    Set(Percent),
}

impl Mark {
    /// Create a mark, clamping into `[0, 100]`. Non-finite input is blank.
    pub fn new(value: f64) -> Self {
        if value.is_finite() {
            Mark::Set(Percent(value.clamp(0.0, 100.0)))
        } else {
            Mark::Blank
        }
    }

    /// The numeric value, or `None` when blank.
    pub fn value(self) -> Option<f64> {
        match self {
            Mark::Set(p) => Some(p.get()),
            Mark::Blank => None,
        }
    }

    pub fn is_blank(self) -> bool {
        self.value().is_none()
    }
}

impl From<f64> for Mark {
    fn from(value: f64) -> Self {
        Mark::new(value)
    }
}

impl From<Option<f64>> for Mark {
    fn from(value: Option<f64>) -> Self {
        value.map_or(Mark::Blank, Mark::new)
    }
}

impl fmt::Display for Mark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.value() {
            Some(v) => write!(f, "{v}"),
            None => Ok(()),
        }
    }
}

impl FromStr for Mark {
    type Err = InvalidMark;

    /// Parse user input. Empty input clears the field; numbers are clamped.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Ok(Mark::Blank);
        }
        match trimmed.parse::<f64>() {
            Ok(v) if v.is_finite() => Ok(Mark::new(v)),
            _ => Err(InvalidMark(s.to_string())),
        }
    }
}

impl Serialize for Mark {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.value() {
            Some(v) => serializer.serialize_f64(v),
            None => serializer.serialize_str(""),
        }
    }
}

impl<'de> Deserialize<'de> for Mark {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(MarkVisitor)
    }
}

/// Accepts anything; whatever is not a number becomes `Blank`.
struct MarkVisitor;

impl<'de> Visitor<'de> for MarkVisitor {
    type Value = Mark;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a number, a numeric string, or an empty value")
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Mark, E> {
        Ok(Mark::new(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Mark, E> {
        Ok(Mark::new(v as f64))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Mark, E> {
        Ok(Mark::new(v as f64))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Mark, E> {
        Ok(v.parse().unwrap_or(Mark::Blank))
    }

    fn visit_bool<E: de::Error>(self, _: bool) -> Result<Mark, E> {
        Ok(Mark::Blank)
    }

    fn visit_unit<E: de::Error>(self) -> Result<Mark, E> {
        Ok(Mark::Blank)
    }

    fn visit_none<E: de::Error>(self) -> Result<Mark, E> {
        Ok(Mark::Blank)
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Mark, D::Error> {
        Mark::deserialize(deserializer)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Mark, A::Error> {
        while seq.next_element::<IgnoredAny>()?.is_some() {}
        Ok(Mark::Blank)
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Mark, A::Error> {
        while map.next_entry::<IgnoredAny, IgnoredAny>()?.is_some() {}
        Ok(Mark::Blank)
    }
}

/// One gradeable component of a course.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    /// Stable identifier, unique within its course.
    pub id: String,
    /// Free-text label. May be empty or duplicated.
    #[serde(default)]
    pub name: String,
    /// Share of the final grade, in percentage points.
    #[serde(default)]
    pub weight: Mark,
    /// Score achieved, in percent. Blank means not yet graded.
    #[serde(default)]
    pub score: Mark,
}

impl Item {
    /// A blank item with the given id and name.
    pub fn blank(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            weight: Mark::Blank,
            score: Mark::Blank,
        }
    }
}

/// A named collection of items plus a target grade.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Course {
    /// Unique identifier.
    pub id: String,
    /// Free-text label.
    pub name: String,
    /// Desired overall grade, in percent.
    #[serde(default = "default_target")]
    pub target: Mark,
    /// Items in display order.
    #[serde(default)]
    pub items: Vec<Item>,
}

fn default_target() -> Mark {
    Mark::new(DEFAULT_TARGET)
}

impl Course {
    /// Find an item by id.
    pub fn item(&self, id: &str) -> Option<&Item> {
        self.items.iter().find(|it| it.id == id)
    }
}

/// Field edits for an item. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ItemPatch {
    pub name: Option<String>,
    pub weight: Option<Mark>,
    pub score: Option<Mark>,
}

impl ItemPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.weight.is_none() && self.score.is_none()
    }

    /// Return a patched copy of `item`. The id is preserved.
    pub fn apply(&self, item: &Item) -> Item {
        Item {
            id: item.id.clone(),
            name: self.name.clone().unwrap_or_else(|| item.name.clone()),
            weight: self.weight.unwrap_or(item.weight),
            score: self.score.unwrap_or(item.score),
        }
    }
}

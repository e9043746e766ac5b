//! Sorted projection of the catalog for display.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::model::{Catalog, Lesson, LessonKey};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortField {
    #[default]
    Subject,
    Location,
    Price,
    Spaces,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn toggled(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }
}

impl FromStr for SortField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "subject" => Ok(Self::Subject),
            "location" => Ok(Self::Location),
            "price" => Ok(Self::Price),
            "spaces" => Ok(Self::Spaces),
            other => Err(format!("unknown sort field `{other}`")),
        }
    }
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Subject => "subject",
            Self::Location => "location",
            Self::Price => "price",
            Self::Spaces => "spaces",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SortOptions {
    pub field: SortField,
    pub direction: SortDirection,
}

impl SortOptions {
    pub fn new(field: SortField, direction: SortDirection) -> Self {
        Self { field, direction }
    }

    fn compare(&self, a: &Lesson, b: &Lesson) -> Ordering {
        let ordering = match self.field {
            SortField::Subject => cmp_folded(a.subject(), b.subject()),
            SortField::Location => cmp_folded(a.location(), b.location()),
            SortField::Price => a.price().partial_cmp(&b.price()).unwrap_or(Ordering::Equal),
            SortField::Spaces => a.spaces().cmp(&b.spaces()),
        };

        match self.direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    }
}

fn cmp_folded(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase())
}

/// A catalog lesson as shown to the shopper.
#[derive(Debug, Clone, Copy)]
pub struct DisplayedLesson<'a> {
    /// Position in the catalog snapshot the view was built from.
    pub position: usize,
    pub lesson: &'a Lesson,
}

impl DisplayedLesson<'_> {
    pub fn key(&self) -> LessonKey {
        self.lesson.key()
    }
}

/// Restartable view: every call to `iter` re-sorts the current snapshot.
#[derive(Debug, Clone, Copy)]
pub struct LessonView<'a> {
    catalog: &'a Catalog,
    options: SortOptions,
}

impl<'a> LessonView<'a> {
    pub fn new(catalog: &'a Catalog, options: SortOptions) -> Self {
        Self { catalog, options }
    }

    pub fn iter(&self) -> std::vec::IntoIter<DisplayedLesson<'a>> {
        let mut shown: Vec<DisplayedLesson<'a>> = self
            .catalog
            .lessons()
            .iter()
            .enumerate()
            .map(|(position, lesson)| DisplayedLesson { position, lesson })
            .collect();

        // stable, ties keep catalog order in both directions
        shown.sort_by(|a, b| self.options.compare(a.lesson, b.lesson));
        shown.into_iter()
    }
}

impl<'a> IntoIterator for LessonView<'a> {
    type Item = DisplayedLesson<'a>;
    type IntoIter = std::vec::IntoIter<DisplayedLesson<'a>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

pub fn display_lessons(catalog: &Catalog, options: SortOptions) -> LessonView<'_> {
    LessonView::new(catalog, options)
}

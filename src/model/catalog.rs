use std::collections::HashMap;

use super::lesson::{Lesson, LessonKey};

/// Ordered lesson snapshot with a key index.
///
/// The snapshot may be replaced wholesale (reload, search), so nothing
/// outside the catalog should hold on to positions across a replacement.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    lessons: Vec<Lesson>,
    index: HashMap<LessonKey, usize>,
}

impl Catalog {
    pub fn new(lessons: Vec<Lesson>) -> Self {
        let mut catalog = Self::default();
        catalog.replace(lessons);
        catalog
    }

    /// Replaces the snapshot. When the backend returns a subject twice the
    /// first record wins the key.
    pub fn replace(&mut self, lessons: Vec<Lesson>) {
        self.index.clear();
        for (position, lesson) in lessons.iter().enumerate() {
            self.index.entry(lesson.key()).or_insert(position);
        }
        self.lessons = lessons;
    }

    pub fn lessons(&self) -> &[Lesson] {
        &self.lessons
    }

    pub fn len(&self) -> usize {
        self.lessons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lessons.is_empty()
    }

    pub fn position(&self, key: &LessonKey) -> Option<usize> {
        self.index.get(key).copied()
    }

    pub fn get(&self, key: &LessonKey) -> Option<&Lesson> {
        self.position(key).and_then(|p| self.lessons.get(p))
    }

    pub fn get_mut(&mut self, key: &LessonKey) -> Option<&mut Lesson> {
        let position = self.position(key)?;
        self.lessons.get_mut(position)
    }

    pub fn total_spaces(&self) -> u64 {
        self.lessons.iter().map(|l| u64::from(l.spaces())).sum()
    }
}

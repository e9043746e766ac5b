//! Cart ledger.
//!
//! Every quantity change on a line is mirrored on the seat counter of the
//! lesson it references, so that at any point before checkout
//! `total_quantity() + catalog.total_spaces()` equals the seats the catalog
//! started with.

use serde::Serialize;

use super::catalog::Catalog;
use super::lesson::{Lesson, LessonKey};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CartLine {
    key: LessonKey,
    unit_price: f64,
    quantity: u32,
    image: String,
}

impl CartLine {
    fn from_lesson(lesson: &Lesson) -> Self {
        Self {
            key: lesson.key(),
            unit_price: lesson.price(),
            quantity: 1,
            image: lesson.image().to_string(),
        }
    }

    pub fn key(&self) -> &LessonKey {
        &self.key
    }

    pub fn unit_price(&self) -> f64 {
        self.unit_price
    }

    /// Always at least 1.
    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    pub fn image(&self) -> &str {
        &self.image
    }

    pub fn line_total(&self) -> f64 {
        self.unit_price * f64::from(self.quantity)
    }
}

#[derive(Debug, Clone, Default)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn line(&self, key: &LessonKey) -> Option<&CartLine> {
        self.lines.iter().find(|l| &l.key == key)
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn total_quantity(&self) -> u32 {
        self.lines.iter().map(|l| l.quantity).sum()
    }

    pub fn total_price(&self) -> f64 {
        self.lines.iter().map(CartLine::line_total).sum()
    }

    /// Adds one unit of `key`, creating the line on first add.
    ///
    /// Returns `false` without touching anything when the lesson is unknown
    /// or full.
    pub fn add(&mut self, catalog: &mut Catalog, key: &LessonKey) -> bool {
        let Some(lesson) = catalog.get_mut(key) else {
            return false;
        };
        if !lesson.has_spaces() {
            return false;
        }

        match self.lines.iter_mut().find(|l| &l.key == key) {
            Some(line) => {
                if !lesson.take_seat() {
                    return false;
                }
                line.quantity += 1;
            }
            None => {
                let line = CartLine::from_lesson(lesson);
                if !lesson.take_seat() {
                    return false;
                }
                self.lines.push(line);
            }
        }

        true
    }

    /// Adds one unit to an existing line. Unlike [`Cart::add`] this never
    /// creates a line.
    pub fn increase(&mut self, catalog: &mut Catalog, key: &LessonKey) -> bool {
        let Some(line) = self.lines.iter_mut().find(|l| &l.key == key) else {
            return false;
        };
        let Some(lesson) = catalog.get_mut(key) else {
            return false;
        };
        if !lesson.take_seat() {
            return false;
        }

        line.quantity += 1;
        true
    }

    /// Gives back one unit. The line is dropped when its quantity reaches 0.
    ///
    /// A lesson missing from the current snapshot gets no seat back, the
    /// line still shrinks.
    pub fn decrease(&mut self, catalog: &mut Catalog, key: &LessonKey) -> bool {
        let Some(position) = self.lines.iter().position(|l| &l.key == key) else {
            return false;
        };

        if let Some(lesson) = catalog.get_mut(key) {
            lesson.release_seats(1);
        }

        let emptied = match self.lines.get_mut(position) {
            Some(line) => {
                line.quantity -= 1;
                line.quantity == 0
            }
            None => false,
        };
        if emptied {
            self.lines.remove(position);
        }

        true
    }

    /// Drops the whole line and gives all its seats back at once.
    pub fn remove(&mut self, catalog: &mut Catalog, key: &LessonKey) -> bool {
        let Some(position) = self.lines.iter().position(|l| &l.key == key) else {
            return false;
        };

        let line = self.lines.remove(position);
        if let Some(lesson) = catalog.get_mut(key) {
            lesson.release_seats(line.quantity);
        }

        true
    }

    /// Empties the ledger without giving seats back. Used after a placed
    /// order, where the seats are consumed.
    pub(crate) fn clear_consumed(&mut self) -> Vec<CartLine> {
        std::mem::take(&mut self.lines)
    }

    /// Re-applies the seats held by this cart to a freshly loaded snapshot.
    pub(crate) fn hold_in(&self, catalog: &mut Catalog) {
        for line in &self.lines {
            if let Some(lesson) = catalog.get_mut(&line.key) {
                lesson.hold_seats(line.quantity);
            }
        }
    }
}

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// Stable key a lesson is addressed by, both locally and on the backend.
///
/// The subject is used for order lines as well as for the seat update path,
/// so the two always resolve to the same lesson.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LessonKey(String);

impl LessonKey {
    pub fn new<S: Into<String>>(subject: S) -> Self {
        Self(subject.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LessonKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for LessonKey {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lesson {
    subject: String,
    #[serde(default)]
    location: String,
    #[serde(deserialize_with = "deserialize_price")]
    price: f64,
    spaces: u32,
    #[serde(default)]
    image: String,
    /// Descriptive fields the shop does not interpret.
    #[serde(flatten)]
    extra: serde_json::Map<String, serde_json::Value>,
}

impl Lesson {
    pub fn new<S: Into<String>>(subject: S, location: S, price: f64, spaces: u32) -> Self {
        Self {
            subject: subject.into(),
            location: location.into(),
            price: normalize_price(price),
            spaces,
            image: String::new(),
            extra: serde_json::Map::new(),
        }
    }

    pub fn with_image<S: Into<String>>(mut self, image: S) -> Self {
        self.image = image.into();
        self
    }

    pub fn key(&self) -> LessonKey {
        LessonKey::new(self.subject.as_str())
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn price(&self) -> f64 {
        self.price
    }

    pub fn spaces(&self) -> u32 {
        self.spaces
    }

    pub fn image(&self) -> &str {
        &self.image
    }

    pub fn extra(&self) -> &serde_json::Map<String, serde_json::Value> {
        &self.extra
    }

    pub fn has_spaces(&self) -> bool {
        self.spaces > 0
    }

    /// Takes one seat. Returns `false` and leaves the lesson untouched when
    /// it is already full.
    pub(crate) fn take_seat(&mut self) -> bool {
        match self.spaces.checked_sub(1) {
            Some(left) => {
                self.spaces = left;
                true
            }
            None => false,
        }
    }

    pub(crate) fn release_seats(&mut self, count: u32) {
        self.spaces = self.spaces.saturating_add(count);
    }

    /// Used when a fresh snapshot arrives while the cart still holds seats.
    pub(crate) fn hold_seats(&mut self, count: u32) {
        self.spaces = self.spaces.saturating_sub(count);
    }
}

/// Prices are never negative. Anything below zero, NaN and `-0.0` become `0.0`.
fn normalize_price(price: f64) -> f64 {
    if price > 0.0 { price } else { 0.0 }
}

fn deserialize_price<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    f64::deserialize(deserializer).map(normalize_price)
}

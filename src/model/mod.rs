mod lesson;
pub use lesson::{Lesson, LessonKey};

mod catalog;
pub use catalog::Catalog;

mod cart;
pub use cart::{Cart, CartLine};

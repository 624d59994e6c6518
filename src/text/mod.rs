pub mod engine;
pub mod wrap;

pub use engine::{FontBook, TextBrush, TextEngine};
pub use wrap::{FontRole, FontSpec, TextMeasure, wrap_text};

//! Format-agnostic helpers shared by the HTML and tagged-text formats.

pub mod inlines;
pub mod lists;

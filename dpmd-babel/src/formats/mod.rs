//! Format implementations
//!
//! This module contains all format implementations that convert between
//! the component tree and its text representations.

pub mod html;
pub mod icons;
pub mod json;
pub mod tagged;
pub mod treeviz;

pub use html::{HtmlFormat, HtmlOptions};
pub use json::JsonFormat;
pub use tagged::{TaggedFormat, TaggedOptions};
pub use treeviz::TreevizFormat;

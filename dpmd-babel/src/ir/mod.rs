//! Component tree shared by every format.
//!
//! HTML ingestion produces it, the tagged-text parser produces it, and all
//! serializers consume it. Formats never talk to each other directly.

pub mod nodes;

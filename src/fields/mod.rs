//! Field-name handling for translation documents.
//!
//! Field names are configurable, so documents are built and read through
//! string keys rather than fixed struct fields:
//!
//! - [`sanitizer`] strips characters MongoDB treats specially in field keys
//! - [`props`] gets/sets a single key on a BSON document

pub mod props;
pub mod sanitizer;

pub use props::{get_one_level, set_one_level};
pub use sanitizer::sanitize_field_name;

//! Bidirectional naming templates.
//!
//! The same template is used in two directions:
//!
//! - [`NamingTemplate::render`] turns field values into a concrete path segment
//!   when saving new content.
//! - [`NamingTemplate::derive_matcher`] produces a [`Matcher`] that recovers the
//!   field values from a segment previously rendered by that template.
//!
//! For any field set `F` valid for template `T`,
//! `T.derive_matcher()?.extract(&T.render(&F)?)` yields `F` again: text values
//! exactly, numeric values by value (see [`FieldSet::equivalent`]).
//!
//! # Example
//!
//! ```
//! use manga_dl_core::template::{FieldSet, Level, NamingTemplate, Placeholder};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let template = NamingTemplate::parse(Level::Chapter, "Chapter {chapter} - {title}")?;
//! let fields = FieldSet::new()
//!     .with_number(Placeholder::Chapter, "10.5".parse()?)
//!     .with_text(Placeholder::Title, "[Bonus] Side Story");
//!
//! let segment = template.render(&fields)?;
//! assert_eq!(segment, "Chapter 10.5 - [Bonus] Side Story");
//!
//! let matcher = template.derive_matcher()?;
//! assert_eq!(matcher.extract(&segment), Some(fields));
//! assert_eq!(matcher.extract("Extras"), None);
//! # Ok(())
//! # }
//! ```

mod error;
mod fields;
mod key;
mod matcher;
mod naming;
mod placeholder;

pub use error::TemplateError;
pub use fields::{FieldSet, FieldValue};
pub use key::NumericKey;
pub use matcher::Matcher;
pub use naming::{NamingTemplate, sanitize_segment};
pub use placeholder::{FieldKind, Level, Placeholder};

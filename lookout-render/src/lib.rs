//! Presentation of schema-less search results.
//!
//! A backend may answer with a string, a list of primitives, a list of
//! records, a single record, or a map of named sources. [`shape::classify`]
//! picks exactly one presentation strategy for any JSON value and
//! [`render`] turns it into a [`View`] tree. [`TextLayout`] lays a view out
//! for the terminal.
//!
//! ```
//! use lookout_render::{ShapeKind, View, render};
//! use serde_json::json;
//!
//! let view = render(&json!({
//!     "NumOfResults": 2,
//!     "Breach A": { "InfoLeak": "2019 dump", "Data": [{ "email": "a@x.io" }] },
//!     "Breach B": { "Data": { "email": "b@x.io" } },
//! }));
//! assert_eq!(view.kind(), ShapeKind::AggregateMap);
//! match view {
//!     View::AggregateMap { sources } => assert_eq!(sources.len(), 2),
//!     _ => unreachable!(),
//! }
//! ```

pub mod layout;
pub mod record;
pub mod shape;
pub mod source;
mod styles;
pub mod view;

pub use layout::TextLayout;
pub use record::{Field, FieldValue, Panel, present_entries, present_record};
pub use shape::{Shape, ShapeKind, classify};
pub use source::{SourceBlock, SourceBody, present_source};
pub use view::{View, render};

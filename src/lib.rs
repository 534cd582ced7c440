//! Structural field extractor
//!
//! Turns one selected example fragment of a document into a named field of
//! an extraction schema:
//! - Document parsing into an arena tree (HTML, or opaque text)
//! - Locating the element that encloses a selection
//! - Matching every element with the same tag path
//! - Building a schema of named, colored fields
//! - Rendering the raw document with highlighted matches

pub mod config;
pub mod document;
pub mod error;
pub mod ffi;
pub mod highlight;
pub mod schema;
pub mod session;
pub mod structure;

pub use config::*;
pub use document::*;
pub use error::*;
pub use ffi::*;
pub use highlight::*;
pub use schema::*;
pub use session::*;
pub use structure::*;

pub mod bundled;
mod cache;
mod element_set;
mod error;
mod source;

pub use bundled::BundledElementSet;
pub use cache::{ElementCache, Provenance, ResolvedElementSet};
pub use element_set::ElementSet;
pub use error::ElementsError;
pub use source::{BodyFormat, ElementSource, HttpSource};

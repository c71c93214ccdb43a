//! Build, transform, and merge MITRE ATT&CK Navigator layer documents.
//!
//! The library is the whole product: [`layer`] holds the annotated-technique
//! model and its mutations, [`algebra`] the cross-layer set operations,
//! [`scheme`] and [`color`] the score-to-color encodings, and [`codec`] the
//! Navigator-compatible document exchange. Upstream technique data arrives
//! through the narrow [`records`] boundary; nothing here fetches or caches
//! anything.

pub mod algebra;
pub mod codec;
pub mod color;
pub mod config;
pub mod error;
pub mod layer;
pub mod records;
pub mod scheme;
pub mod summary;

pub use error::{LayerError, Result};
pub use layer::{Domain, Gradient, Layer, Technique};

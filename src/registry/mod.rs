//! Identifier registries.
//!
//! Every tileset and blockset is addressed by a small integer id. The ids come
//! from a text manifest per resource category where the line number is the id.

mod ids;
mod traits;

pub use ids::{IdList, ManifestError};
pub use traits::Registry;

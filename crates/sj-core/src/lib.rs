//! sighting-janitor/crates/sj-core/src/lib.rs
//!
//! Domain models, collaborator ports, and the pure statement engines
//! (extraction, date/time shapes, classification, media predicates).

pub mod classify;
pub mod datetime;
pub mod error;
pub mod extract;
pub mod media;
pub mod models;
pub mod traits;

// Re-exporting for easier access in other crates
pub use error::*;
pub use models::*;
pub use traits::*;

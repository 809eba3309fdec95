//! Document collection abstraction
//!
//! The backend talks to storage through [`DocumentCollection`], a small
//! async trait over BSON documents. Two implementations ship with the crate:
//!
//! ```text
//! ┌─────────────────────┐
//! │    MongoBackend     │
//! │  (read/readMulti/   │
//! │      create)        │
//! └──────────┬──────────┘
//!            │
//! ┌──────────▼──────────┐
//! │ DocumentCollection  │  <-- Trait
//! │      (async)        │
//! └──────────┬──────────┘
//!            │
//!     ┌──────┴──────┐
//!     │             │
//! ┌───▼────────┐ ┌──▼─────────┐
//! │  MongoDB   │ │   Memory   │
//! │ Collection │ │ Collection │
//! └────────────┘ └────────────┘
//! ```
//!
//! `mongodb::Collection<Document>` implements the trait directly, so an
//! existing collection handle can be injected into the backend as-is.

mod memory;
mod traits;

pub use memory::MemoryCollection;
pub use traits::DocumentCollection;

//! Fotos database layer
//!
//! [`PhotoStore`] is the row-store seam the lifecycle manager works against;
//! [`PhotoRepository`] implements it over a SQLite pool.

pub mod photo;
pub mod pool;
pub mod store;

pub use photo::PhotoRepository;
pub use pool::{connect_in_memory, MIGRATOR};
pub use store::PhotoStore;

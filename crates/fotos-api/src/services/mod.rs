pub mod ingest;
pub mod photo_lifecycle;

pub use ingest::{IngestConfig, IngestService};
pub use photo_lifecycle::{NewImage, NewPhoto, PhotoLifecycle};

//! Data models for the application

mod photo;

pub use photo::*;

pub mod config;
pub use config::*;

pub mod builder;
pub use builder::*;

pub mod utils;

mod writer;
pub use writer::{XrniWriter, MANIFEST_EXTENSION};

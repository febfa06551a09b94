#![allow(clippy::module_name_repetitions)]
pub mod config;
pub mod error;
pub mod feed;
pub mod fetch;
pub mod github;
pub mod images;
pub mod persist;
pub mod pipeline;
pub mod render;
pub mod splice;

pub use error::{Error, Result};

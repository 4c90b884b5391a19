pub mod api;
pub mod cleanup;
pub mod config;
pub mod errors;
pub mod features;
pub mod merge;
pub mod prompt;
pub mod render;
pub mod tasks;
pub mod template;
pub mod traverse;
pub mod utils;

pub use api::{create_project, scaffold, ScaffoldError, ScaffoldPlan};

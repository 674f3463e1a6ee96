#![warn(clippy::all, clippy::pedantic)]
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::new_without_default,
    clippy::return_self_not_must_use
)]

pub mod artifact;
pub mod config;
pub mod directive;
pub mod error;
pub mod llm;
pub mod memory;
pub mod observability;
pub mod prompt;
pub mod rewrite;

pub use config::Config;
pub use error::{PalimpsestError, Result};

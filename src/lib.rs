pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::ChromeRenderer;
pub use config::{cli::LocalStorage, toml_config::RenderConfig};
pub use core::{
    batch::BatchRunner, etl::ConvertEngine, merge::deep_merge, schema::to_json_resume,
};
pub use utils::error::{CvError, Result};

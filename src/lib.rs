pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::toml_config::TomlConfig;

pub use adapters::{http::HttpMealSource, storage::LocalStorage, surface::BufferedSurface};
pub use self::core::{
    parser::parse_response,
    render::{render, RenderOptions},
    widget::MealLookupWidget,
};
pub use domain::model::{DateSelection, DisplayState, MealRecord, SearchOutcome};
pub use utils::error::{MealError, Result};

pub mod parser;
pub mod render;
pub mod widget;

pub use crate::domain::model::{DateSelection, DisplayState, MealRecord, SearchOutcome};
pub use crate::domain::ports::{ConfigProvider, MealSource, Storage, UiSurface};
pub use crate::utils::error::Result;

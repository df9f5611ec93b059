#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
pub use cli::CliConfig;

pub const DEFAULT_API_ENDPOINT: &str = "https://open.neis.go.kr/hub/mealServiceDietInfo";
/// 濟州特別自治道教育廳
pub const DEFAULT_OFFICE_CODE: &str = "J10";
pub const DEFAULT_SCHOOL_CODE: &str = "7530079";
pub const DEFAULT_PROXY_URL: &str = "https://api.allorigins.win/raw";
pub const DEFAULT_OUTPUT_PATH: &str = "./output";
pub const HTML_FILENAME: &str = "meal.html";
pub const JSON_FILENAME: &str = "meal.json";

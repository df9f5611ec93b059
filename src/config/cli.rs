use super::{
    DEFAULT_API_ENDPOINT, DEFAULT_OFFICE_CODE, DEFAULT_OUTPUT_PATH, DEFAULT_PROXY_URL,
    DEFAULT_SCHOOL_CODE,
};
use crate::core::render::RenderOptions;
use crate::domain::ports::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{self, Validate};
use clap::Parser;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "meal-lookup")]
#[command(about = "Look up a school's meal menu for a date and render it as HTML")]
pub struct CliConfig {
    /// Date to look up (YYYY-MM-DD), defaults to today
    #[arg(long)]
    pub date: Option<String>,

    #[arg(long, default_value = DEFAULT_API_ENDPOINT)]
    pub api_endpoint: String,

    #[arg(long, default_value = DEFAULT_OFFICE_CODE)]
    pub office_code: String,

    #[arg(long, default_value = DEFAULT_SCHOOL_CODE)]
    pub school_code: String,

    #[arg(long)]
    pub api_key: Option<String>,

    #[arg(long, default_value = DEFAULT_PROXY_URL)]
    pub proxy_url: String,

    #[arg(long, help = "Call the API directly instead of through the relay")]
    pub no_proxy: bool,

    #[arg(long, default_value = DEFAULT_OUTPUT_PATH)]
    pub output_path: String,

    #[arg(long, help = "Also write the parsed meals as JSON")]
    pub json: bool,

    #[arg(long, help = "Show nutrition and origin information")]
    pub details: bool,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,
}

impl CliConfig {
    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            show_details: self.details,
        }
    }
}

impl ConfigProvider for CliConfig {
    fn api_endpoint(&self) -> &str {
        &self.api_endpoint
    }

    fn office_code(&self) -> &str {
        &self.office_code
    }

    fn school_code(&self) -> &str {
        &self.school_code
    }

    fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref().filter(|key| !key.trim().is_empty())
    }

    fn proxy_url(&self) -> Option<&str> {
        if self.no_proxy {
            None
        } else {
            Some(&self.proxy_url)
        }
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_url("api_endpoint", &self.api_endpoint)?;
        if !self.no_proxy {
            validation::validate_url("proxy_url", &self.proxy_url)?;
        }
        validation::validate_school_code("office_code", &self.office_code)?;
        validation::validate_school_code("school_code", &self.school_code)?;
        validation::validate_path("output_path", &self.output_path)?;
        Ok(())
    }
}

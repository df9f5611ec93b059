use clap::Parser;
use meal_lookup::core::ConfigProvider;
use meal_lookup::domain::ports::{Storage, UiSurface};
use meal_lookup::utils::error::ErrorSeverity;
use meal_lookup::utils::{logger, validation::Validate};
use meal_lookup::{
    BufferedSurface, DateSelection, HttpMealSource, LocalStorage, MealLookupWidget, SearchOutcome,
    TomlConfig,
};

#[derive(Parser)]
#[command(name = "toml-meal")]
#[command(about = "Meal lookup driven by a TOML configuration file")]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "meal-config.toml")]
    config: String,

    /// Date to look up (YYYY-MM-DD), defaults to today
    #[arg(short, long)]
    date: Option<String>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Override detail display setting from config
    #[arg(long)]
    details: Option<bool>,

    /// Dry run - show the request that would be made without sending it
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // 載入 TOML 配置 (日誌格式由配置決定，所以先載入)
    let mut config = match TomlConfig::from_file(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load config file '{}': {}", args.config, e);
            eprintln!("💡 Make sure the file exists and is valid TOML format");
            std::process::exit(1);
        }
    };

    let verbose = args.verbose || config.verbose();
    if config.json_logging() {
        logger::init_json_logger(verbose);
    } else {
        logger::init_cli_logger(verbose);
    }

    tracing::info!("🚀 Starting TOML-based meal lookup");
    tracing::info!("📁 Loaded configuration from: {}", args.config);

    // 應用命令列覆蓋設定
    if let Some(details) = args.details {
        config
            .display
            .get_or_insert(meal_lookup::config::toml_config::DisplayConfig { show_details: None })
            .show_details = Some(details);
        tracing::info!("🔧 Detail display overridden to: {}", details);
    }

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    tracing::info!("✅ Configuration loaded and validated successfully");
    display_config_summary(&config, &args);

    let storage = LocalStorage::new(config.output_path().to_string());
    let options = config.render_options();
    let write_html = config.writes_format("html");
    let write_json = config.writes_format("json");
    let html_filename = config.html_filename().to_string();
    let json_filename = config.json_filename().to_string();

    let source = HttpMealSource::new(config);

    if args.dry_run {
        tracing::info!("🔍 DRY RUN MODE - No request will be sent");
        perform_dry_run(&source, args.date.as_deref())?;
        return Ok(());
    }

    let widget = MealLookupWidget::new(source, BufferedSurface::new(), options);
    if let Some(date) = &args.date {
        widget.ui().set_date_value(date);
    }

    let outcome = widget.trigger_search().await;

    if write_html {
        let page = widget.ui().render_page()?;
        storage.write_file(&html_filename, page.as_bytes()).await?;
        println!("📁 Page saved to: {}", storage.full_path(&html_filename));
    }

    match outcome {
        SearchOutcome::Loaded(records) => {
            if write_json {
                let json = serde_json::to_vec_pretty(&records)?;
                storage.write_file(&json_filename, &json).await?;
                println!("📁 Meals saved to: {}", storage.full_path(&json_filename));
            }
            tracing::info!("✅ Meal lookup completed: {} meals", records.len());
            println!("✅ {}건의 급식 정보를 조회했습니다.", records.len());
        }
        SearchOutcome::Rejected(e) => {
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(1);
        }
        SearchOutcome::Failed(e) => {
            // 記錄詳細錯誤信息
            tracing::error!(
                "❌ Meal lookup failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());

            let exit_code = match e.severity() {
                ErrorSeverity::Low => 0,
                ErrorSeverity::Medium => 2,
                ErrorSeverity::High => 1,
                ErrorSeverity::Critical => 3,
            };

            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
        SearchOutcome::Superseded => {
            tracing::warn!("Search was superseded before it finished");
        }
    }

    Ok(())
}

fn display_config_summary(config: &TomlConfig, args: &Args) {
    println!("📋 Configuration Summary:");
    println!("  Endpoint: {}", config.api_endpoint());
    println!(
        "  School: {} / {}",
        config.office_code(),
        config.school_code()
    );
    println!("  Relay: {}", config.proxy_url().unwrap_or("(direct)"));
    println!("  API Key: {}", if config.api_key().is_some() { "set" } else { "not set" });
    println!("  Output: {}", config.output_path());
    println!("  Formats: {}", config.output.formats.join(", "));
    println!("  Details: {}", config.render_options().show_details);

    if args.dry_run {
        println!("  🔍 DRY RUN MODE ENABLED");
    }

    println!();
}

fn perform_dry_run(
    source: &HttpMealSource<TomlConfig>,
    date: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    let selection = match date {
        Some(date) => DateSelection::parse(date)?,
        None => DateSelection::new(chrono::Local::now().date_naive()),
    };

    println!("🔍 Dry Run Analysis:");
    println!();
    println!("📅 Date: {} ({})", selection.iso(), selection.compact());
    println!("📡 Target URL: {}", source.target_url(&selection.compact())?);
    println!("📡 Request URL: {}", source.request_url(&selection.compact())?);
    println!();
    println!("✅ Dry run analysis complete. Use --verbose for more details during actual run.");

    Ok(())
}

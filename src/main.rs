use clap::Parser;
use meal_lookup::config::{HTML_FILENAME, JSON_FILENAME};
use meal_lookup::domain::ports::{Storage, UiSurface};
use meal_lookup::utils::error::ErrorSeverity;
use meal_lookup::utils::{logger, validation::Validate};
use meal_lookup::{
    BufferedSurface, CliConfig, HttpMealSource, LocalStorage, MealLookupWidget, SearchOutcome,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = CliConfig::parse();

    // 初始化日誌
    logger::init_cli_logger(config.verbose);

    tracing::info!("Starting meal-lookup CLI");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    let storage = LocalStorage::new(config.output_path.clone());
    let options = config.render_options();
    let requested_date = config.date.clone();
    let write_json = config.json;

    let widget = MealLookupWidget::new(
        HttpMealSource::new(config),
        BufferedSurface::new(),
        options,
    );
    if let Some(date) = requested_date {
        widget.ui().set_date_value(&date);
    }

    let outcome = widget.trigger_search().await;

    // 不論成功或失敗都輸出頁面，錯誤時頁面上顯示的是錯誤區塊
    let page = widget.ui().render_page()?;
    storage.write_file(HTML_FILENAME, page.as_bytes()).await?;
    let page_path = storage.full_path(HTML_FILENAME);

    match outcome {
        SearchOutcome::Loaded(records) => {
            if write_json {
                let json = serde_json::to_vec_pretty(&records)?;
                storage.write_file(JSON_FILENAME, &json).await?;
                tracing::info!("📁 Meals saved to: {}", storage.full_path(JSON_FILENAME));
            }
            tracing::info!("✅ Meal lookup completed: {} meals", records.len());
            println!("✅ {}건의 급식 정보를 조회했습니다.", records.len());
            println!("📁 Output saved to: {}", page_path);
        }
        SearchOutcome::Rejected(e) => {
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(1);
        }
        SearchOutcome::Failed(e) => {
            tracing::error!(
                "❌ Meal lookup failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());
            eprintln!("📁 Error page saved to: {}", page_path);

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

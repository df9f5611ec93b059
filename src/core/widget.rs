use crate::core::parser::parse_response;
use crate::core::render::{render, RenderOptions};
use crate::domain::model::{DateSelection, DisplayState, MealRecord, SearchOutcome};
use crate::domain::ports::{MealSource, UiSurface};
use crate::utils::error::Result;
use chrono::{Local, NaiveDate};
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::Mutex;

/// 日期選擇 → 查詢 → 解析 → 顯示。
///
/// 畫面的五個區塊由 `UiSurface` 注入。每次查詢開始時取得新的序號，
/// 回應回來時若已經不是最新的查詢，結果直接丟棄，只有最後一次查詢會更新畫面。
pub struct MealLookupWidget<S: MealSource, U: UiSurface> {
    source: S,
    ui: U,
    options: RenderOptions,
    state: Mutex<DisplayState>,
    generation: AtomicU64,
}

impl<S: MealSource, U: UiSurface> MealLookupWidget<S, U> {
    /// 日期欄位預設為今天 (本地時間)
    pub fn new(source: S, ui: U, options: RenderOptions) -> Self {
        Self::with_today(source, ui, options, Local::now().date_naive())
    }

    pub fn with_today(source: S, ui: U, options: RenderOptions, today: NaiveDate) -> Self {
        ui.set_date_value(&DateSelection::new(today).iso());
        Self {
            source,
            ui,
            options,
            state: Mutex::new(DisplayState::Idle),
            generation: AtomicU64::new(0),
        }
    }

    pub fn ui(&self) -> &U {
        &self.ui
    }

    pub async fn display_state(&self) -> DisplayState {
        *self.state.lock().await
    }

    pub async fn trigger_search(&self) -> SearchOutcome {
        let input = self.ui.date_value();
        let date = match DateSelection::parse(&input) {
            Ok(date) => date,
            Err(e) => {
                tracing::warn!("Rejected search input {:?}: {}", input, e);
                self.ui.alert(&e.user_friendly_message());
                return SearchOutcome::Rejected(e);
            }
        };

        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        tracing::info!("🔍 Searching meals for {} (#{})", date.iso(), generation);
        self.enter(generation, DisplayState::Loading, None).await;

        let result = self.lookup(&date).await.and_then(|records| {
            let records = records.unwrap_or_default();
            let html = render(Some(records.as_slice()), &date, self.options)?;
            Ok((records, html))
        });

        let (next, html) = match &result {
            Ok((_, html)) => (DisplayState::Loaded, html.as_str()),
            Err(_) => (DisplayState::Error, ""),
        };
        if !self.enter(generation, next, Some(html)).await {
            tracing::debug!(
                "Discarding result for {} (#{}), a newer search is running",
                date.iso(),
                generation
            );
            return SearchOutcome::Superseded;
        }

        match result {
            Ok((records, _)) => {
                tracing::info!("✅ Rendered {} meals for {}", records.len(), date.iso());
                SearchOutcome::Loaded(records)
            }
            Err(e) => {
                tracing::error!(
                    "❌ 급식 정보 조회 실패: {} (Category: {:?})",
                    e,
                    e.category()
                );
                SearchOutcome::Failed(e)
            }
        }
    }

    async fn lookup(&self, date: &DateSelection) -> Result<Option<Vec<MealRecord>>> {
        let xml_text = self.source.fetch_meal_data(&date.compact()).await?;
        tracing::debug!("Received {} bytes for {}", xml_text.len(), date.compact());
        parse_response(&xml_text)
    }

    /// 三個區塊的顯示狀態一次設定完，不會同時出現兩個。
    /// 序號在鎖內比對，已有更新的查詢時不動畫面並回傳 `false`。
    async fn enter(&self, generation: u64, next: DisplayState, results_html: Option<&str>) -> bool {
        let mut state = self.state.lock().await;
        if self.generation.load(Ordering::SeqCst) != generation {
            return false;
        }
        if let Some(html) = results_html {
            self.ui.set_results_html(html);
        }
        self.ui.set_loading_visible(next == DisplayState::Loading);
        self.ui.set_error_visible(next == DisplayState::Error);
        self.ui.set_results_visible(next.shows_results());
        *state = next;
        true
    }
}

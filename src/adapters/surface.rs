use crate::domain::ports::UiSurface;
use crate::utils::error::Result;
use askama::Template;
use std::sync::{Mutex, MutexGuard};

pub const ERROR_MESSAGE: &str = "급식 정보를 불러오는데 실패했습니다. 잠시 후 다시 시도해주세요.";

/// 結果區塊已經是 HTML，原樣插入；日期值會被跳脫
#[derive(Template)]
#[template(path = "page.html")]
struct PageTemplate<'a> {
    date_value: &'a str,
    loading: &'static str,
    error: &'static str,
    error_message: &'static str,
    results: &'static str,
    results_html: &'a str,
}

/// 頁面五個區塊目前的內容與顯示狀態
#[derive(Debug, Clone)]
pub struct SurfaceSnapshot {
    pub date_value: String,
    pub results_html: String,
    pub results_visible: bool,
    pub loading_visible: bool,
    pub error_visible: bool,
}

/// 在記憶體中模擬頁面，CLI 用它產生完整的 HTML 檔
#[derive(Debug)]
pub struct BufferedSurface {
    state: Mutex<SurfaceSnapshot>,
    alerts: Mutex<Vec<String>>,
}

impl BufferedSurface {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(SurfaceSnapshot {
                date_value: String::new(),
                results_html: String::new(),
                results_visible: true,
                loading_visible: false,
                error_visible: false,
            }),
            alerts: Mutex::new(Vec::new()),
        }
    }

    fn state(&self) -> MutexGuard<'_, SurfaceSnapshot> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn snapshot(&self) -> SurfaceSnapshot {
        self.state().clone()
    }

    pub fn alerts(&self) -> Vec<String> {
        self.alerts
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// 獨立的 HTML 頁面，隱藏的區塊以 `display: none` 輸出
    pub fn render_page(&self) -> Result<String> {
        let snapshot = self.snapshot();
        let page = PageTemplate {
            date_value: &snapshot.date_value,
            loading: display(snapshot.loading_visible),
            error: display(snapshot.error_visible),
            error_message: ERROR_MESSAGE,
            results: display(snapshot.results_visible),
            results_html: &snapshot.results_html,
        };
        Ok(page.render()?)
    }
}

fn display(visible: bool) -> &'static str {
    if visible {
        "block"
    } else {
        "none"
    }
}

impl Default for BufferedSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl UiSurface for BufferedSurface {
    fn date_value(&self) -> String {
        self.state().date_value.clone()
    }

    fn set_date_value(&self, value: &str) {
        self.state().date_value = value.to_string();
    }

    fn alert(&self, message: &str) {
        self.alerts
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(message.to_string());
    }

    fn set_results_html(&self, html: &str) {
        self.state().results_html = html.to_string();
    }

    fn set_results_visible(&self, visible: bool) {
        self.state().results_visible = visible;
    }

    fn set_loading_visible(&self, visible: bool) {
        self.state().loading_visible = visible;
    }

    fn set_error_visible(&self, visible: bool) {
        self.state().error_visible = visible;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_page_reflects_visibility() {
        let surface = BufferedSurface::new();
        surface.set_date_value("2024-03-15");
        surface.set_results_html("<div class=\"meal-item\"><h3>중식</h3></div>");

        let page = surface.render_page().unwrap();
        assert!(page.contains(r#"<input type="date" id="dateInput" value="2024-03-15">"#));
        assert!(page.contains(r#"<div id="loading" class="loading" style="display: none;">"#));
        assert!(page.contains(r#"<div id="error" class="error" style="display: none;">"#));
        assert!(page.contains(
            r#"<div id="mealInfo" class="meal-info" style="display: block;"><div class="meal-item"><h3>중식</h3></div></div>"#
        ));

        surface.set_results_visible(false);
        surface.set_error_visible(true);
        let page = surface.render_page().unwrap();
        assert!(page.contains(r#"<div id="error" class="error" style="display: block;">"#));
        assert!(page.contains(r#"<div id="mealInfo" class="meal-info" style="display: none;">"#));
    }

    #[test]
    fn test_render_page_escapes_date_value() {
        let surface = BufferedSurface::new();
        surface.set_date_value("\"><script>");

        let page = surface.render_page().unwrap();
        assert!(!page.contains("<script>"));
        assert!(page.contains("&lt;script&gt;"));
    }

    #[test]
    fn test_alerts_are_recorded_in_order() {
        let surface = BufferedSurface::new();
        surface.alert("첫 번째");
        surface.alert("두 번째");
        assert_eq!(surface.alerts(), vec!["첫 번째", "두 번째"]);
    }
}

use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn api_endpoint(&self) -> &str;
    fn office_code(&self) -> &str;
    fn school_code(&self) -> &str;
    fn api_key(&self) -> Option<&str>;
    /// `None` 代表直接連線，不經過中繼伺服器
    fn proxy_url(&self) -> Option<&str>;
}

#[async_trait]
pub trait MealSource: Send + Sync {
    /// 取得指定日期 (`YYYYMMDD`) 的原始 XML 回應
    async fn fetch_meal_data(&self, compact_date: &str) -> Result<String>;
}

/// 頁面上的五個區塊：日期輸入、結果、載入中、錯誤，以及提示框
pub trait UiSurface: Send + Sync {
    fn date_value(&self) -> String;
    fn set_date_value(&self, value: &str);
    fn alert(&self, message: &str);
    fn set_results_html(&self, html: &str);
    fn set_results_visible(&self, visible: bool);
    fn set_loading_visible(&self, visible: bool);
    fn set_error_visible(&self, visible: bool);
}

use crate::domain::ports::{ConfigProvider, MealSource};
use crate::utils::error::{MealError, Result};
use async_trait::async_trait;
use reqwest::Client;
use url::Url;

/// 經由中繼伺服器向 NEIS 學校供餐 API 取資料
pub struct HttpMealSource<C: ConfigProvider> {
    config: C,
    client: Client,
}

impl<C: ConfigProvider> HttpMealSource<C> {
    pub fn new(config: C) -> Self {
        Self::with_client(config, Client::new())
    }

    pub fn with_client(config: C, client: Client) -> Self {
        Self { config, client }
    }

    /// API 本身的網址，不含中繼伺服器
    pub fn target_url(&self, compact_date: &str) -> Result<Url> {
        let mut params = vec![
            ("ATPT_OFCDC_SC_CODE", self.config.office_code()),
            ("SD_SCHUL_CODE", self.config.school_code()),
            ("MLSV_YMD", compact_date),
        ];
        if let Some(key) = self.config.api_key() {
            params.push(("KEY", key));
        }

        Ok(Url::parse_with_params(self.config.api_endpoint(), &params)?)
    }

    /// 實際送出的網址；有設定中繼伺服器時，目標網址編碼後放在 `url` 參數
    pub fn request_url(&self, compact_date: &str) -> Result<Url> {
        let target = self.target_url(compact_date)?;
        match self.config.proxy_url() {
            Some(proxy) => Ok(Url::parse_with_params(proxy, &[("url", target.as_str())])?),
            None => Ok(target),
        }
    }
}

#[async_trait]
impl<C: ConfigProvider> MealSource for HttpMealSource<C> {
    async fn fetch_meal_data(&self, compact_date: &str) -> Result<String> {
        let url = self.request_url(compact_date)?;

        tracing::debug!("Making API request to: {}", url);
        let response = self.client.get(url).send().await?;

        let status = response.status();
        tracing::debug!("API response status: {}", status);

        if !status.is_success() {
            return Err(MealError::HttpStatusError {
                status: status.as_u16(),
            });
        }

        Ok(response.text().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    struct MockConfig {
        api_endpoint: String,
        api_key: Option<String>,
        proxy_url: Option<String>,
    }

    impl MockConfig {
        fn direct(api_endpoint: String) -> Self {
            Self {
                api_endpoint,
                api_key: None,
                proxy_url: None,
            }
        }
    }

    impl ConfigProvider for MockConfig {
        fn api_endpoint(&self) -> &str {
            &self.api_endpoint
        }

        fn office_code(&self) -> &str {
            "J10"
        }

        fn school_code(&self) -> &str {
            "7530079"
        }

        fn api_key(&self) -> Option<&str> {
            self.api_key.as_deref()
        }

        fn proxy_url(&self) -> Option<&str> {
            self.proxy_url.as_deref()
        }
    }

    const NEIS_ENDPOINT: &str = "https://open.neis.go.kr/hub/mealServiceDietInfo";

    #[test]
    fn test_request_url_through_relay() {
        let source = HttpMealSource::new(MockConfig {
            api_endpoint: NEIS_ENDPOINT.to_string(),
            api_key: None,
            proxy_url: Some("https://api.allorigins.win/raw".to_string()),
        });

        let target = source.target_url("20240315").unwrap();
        assert_eq!(
            target.as_str(),
            "https://open.neis.go.kr/hub/mealServiceDietInfo?ATPT_OFCDC_SC_CODE=J10&SD_SCHUL_CODE=7530079&MLSV_YMD=20240315"
        );

        let request = source.request_url("20240315").unwrap();
        assert_eq!(request.path(), "/raw");
        let (name, value) = request.query_pairs().next().unwrap();
        assert_eq!(name, "url");
        assert_eq!(value, target.as_str());
        assert!(!request.query().unwrap().contains("&SD_SCHUL_CODE"));
    }

    #[test]
    fn test_api_key_is_appended_when_configured() {
        let source = HttpMealSource::new(MockConfig {
            api_endpoint: NEIS_ENDPOINT.to_string(),
            api_key: Some("secret".to_string()),
            proxy_url: None,
        });

        let url = source.request_url("20240315").unwrap();
        assert!(url.as_str().ends_with("&MLSV_YMD=20240315&KEY=secret"));
    }

    #[test]
    fn test_invalid_endpoint_is_url_error() {
        let source = HttpMealSource::new(MockConfig::direct("not a url".to_string()));
        assert!(matches!(
            source.request_url("20240315"),
            Err(MealError::UrlError(_))
        ));
    }

    #[tokio::test]
    async fn test_fetch_returns_raw_body_via_relay() {
        let server = MockServer::start();
        let body = concat!(
            "<mealServiceDietInfo><row><MMEAL_SC_NM>중식</MMEAL_SC_NM></row>",
            "</mealServiceDietInfo>"
        );

        let relay_mock = server.mock(|when, then| {
            when.method(GET).path("/raw").query_param(
                "url",
                "https://open.neis.go.kr/hub/mealServiceDietInfo?ATPT_OFCDC_SC_CODE=J10&SD_SCHUL_CODE=7530079&MLSV_YMD=20240315",
            );
            then.status(200)
                .header("Content-Type", "text/xml; charset=UTF-8")
                .body(body);
        });

        let source = HttpMealSource::new(MockConfig {
            api_endpoint: NEIS_ENDPOINT.to_string(),
            api_key: None,
            proxy_url: Some(server.url("/raw")),
        });

        let xml = source.fetch_meal_data("20240315").await.unwrap();

        relay_mock.assert();
        assert_eq!(xml, body);
    }

    #[tokio::test]
    async fn test_fetch_direct_without_relay() {
        let server = MockServer::start();

        let api_mock = server.mock(|when, then| {
            when.method(GET)
                .path("/hub/mealServiceDietInfo")
                .query_param("ATPT_OFCDC_SC_CODE", "J10")
                .query_param("SD_SCHUL_CODE", "7530079")
                .query_param("MLSV_YMD", "20240318");
            then.status(200).body("<RESULT><CODE>INFO-200</CODE></RESULT>");
        });

        let source =
            HttpMealSource::new(MockConfig::direct(server.url("/hub/mealServiceDietInfo")));
        let xml = source.fetch_meal_data("20240318").await.unwrap();

        api_mock.assert();
        assert!(xml.contains("INFO-200"));
    }

    #[tokio::test]
    async fn test_fetch_non_success_status_is_error() {
        let server = MockServer::start();

        let api_mock = server.mock(|when, then| {
            when.method(GET).path("/hub/mealServiceDietInfo");
            then.status(500).body("Internal Server Error");
        });

        let source =
            HttpMealSource::new(MockConfig::direct(server.url("/hub/mealServiceDietInfo")));
        let result = source.fetch_meal_data("20240315").await;

        api_mock.assert();
        assert!(matches!(
            result,
            Err(MealError::HttpStatusError { status: 500 })
        ));
    }

    #[tokio::test]
    async fn test_fetch_transport_failure_is_http_error() {
        // 沒有服務在聽的埠，連線直接被拒
        let source = HttpMealSource::new(MockConfig::direct(
            "http://127.0.0.1:1/hub/mealServiceDietInfo".to_string(),
        ));
        let result = source.fetch_meal_data("20240315").await;

        match result {
            Err(MealError::HttpError(e)) => assert!(e.is_connect() || e.is_request()),
            other => panic!("unexpected result: {other:?}"),
        }
    }
}

use crate::utils::error::{MealError, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

const EMPTY_DATE_MESSAGE: &str = "날짜를 선택해주세요.";
const ACCEPTED_DATE_FORMATS: [&str; 4] = ["%Y-%m-%d", "%Y%m%d", "%Y.%m.%d", "%Y/%m/%d"];

/// 使用者在日期欄位選的日期，每次查詢時重新讀取
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateSelection {
    date: NaiveDate,
}

impl DateSelection {
    pub fn new(date: NaiveDate) -> Self {
        Self { date }
    }

    pub fn parse(input: &str) -> Result<Self> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(MealError::ValidationError {
                message: EMPTY_DATE_MESSAGE.to_string(),
            });
        }

        ACCEPTED_DATE_FORMATS
            .iter()
            .find_map(|format| NaiveDate::parse_from_str(trimmed, format).ok())
            .map(Self::new)
            .ok_or_else(|| MealError::ValidationError {
                message: format!("올바른 날짜가 아닙니다: {}", trimmed),
            })
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    /// API 需要的 `YYYYMMDD` 格式
    pub fn compact(&self) -> String {
        self.date.format("%Y%m%d").to_string()
    }

    pub fn iso(&self) -> String {
        self.date.format("%Y-%m-%d").to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MealRecord {
    pub meal_name: String,
    /// 原始菜單字串，可能夾帶 `<br/>` 與過敏原代碼
    pub dishes: String,
    pub calories: String,
    pub nutrition: String,
    pub origin: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DisplayState {
    #[default]
    Idle,
    Loading,
    Loaded,
    Error,
}

impl DisplayState {
    /// Idle 與 Loaded 在畫面上是同一個區塊
    pub fn shows_results(&self) -> bool {
        matches!(self, DisplayState::Idle | DisplayState::Loaded)
    }
}

/// 一次查詢的結果，畫面狀態已經由 widget 處理完
#[derive(Debug)]
pub enum SearchOutcome {
    /// 日期欄位空白或格式錯誤，沒有發出請求
    Rejected(MealError),
    /// 查詢成功，空陣列代表當天沒有供餐
    Loaded(Vec<MealRecord>),
    Failed(MealError),
    /// 有更新的查詢在這次回應前開始，結果被丟棄
    Superseded,
}

impl SearchOutcome {
    pub fn is_loaded(&self) -> bool {
        matches!(self, SearchOutcome::Loaded(_))
    }
}

use crate::domain::model::{DateSelection, MealRecord};
use crate::utils::error::Result;
use askama::Template;
use chrono::Datelike;
use regex::Regex;
use std::sync::OnceLock;

const WEEKDAYS: [&str; 7] = ["일", "월", "화", "수", "목", "금", "토"];
const NOT_AVAILABLE: &str = "정보 없음";

static LINE_BREAK: OnceLock<Regex> = OnceLock::new();
static MARKUP_TAG: OnceLock<Regex> = OnceLock::new();
static PARENTHESIZED: OnceLock<Regex> = OnceLock::new();

fn line_break() -> &'static Regex {
    LINE_BREAK.get_or_init(|| Regex::new(r"(?i)<br\s*/?>").expect("line break pattern"))
}

fn markup_tag() -> &'static Regex {
    MARKUP_TAG.get_or_init(|| Regex::new(r"<[^>]*>").expect("markup tag pattern"))
}

fn parenthesized() -> &'static Regex {
    PARENTHESIZED.get_or_init(|| Regex::new(r"\([^)]*\)").expect("parenthesized pattern"))
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RenderOptions {
    /// 額外顯示營養資訊與原產地
    pub show_details: bool,
}

/// 菜單字串整理成清單：`<br>` 換行、去標籤、去掉過敏原代碼括號，
/// 逐行 trim 後丟掉空行，順序不變。
pub fn clean_dishes(dishes: &str) -> Vec<String> {
    let with_newlines = line_break().replace_all(dishes, "\n");
    let without_tags = markup_tag().replace_all(&with_newlines, "");
    let without_codes = parenthesized().replace_all(&without_tags, "");
    split_lines(&without_codes)
}

/// 和 `clean_dishes` 相同但保留括號，營養資訊的單位寫在括號裡
pub fn markup_lines(text: &str) -> Vec<String> {
    let with_newlines = line_break().replace_all(text, "\n");
    let without_tags = markup_tag().replace_all(&with_newlines, "");
    split_lines(&without_tags)
}

fn split_lines(text: &str) -> Vec<String> {
    text.split('\n')
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// `2024년 3월 15일 (금)`
pub fn format_date_heading(date: &DateSelection) -> String {
    let day = date.date();
    let weekday = WEEKDAYS[day.weekday().num_days_from_sunday() as usize];
    format!("{}년 {}월 {}일 ({})", day.year(), day.month(), day.day(), weekday)
}

struct DetailSection {
    title: &'static str,
    lines: Vec<String>,
}

struct MealView<'a> {
    name: &'a str,
    dishes: Vec<String>,
    calories: &'a str,
    details: Vec<DetailSection>,
}

impl<'a> MealView<'a> {
    fn new(record: &'a MealRecord, options: RenderOptions) -> Self {
        let calories = if record.calories.is_empty() {
            NOT_AVAILABLE
        } else {
            record.calories.as_str()
        };
        let details = if options.show_details {
            [("🥗 영양 정보", &record.nutrition), ("🌾 원산지", &record.origin)]
                .into_iter()
                .map(|(title, text)| DetailSection {
                    title,
                    lines: markup_lines(text),
                })
                .filter(|section| !section.lines.is_empty())
                .collect()
        } else {
            Vec::new()
        };

        Self {
            name: &record.meal_name,
            dishes: clean_dishes(&record.dishes),
            calories,
            details,
        }
    }
}

#[derive(Template)]
#[template(path = "results.html")]
struct ResultsTemplate<'a> {
    heading: &'a str,
    meals: Vec<MealView<'a>>,
}

#[derive(Template)]
#[template(path = "no_data.html")]
struct NoDataTemplate<'a> {
    heading: &'a str,
}

/// 結果區塊的 HTML。`None` 或空清單時顯示「沒有供餐」的說明，不是錯誤畫面。
pub fn render(
    records: Option<&[MealRecord]>,
    date: &DateSelection,
    options: RenderOptions,
) -> Result<String> {
    let heading = format_date_heading(date);

    let html = match records {
        Some(records) if !records.is_empty() => ResultsTemplate {
            heading: &heading,
            meals: records
                .iter()
                .map(|record| MealView::new(record, options))
                .collect(),
        }
        .render()?,
        _ => NoDataTemplate { heading: &heading }.render()?,
    };
    Ok(html)
}

use thiserror::Error;

#[derive(Error, Debug)]
pub enum MealError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("HTTP error! status: {status}")]
    HttpStatusError { status: u16 },

    #[error("XML parsing error: {message}")]
    XmlParseError { message: String },

    #[error("Invalid URL: {0}")]
    UrlError(#[from] url::ParseError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Template rendering error: {0}")]
    TemplateError(#[from] askama::Error),

    #[error("Configuration error in '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Validation error: {message}")]
    ValidationError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Data,
    Configuration,
    Validation,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl MealError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            MealError::HttpError(_) | MealError::HttpStatusError { .. } => ErrorCategory::Network,
            MealError::XmlParseError { .. }
            | MealError::SerializationError(_)
            | MealError::TemplateError(_) => ErrorCategory::Data,
            MealError::UrlError(_)
            | MealError::ConfigValidationError { .. }
            | MealError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            MealError::ValidationError { .. } => ErrorCategory::Validation,
            MealError::IoError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Validation => ErrorSeverity::Low,
            ErrorCategory::Network => ErrorSeverity::Medium,
            ErrorCategory::Data | ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            MealError::HttpError(_) => {
                "네트워크 연결과 중계 서버 상태를 확인한 뒤 다시 시도해주세요.".to_string()
            }
            MealError::HttpStatusError { status } if *status >= 500 => {
                format!("서버 오류({})입니다. 잠시 후 다시 시도해주세요.", status)
            }
            MealError::HttpStatusError { status } => {
                format!("요청이 거부되었습니다({}). 학교 코드와 API 키를 확인해주세요.", status)
            }
            MealError::XmlParseError { .. } => {
                "응답 형식이 올바르지 않습니다. 중계 서버를 끄고(--no-proxy) 다시 시도해보세요."
                    .to_string()
            }
            MealError::UrlError(_) => "엔드포인트와 중계 서버 URL 형식을 확인해주세요.".to_string(),
            MealError::IoError(_) => "출력 경로의 권한과 남은 용량을 확인해주세요.".to_string(),
            MealError::SerializationError(_) => "결과를 JSON으로 저장하지 못했습니다.".to_string(),
            MealError::TemplateError(_) => "결과 화면을 만들지 못했습니다.".to_string(),
            MealError::ConfigValidationError { field, .. }
            | MealError::InvalidConfigValueError { field, .. } => {
                format!("설정 항목 '{}'을(를) 확인해주세요.", field)
            }
            MealError::ValidationError { .. } => "YYYY-MM-DD 형식의 날짜를 입력해주세요.".to_string(),
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Network | ErrorCategory::Data => {
                "급식 정보를 불러오는데 실패했습니다.".to_string()
            }
            ErrorCategory::Configuration => format!("설정 오류: {}", self),
            ErrorCategory::Validation => match self {
                MealError::ValidationError { message } => message.clone(),
                other => other.to_string(),
            },
            ErrorCategory::System => format!("시스템 오류: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, MealError>;

use serde::Serialize;
use thiserror::Error;

/// 解析失败时使用的哨兵返回码
pub const PARSE_ERROR_CODE: &str = "PARSE_ERROR";

/// HTTP 失败且响应中没有 returnCode 时使用的返回码
pub const HTTP_ERROR_CODE: &str = "HTTP_ERROR";

/// LINE Pay 客户端错误类型
#[derive(Error, Debug)]
pub enum LinePayError {
    /// 配置错误（凭证或超时无效）
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// 请求参数在发送前验证失败
    #[error("Validation error on `{field}`: {message}")]
    ValidationError { field: String, message: String },

    /// 交易ID格式错误
    #[error("Invalid transactionId format: `{0}` (expected 19 digits)")]
    InvalidTransactionId(String),

    /// HTTP 状态码非 2xx
    #[error("LINE Pay API Error [{return_code}]: {return_message} (HTTP {http_status})")]
    HttpError {
        return_code: String,
        return_message: String,
        http_status: u16,
        raw_response: String,
    },

    /// HTTP 成功，但 returnCode 不是 "0000"
    #[error("LINE Pay API Error [{return_code}]: {return_message}")]
    BusinessError {
        return_code: String,
        return_message: String,
        http_status: u16,
        raw_response: String,
    },

    /// 响应体不是合法的 JSON 信封
    #[error("Failed to parse LINE Pay response (HTTP {http_status})")]
    ParseError {
        http_status: u16,
        raw_response: String,
    },

    /// 请求超时
    #[error("Request timeout after {timeout_ms}ms: {url}")]
    TimeoutError { timeout_ms: u64, url: String },

    /// 网络层错误（DNS、连接重置等）
    #[error(transparent)]
    NetworkError(#[from] reqwest::Error),

    /// 序列化错误
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// 回调参数错误
    #[error("Callback error: {0}")]
    CallbackError(String),
}

impl LinePayError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ValidationError {
            field: field.into(),
            message: message.into(),
        }
    }

    /// 远端返回码；解析失败时为哨兵值
    pub fn return_code(&self) -> Option<&str> {
        match self {
            Self::HttpError { return_code, .. } | Self::BusinessError { return_code, .. } => {
                Some(return_code)
            }
            Self::ParseError { .. } => Some(PARSE_ERROR_CODE),
            _ => None,
        }
    }

    pub fn return_message(&self) -> Option<&str> {
        match self {
            Self::HttpError { return_message, .. }
            | Self::BusinessError { return_message, .. } => Some(return_message),
            _ => None,
        }
    }

    pub fn http_status(&self) -> Option<u16> {
        match self {
            Self::HttpError { http_status, .. }
            | Self::BusinessError { http_status, .. }
            | Self::ParseError { http_status, .. } => Some(*http_status),
            _ => None,
        }
    }

    pub fn raw_response(&self) -> Option<&str> {
        match self {
            Self::HttpError { raw_response, .. }
            | Self::BusinessError { raw_response, .. }
            | Self::ParseError { raw_response, .. } => Some(raw_response),
            _ => None,
        }
    }

    /// 认证类错误（1xxx）
    pub fn is_auth_error(&self) -> bool {
        self.return_code().is_some_and(|code| code.starts_with('1'))
    }

    /// 支付类错误（2xxx）
    pub fn is_payment_error(&self) -> bool {
        self.return_code().is_some_and(|code| code.starts_with('2'))
    }

    /// 内部错误（9xxx）
    pub fn is_internal_error(&self) -> bool {
        self.return_code().is_some_and(|code| code.starts_with('9'))
    }

    /// 变体名称
    pub fn kind(&self) -> &'static str {
        match self {
            Self::ConfigError(_) => "ConfigError",
            Self::ValidationError { .. } => "ValidationError",
            Self::InvalidTransactionId(_) => "InvalidTransactionId",
            Self::HttpError { .. } => "HttpError",
            Self::BusinessError { .. } => "BusinessError",
            Self::ParseError { .. } => "ParseError",
            Self::TimeoutError { .. } => "TimeoutError",
            Self::NetworkError(_) => "NetworkError",
            Self::SerializationError(_) => "SerializationError",
            Self::CallbackError(_) => "CallbackError",
        }
    }

    /// 结构化记录，供日志或上报使用
    pub fn to_record(&self) -> LinePayErrorRecord<'_> {
        LinePayErrorRecord {
            name: self.kind(),
            message: self.to_string(),
            return_code: self.return_code(),
            return_message: self.return_message(),
            http_status: self.http_status(),
            raw_response: self.raw_response(),
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!(self.to_record())
    }

    /// 是否为远端 API 报告的失败
    pub fn is_api_error(&self) -> bool {
        matches!(
            self,
            Self::HttpError { .. } | Self::BusinessError { .. } | Self::ParseError { .. }
        )
    }
}

/// 错误的可序列化视图，缺失的字段不输出
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LinePayErrorRecord<'a> {
    pub name: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub return_code: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub return_message: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub http_status: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_response: Option<&'a str>,
}

/// 客户端结果类型
pub type LinePayResult<T> = Result<T, LinePayError>;

use crate::domain::errors::{HTTP_ERROR_CODE, LinePayError, LinePayResult};
use crate::infrastructure::config::LinePayConfig;
use crate::infrastructure::signature;
use crate::ports::{LinePayResponse, SUCCESS_RETURN_CODE};
use reqwest::{Client, Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, error, warn};

pub const HEADER_CHANNEL_ID: &str = "X-LINE-ChannelId";
pub const HEADER_NONCE: &str = "X-LINE-Authorization-Nonce";
pub const HEADER_SIGNATURE: &str = "X-LINE-Authorization";

/// 未类型化的响应信封，先分类再解析 `info`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawEnvelope {
    #[serde(default)]
    return_code: Option<String>,
    #[serde(default)]
    return_message: Option<String>,
    #[serde(default)]
    info: Option<serde_json::Value>,
}

/// 签名传输层：每次调用生成新的 nonce、签名并在超时内完成一次请求
#[derive(Clone)]
pub struct Transport {
    client: Client,
    channel_id: String,
    channel_secret: String,
    base_url: String,
    timeout: Duration,
}

impl Transport {
    pub fn new(config: &LinePayConfig) -> LinePayResult<Self> {
        config.validate()?;

        Ok(Self {
            client: Client::new(),
            channel_id: config.channel_id.trim().to_string(),
            channel_secret: config.channel_secret.trim().to_string(),
            base_url: config.base_url().to_string(),
            timeout: config.timeout(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// 用渠道密钥验证签名
    pub fn verify_signature(&self, data: &str, signature: &str) -> bool {
        signature::verify_signature(&self.channel_secret, data, signature)
    }

    /// 生成随机 nonce，每个请求独立
    fn generate_nonce() -> String {
        uuid::Uuid::new_v4().to_string()
    }

    /// 执行一次签名请求并分类响应
    pub async fn execute<B, T>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
        query: &[(&str, String)],
    ) -> LinePayResult<LinePayResponse<T>>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        // 1. nonce
        let nonce = Self::generate_nonce();

        // 2. 查询串
        let query_string = build_query_string(query);

        // 3. 请求体（GET 不带请求体）
        let body_string = match body {
            Some(body) if method != Method::GET => serde_json::to_string(body)?,
            _ => String::new(),
        };

        // 4. 签名
        let signature = signature::sign(
            &self.channel_secret,
            path,
            &body_string,
            &nonce,
            &query_string,
        );

        // 5. 发送
        let url = if query_string.is_empty() {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}{}?{}", self.base_url, path, query_string)
        };
        debug!("LINE Pay request: {} {} (nonce {})", method, url, nonce);

        let mut request = self
            .client
            .request(method.clone(), &url)
            .header("Content-Type", "application/json")
            .header(HEADER_CHANNEL_ID, &self.channel_id)
            .header(HEADER_NONCE, &nonce)
            .header(HEADER_SIGNATURE, signature);
        if method != Method::GET {
            request = request.body(body_string);
        }

        // 6. 超时只约束等待响应，响应到达后计时器随 future 一起释放
        let response = match tokio::time::timeout(self.timeout, request.send()).await {
            Ok(result) => result?,
            Err(_) => {
                let timeout_ms = self.timeout.as_millis() as u64;
                warn!("LINE Pay request timed out after {}ms: {}", timeout_ms, url);
                return Err(LinePayError::TimeoutError { timeout_ms, url });
            }
        };

        // 7. 读取并分类
        let status = response.status();
        let raw = response.text().await?;
        debug!("LINE Pay response: {} {}", status, path);

        classify_response(status, raw)
    }
}

/// 构建规范查询串（不带 `?`）
pub fn build_query_string(query: &[(&str, String)]) -> String {
    if query.is_empty() {
        return String::new();
    }

    let mut serializer = url::form_urlencoded::Serializer::new(String::new());
    for (key, value) in query {
        serializer.append_pair(key, value);
    }
    serializer.finish()
}

/// 将 HTTP 状态与原始响应体分类为成功或失败
pub fn classify_response<T: DeserializeOwned>(
    status: StatusCode,
    raw: String,
) -> LinePayResult<LinePayResponse<T>> {
    let envelope: RawEnvelope = match serde_json::from_str(&raw) {
        Ok(envelope) => envelope,
        Err(e) => {
            error!("Failed to parse LINE Pay response (HTTP {}): {}", status, e);
            return Err(LinePayError::ParseError {
                http_status: status.as_u16(),
                raw_response: raw,
            });
        }
    };

    if !status.is_success() {
        let return_code = envelope
            .return_code
            .unwrap_or_else(|| HTTP_ERROR_CODE.to_string());
        let return_message = envelope
            .return_message
            .unwrap_or_else(|| status.canonical_reason().unwrap_or("Unknown").to_string());
        error!("LINE Pay HTTP error: {} [{}] {}", status, return_code, return_message);
        return Err(LinePayError::HttpError {
            return_code,
            return_message,
            http_status: status.as_u16(),
            raw_response: raw,
        });
    }

    let Some(return_code) = envelope.return_code else {
        error!("LINE Pay response missing returnCode (HTTP {})", status);
        return Err(LinePayError::ParseError {
            http_status: status.as_u16(),
            raw_response: raw,
        });
    };
    let return_message = envelope.return_message.unwrap_or_default();

    if return_code != SUCCESS_RETURN_CODE {
        warn!("LINE Pay business error: [{}] {}", return_code, return_message);
        return Err(LinePayError::BusinessError {
            return_code,
            return_message,
            http_status: status.as_u16(),
            raw_response: raw,
        });
    }

    let info = match envelope.info {
        None | Some(serde_json::Value::Null) => None,
        Some(value) => match serde_json::from_value(value) {
            Ok(info) => Some(info),
            Err(e) => {
                error!("Unexpected LINE Pay info payload: {}", e);
                return Err(LinePayError::ParseError {
                    http_status: status.as_u16(),
                    raw_response: raw,
                });
            }
        },
    };

    Ok(LinePayResponse {
        return_code,
        return_message,
        info,
    })
}

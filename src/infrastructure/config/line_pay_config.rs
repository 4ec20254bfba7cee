use crate::domain::errors::{LinePayError, LinePayResult};
use crate::domain::Environment;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// 默认超时（20秒）
pub const DEFAULT_TIMEOUT_MS: u64 = 20_000;

/// LINE Pay 配置
#[derive(Clone, Serialize, Deserialize)]
pub struct LinePayConfig {
    /// 渠道ID（LINE Pay 商户中心）
    pub channel_id: String,

    /// 渠道密钥，同时作为 HMAC 密钥
    pub channel_secret: String,

    #[serde(default)]
    pub env: Environment,

    /// 超时（毫秒）
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// 覆盖环境对应的基础URL（代理或本地模拟服务）
    #[serde(default)]
    pub base_url: Option<String>,
}

fn default_timeout_ms() -> u64 {
    DEFAULT_TIMEOUT_MS
}

// channel_secret 不能出现在日志里
impl fmt::Debug for LinePayConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LinePayConfig")
            .field("channel_id", &self.channel_id)
            .field("channel_secret", &"***")
            .field("env", &self.env)
            .field("timeout_ms", &self.timeout_ms)
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl LinePayConfig {
    pub fn new(channel_id: impl Into<String>, channel_secret: impl Into<String>) -> Self {
        Self {
            channel_id: channel_id.into(),
            channel_secret: channel_secret.into(),
            env: Environment::default(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
            base_url: None,
        }
    }

    pub fn with_env(mut self, env: Environment) -> Self {
        self.env = env;
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// 从进程环境变量加载，`.env` 文件由调用方（例如 `main`）预先载入
    pub fn from_env() -> LinePayResult<Self> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// 通过 `lookup` 读取 `LINE_PAY_*` 变量
    pub fn from_vars<F>(lookup: F) -> LinePayResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let channel_id = lookup("LINE_PAY_CHANNEL_ID").ok_or_else(|| {
            LinePayError::ConfigError("LINE_PAY_CHANNEL_ID must be set".to_string())
        })?;
        let channel_secret = lookup("LINE_PAY_CHANNEL_SECRET").ok_or_else(|| {
            LinePayError::ConfigError("LINE_PAY_CHANNEL_SECRET must be set".to_string())
        })?;

        let mut config = Self::new(channel_id, channel_secret);

        if let Some(env) = lookup("LINE_PAY_ENV") {
            config.env = env.parse()?;
        }
        if let Some(timeout) = lookup("LINE_PAY_TIMEOUT_MS") {
            config.timeout_ms = timeout.trim().parse().map_err(|_| {
                LinePayError::ConfigError(format!(
                    "LINE_PAY_TIMEOUT_MS must be a positive integer, got `{}`",
                    timeout
                ))
            })?;
        }
        if let Some(base_url) = lookup("LINE_PAY_BASE_URL") {
            config.base_url = Some(base_url);
        }

        config.validate()?;
        Ok(config)
    }

    /// 验证凭证和超时
    pub fn validate(&self) -> LinePayResult<()> {
        if self.channel_id.trim().is_empty() {
            return Err(LinePayError::ConfigError(
                "channelId is required and cannot be empty".to_string(),
            ));
        }
        if self.channel_secret.trim().is_empty() {
            return Err(LinePayError::ConfigError(
                "channelSecret is required and cannot be empty".to_string(),
            ));
        }
        if self.timeout_ms == 0 {
            return Err(LinePayError::ConfigError(
                "timeout must be a positive number of milliseconds".to_string(),
            ));
        }
        if let Some(base_url) = &self.base_url {
            url::Url::parse(base_url).map_err(|e| {
                LinePayError::ConfigError(format!("invalid base URL `{}`: {}", base_url, e))
            })?;
        }
        Ok(())
    }

    /// 实际使用的基础URL（不带末尾斜杠）
    pub fn base_url(&self) -> &str {
        self.base_url
            .as_deref()
            .unwrap_or_else(|| self.env.base_url())
            .trim_end_matches('/')
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

use crate::domain::errors::{LinePayError, LinePayResult};
use crate::domain::TransactionId;
use serde::{Deserialize, Serialize};

/// 用户授权后跳转到 confirmUrl 时携带的参数
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmCallback {
    pub transaction_id: String,
    pub order_id: Option<String>,
}

impl ConfirmCallback {
    /// 从查询参数对中提取，重复的键取第一个值
    pub fn from_query_pairs<I, K, V>(pairs: I) -> LinePayResult<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut transaction_id: Option<String> = None;
        let mut order_id: Option<String> = None;

        for (key, value) in pairs {
            match key.as_ref() {
                "transactionId" if transaction_id.is_none() => transaction_id = Some(value.into()),
                "orderId" if order_id.is_none() => order_id = Some(value.into()),
                _ => {}
            }
        }

        let transaction_id = transaction_id
            .filter(|id| !id.is_empty())
            .ok_or_else(|| {
                LinePayError::CallbackError("Missing transactionId in callback query".to_string())
            })?;

        Ok(Self {
            transaction_id,
            order_id,
        })
    }

    /// 从原始查询串解析，允许带前导 `?`
    pub fn from_query_str(query: &str) -> LinePayResult<Self> {
        let query = query.strip_prefix('?').unwrap_or(query);
        Self::from_query_pairs(url::form_urlencoded::parse(query.as_bytes()))
    }

    /// 校验为19位交易ID，供后续确认付款使用
    pub fn transaction_id(&self) -> LinePayResult<TransactionId> {
        TransactionId::parse(&self.transaction_id)
    }
}

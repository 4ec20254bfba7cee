use crate::domain::errors::LinePayResult;
use crate::domain::{Currency, PaymentDraft, PaymentRequestBody};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// 成功返回码
pub const SUCCESS_RETURN_CODE: &str = "0000";

/// 统一响应信封
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinePayResponse<T> {
    pub return_code: String,
    pub return_message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub info: Option<T>,
}

/// 确认付款请求
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmPaymentRequest {
    #[serde(with = "crate::domain::amount")]
    pub amount: f64,
    pub currency: Currency,
}

/// 请款请求
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CapturePaymentRequest {
    #[serde(with = "crate::domain::amount")]
    pub amount: f64,
    pub currency: Currency,
}

/// 退款请求，不指定金额则全额退款
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefundPaymentRequest {
    #[serde(
        default,
        with = "crate::domain::amount::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub refund_amount: Option<f64>,
}

/// 查询付款明细参数
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PaymentDetailsParams {
    /// 需要返回的字段，例如 `transactionId,orderId`
    pub fields: Option<String>,
    pub transaction_id: Option<Vec<String>>,
    pub order_id: Option<Vec<String>>,
}

impl PaymentDetailsParams {
    /// 转换为有序查询参数，空值不会出现在结果中
    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();

        if let Some(fields) = self.fields.as_deref().filter(|f| !f.is_empty()) {
            pairs.push(("fields", fields.to_string()));
        }
        if let Some(ids) = self.transaction_id.as_ref().filter(|ids| !ids.is_empty()) {
            pairs.push(("transactionId", ids.join(",")));
        }
        if let Some(ids) = self.order_id.as_ref().filter(|ids| !ids.is_empty()) {
            pairs.push(("orderId", ids.join(",")));
        }

        pairs
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentUrl {
    pub web: String,
    /// App 深度链接
    pub app: String,
}

/// 付款请求结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestPaymentInfo {
    pub payment_url: PaymentUrl,
    /// 19位数字，按字符串处理避免精度丢失
    pub transaction_id: String,
    pub payment_access_token: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayInfo {
    pub method: String,
    pub amount: f64,
    #[serde(default)]
    pub credit_card_nickname: Option<String>,
    #[serde(default)]
    pub credit_card_brand: Option<String>,
    #[serde(default)]
    pub masked_credit_card_number: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingInfo {
    pub method_id: String,
    pub fee_amount: f64,
    #[serde(default)]
    pub address: Option<crate::domain::ShippingAddress>,
}

/// 响应中的商品
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub quantity: u32,
    pub price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_price: Option<f64>,
}

/// 响应中的包裹，手续费字段为 `userFeeAmount`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageInfo {
    pub id: String,
    pub amount: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_fee_amount: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub products: Vec<ProductInfo>,
}

/// 确认/请款结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentConfirmationInfo {
    pub order_id: String,
    pub transaction_id: String,
    #[serde(default)]
    pub pay_info: Vec<PayInfo>,
    #[serde(default)]
    pub packages: Option<Vec<PackageInfo>>,
    #[serde(default)]
    pub shipping: Option<ShippingInfo>,
}

/// 取消授权没有业务数据
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VoidInfo {}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefundInfo {
    pub refund_transaction_id: String,
    pub refund_date: String,
    #[serde(default)]
    pub refund_amount: Option<f64>,
}

/// 付款明细
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentDetailsInfo {
    pub transaction_id: String,
    pub order_id: String,
    #[serde(default)]
    pub product_name: Option<String>,
    pub currency: String,
    pub amount: f64,
    pub pay_status: String,
    #[serde(default)]
    pub authorization_expire_date: Option<String>,
    #[serde(default)]
    pub reg_key: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingMethod {
    pub method_id: String,
    pub fee_amount: f64,
}

/// 付款状态检查结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckStatusInfo {
    #[serde(default)]
    pub shipping: Option<ShippingMethod>,
}

pub type RequestPaymentResponse = LinePayResponse<RequestPaymentInfo>;
pub type ConfirmPaymentResponse = LinePayResponse<PaymentConfirmationInfo>;
pub type CapturePaymentResponse = LinePayResponse<PaymentConfirmationInfo>;
pub type VoidPaymentResponse = LinePayResponse<VoidInfo>;
pub type RefundPaymentResponse = LinePayResponse<RefundInfo>;
pub type PaymentDetailsResponse = LinePayResponse<Vec<PaymentDetailsInfo>>;
pub type CheckPaymentStatusResponse = LinePayResponse<CheckStatusInfo>;

/// LINE Pay 端口接口
#[async_trait]
pub trait LinePayPort: Send + Sync {
    /// 发起付款 `POST /v4/payments/request`
    async fn request_payment(
        &self,
        body: PaymentRequestBody,
    ) -> LinePayResult<RequestPaymentResponse>;

    /// 确认付款 `POST /v4/payments/{transactionId}/confirm`
    async fn confirm(
        &self,
        transaction_id: &str,
        body: &ConfirmPaymentRequest,
    ) -> LinePayResult<ConfirmPaymentResponse>;

    /// 请款 `POST /v4/payments/authorizations/{transactionId}/capture`
    async fn capture(
        &self,
        transaction_id: &str,
        body: &CapturePaymentRequest,
    ) -> LinePayResult<CapturePaymentResponse>;

    /// 取消授权 `POST /v4/payments/authorizations/{transactionId}/void`
    async fn void(&self, transaction_id: &str) -> LinePayResult<VoidPaymentResponse>;

    /// 退款 `POST /v4/payments/{transactionId}/refund`
    async fn refund(
        &self,
        transaction_id: &str,
        body: &RefundPaymentRequest,
    ) -> LinePayResult<RefundPaymentResponse>;

    /// 查询付款明细 `GET /v4/payments/requests`
    async fn get_details(
        &self,
        params: &PaymentDetailsParams,
    ) -> LinePayResult<PaymentDetailsResponse>;

    /// 检查付款状态 `GET /v4/payments/requests/{transactionId}/check`
    async fn check_status(
        &self,
        transaction_id: &str,
    ) -> LinePayResult<CheckPaymentStatusResponse>;

    /// 验证草稿后发起付款
    async fn send_payment(&self, draft: PaymentDraft) -> LinePayResult<RequestPaymentResponse> {
        let body = draft.into_body()?;
        debug!("Payment draft validated for order: {}", body.order_id());
        self.request_payment(body).await
    }
}

use crate::domain::errors::LinePayResult;
use crate::domain::{PaymentDraft, PaymentRequestBody, TransactionId};
use crate::infrastructure::config::LinePayConfig;
use crate::infrastructure::transport::Transport;
use crate::ports::line_pay_port::*;
use async_trait::async_trait;
use percent_encoding::{NON_ALPHANUMERIC, utf8_percent_encode};
use reqwest::Method;
use serde_json::json;
use tracing::info;

const REQUEST_PATH: &str = "/v4/payments/request";
const DETAILS_PATH: &str = "/v4/payments/requests";

/// LINE Pay V4 客户端
///
/// 凭证、基础URL和超时在构造后只读，可在多个并发调用间共享。
#[derive(Clone)]
pub struct LinePayClient {
    transport: Transport,
}

impl LinePayClient {
    /// 创建客户端，配置无效时返回 `ConfigError`
    pub fn new(config: LinePayConfig) -> LinePayResult<Self> {
        let transport = Transport::new(&config)?;
        info!(
            "LINE Pay client created: channel {} ({}, timeout {}ms)",
            config.channel_id.trim(),
            config.env,
            config.timeout_ms
        );

        Ok(Self { transport })
    }

    pub fn from_env() -> LinePayResult<Self> {
        Self::new(LinePayConfig::from_env()?)
    }

    /// 新建付款草稿
    pub fn payment(&self) -> PaymentDraft {
        PaymentDraft::new()
    }

    pub fn base_url(&self) -> &str {
        self.transport.base_url()
    }

    /// 用渠道密钥验证回调签名
    pub fn verify_signature(&self, data: &str, signature: &str) -> bool {
        self.transport.verify_signature(data, signature)
    }

    /// `{prefix}/{transactionId}{suffix}`，交易ID先校验再编码
    fn transaction_path(prefix: &str, transaction_id: &str, suffix: &str) -> LinePayResult<String> {
        let id = TransactionId::parse(transaction_id)?;
        Ok(format!(
            "{}/{}{}",
            prefix,
            utf8_percent_encode(id.as_str(), NON_ALPHANUMERIC),
            suffix
        ))
    }
}

#[async_trait]
impl LinePayPort for LinePayClient {
    async fn request_payment(
        &self,
        body: PaymentRequestBody,
    ) -> LinePayResult<RequestPaymentResponse> {
        info!("Requesting payment for order: {}", body.order_id());

        self.transport
            .execute(Method::POST, REQUEST_PATH, Some(&body), &[])
            .await
    }

    async fn confirm(
        &self,
        transaction_id: &str,
        body: &ConfirmPaymentRequest,
    ) -> LinePayResult<ConfirmPaymentResponse> {
        let path = Self::transaction_path("/v4/payments", transaction_id, "/confirm")?;
        info!("Confirming payment: {}", transaction_id);

        self.transport
            .execute(Method::POST, &path, Some(body), &[])
            .await
    }

    async fn capture(
        &self,
        transaction_id: &str,
        body: &CapturePaymentRequest,
    ) -> LinePayResult<CapturePaymentResponse> {
        let path =
            Self::transaction_path("/v4/payments/authorizations", transaction_id, "/capture")?;
        info!("Capturing payment: {}", transaction_id);

        self.transport
            .execute(Method::POST, &path, Some(body), &[])
            .await
    }

    async fn void(&self, transaction_id: &str) -> LinePayResult<VoidPaymentResponse> {
        let path = Self::transaction_path("/v4/payments/authorizations", transaction_id, "/void")?;
        info!("Voiding payment: {}", transaction_id);

        self.transport
            .execute(Method::POST, &path, Some(&json!({})), &[])
            .await
    }

    async fn refund(
        &self,
        transaction_id: &str,
        body: &RefundPaymentRequest,
    ) -> LinePayResult<RefundPaymentResponse> {
        let path = Self::transaction_path("/v4/payments", transaction_id, "/refund")?;
        info!("Refunding payment: {}", transaction_id);

        self.transport
            .execute(Method::POST, &path, Some(body), &[])
            .await
    }

    async fn get_details(
        &self,
        params: &PaymentDetailsParams,
    ) -> LinePayResult<PaymentDetailsResponse> {
        let query = params.to_query_pairs();
        info!("Querying payment details ({} filters)", query.len());

        self.transport
            .execute::<(), _>(Method::GET, DETAILS_PATH, None, &query)
            .await
    }

    async fn check_status(
        &self,
        transaction_id: &str,
    ) -> LinePayResult<CheckPaymentStatusResponse> {
        let path = Self::transaction_path("/v4/payments/requests", transaction_id, "/check")?;
        info!("Checking payment status: {}", transaction_id);

        self.transport
            .execute::<(), _>(Method::GET, &path, None, &[])
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Currency, LinePayError, Package, Product};
    use crate::infrastructure::signature;
    use crate::infrastructure::transport::{HEADER_CHANNEL_ID, HEADER_NONCE, HEADER_SIGNATURE};
    use wiremock::matchers::{body_json, header, header_exists, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const TX_ID: &str = "1234567890123456789";

    fn client(base_url: &str) -> LinePayClient {
        LinePayClient::new(LinePayConfig::new("1234567890", "testsecret").with_base_url(base_url))
            .unwrap()
    }

    fn ok(info: serde_json::Value) -> ResponseTemplate {
        ResponseTemplate::new(200).set_body_json(json!({
            "returnCode": "0000",
            "returnMessage": "Success.",
            "info": info,
        }))
    }

    fn draft(amount: f64) -> PaymentDraft {
        PaymentDraft::new()
            .with_amount(amount)
            .with_currency(Currency::Twd)
            .with_order_id("ORDER_20231201_001")
            .with_package(
                Package::new("PKG_1", 100.0).with_product(Product::new("Test Product", 1, 100.0)),
            )
            .with_redirect_urls("https://example.com/confirm", "https://example.com/cancel")
    }

    #[test]
    fn test_invalid_config_creates_no_client() {
        assert!(matches!(
            LinePayClient::new(LinePayConfig::new("", "secret")),
            Err(LinePayError::ConfigError(_))
        ));
        assert!(matches!(
            LinePayClient::new(LinePayConfig::new("id", "secret").with_timeout_ms(0)),
            Err(LinePayError::ConfigError(_))
        ));
    }

    #[test]
    fn test_transaction_path() {
        assert_eq!(
            LinePayClient::transaction_path("/v4/payments", TX_ID, "/confirm").unwrap(),
            "/v4/payments/1234567890123456789/confirm"
        );
        assert!(LinePayClient::transaction_path("/v4/payments", "../x", "/confirm").is_err());
    }

    #[tokio::test]
    async fn test_send_payment() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v4/payments/request"))
            .and(header(HEADER_CHANNEL_ID, "1234567890"))
            .and(header_exists(HEADER_NONCE))
            .and(header_exists(HEADER_SIGNATURE))
            .and(body_json(json!({
                "amount": 100,
                "currency": "TWD",
                "orderId": "ORDER_20231201_001",
                "packages": [{
                    "id": "PKG_1",
                    "amount": 100,
                    "products": [{ "name": "Test Product", "quantity": 1, "price": 100 }]
                }],
                "redirectUrls": {
                    "confirmUrl": "https://example.com/confirm",
                    "cancelUrl": "https://example.com/cancel"
                }
            })))
            .respond_with(ok(json!({
                "paymentUrl": {
                    "web": "https://sandbox-web-pay.line.me/web/payment/url",
                    "app": "line://pay/payment/url"
                },
                "transactionId": TX_ID,
                "paymentAccessToken": "1234567890"
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = client(&mock_server.uri());
        let response = client.send_payment(draft(100.0)).await.unwrap();

        let info = response.info.unwrap();
        assert_eq!(info.transaction_id, TX_ID);
        assert_eq!(info.payment_url.web, "https://sandbox-web-pay.line.me/web/payment/url");
    }

    #[tokio::test]
    async fn test_invalid_draft_never_reaches_network() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ok(json!({})))
            .expect(0)
            .mount(&mock_server)
            .await;

        let client = client(&mock_server.uri());
        let err = client.send_payment(draft(50.0)).await.unwrap_err();

        assert!(matches!(err, LinePayError::ValidationError { ref field, .. } if field == "packages"));
    }

    #[tokio::test]
    async fn test_malformed_transaction_id_never_reaches_network() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ok(json!({})))
            .expect(0)
            .mount(&mock_server)
            .await;

        let client = client(&mock_server.uri());
        let body = ConfirmPaymentRequest {
            amount: 100.0,
            currency: Currency::Twd,
        };

        for bad in ["12345", "123456789012345678a", "12345678901234567890"] {
            match client.confirm(bad, &body).await {
                Err(LinePayError::InvalidTransactionId(value)) => assert_eq!(value, bad),
                other => panic!("expected format error, got {other:?}"),
            }
        }
        assert!(client.void("12345").await.is_err());
        assert!(client.check_status("12345").await.is_err());
    }

    #[tokio::test]
    async fn test_confirm() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path(format!("/v4/payments/{}/confirm", TX_ID)))
            .and(body_json(json!({ "amount": 100, "currency": "TWD" })))
            .respond_with(ok(json!({
                "orderId": "ORDER_20231201_001",
                "transactionId": TX_ID,
                "payInfo": [{ "method": "BALANCE", "amount": 100 }],
                "packages": [{
                    "id": "PKG_1",
                    "amount": 100,
                    "userFeeAmount": 5,
                    "products": [{ "name": "Test Product", "quantity": 1, "price": 100 }]
                }]
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = client(&mock_server.uri());
        let response = client
            .confirm(
                TX_ID,
                &ConfirmPaymentRequest {
                    amount: 100.0,
                    currency: Currency::Twd,
                },
            )
            .await
            .unwrap();

        let info = response.info.unwrap();
        assert_eq!(info.order_id, "ORDER_20231201_001");
        assert_eq!(info.pay_info[0].method, "BALANCE");
        let packages = info.packages.unwrap();
        assert_eq!(packages[0].user_fee_amount, Some(5.0));
        assert_eq!(packages[0].products[0].price, 100.0);
    }

    #[tokio::test]
    async fn test_capture_and_void_paths() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path(format!("/v4/payments/authorizations/{}/capture", TX_ID)))
            .respond_with(ok(json!({ "orderId": "O1", "transactionId": TX_ID, "payInfo": [] })))
            .expect(1)
            .mount(&mock_server)
            .await;
        Mock::given(method("POST"))
            .and(path(format!("/v4/payments/authorizations/{}/void", TX_ID)))
            .and(body_json(json!({})))
            .respond_with(ok(json!({})))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = client(&mock_server.uri());
        client
            .capture(
                TX_ID,
                &CapturePaymentRequest {
                    amount: 100.0,
                    currency: Currency::Twd,
                },
            )
            .await
            .unwrap();
        client.void(TX_ID).await.unwrap();
    }

    #[tokio::test]
    async fn test_refund() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path(format!("/v4/payments/{}/refund", TX_ID)))
            .and(body_json(json!({ "refundAmount": 30 })))
            .respond_with(ok(json!({
                "refundTransactionId": "2023120100000000002",
                "refundDate": "2023-12-01T10:00:00Z"
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = client(&mock_server.uri());
        let response = client
            .refund(
                TX_ID,
                &RefundPaymentRequest {
                    refund_amount: Some(30.0),
                },
            )
            .await
            .unwrap();

        assert_eq!(
            response.info.unwrap().refund_transaction_id,
            "2023120100000000002"
        );
    }

    #[tokio::test]
    async fn test_get_details_query() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v4/payments/requests"))
            .and(query_param("transactionId", format!("{},{}", TX_ID, TX_ID)))
            .and(query_param("orderId", "O1"))
            .respond_with(ok(json!([{
                "transactionId": TX_ID,
                "orderId": "O1",
                "currency": "TWD",
                "amount": 100,
                "payStatus": "CAPTURE"
            }])))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = client(&mock_server.uri());
        let response = client
            .get_details(&PaymentDetailsParams {
                fields: None,
                transaction_id: Some(vec![TX_ID.to_string(), TX_ID.to_string()]),
                order_id: Some(vec!["O1".to_string()]),
            })
            .await
            .unwrap();

        let details = response.info.unwrap();
        assert_eq!(details.len(), 1);
        assert_eq!(details[0].pay_status, "CAPTURE");

        let requests = mock_server.received_requests().await.unwrap();
        assert!(requests[0].url.query().is_some_and(|q| !q.contains("fields")));
    }

    #[tokio::test]
    async fn test_check_status_business_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(format!("/v4/payments/requests/{}/check", TX_ID)))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "returnCode": "1150",
                "returnMessage": "Transaction not found"
            })))
            .mount(&mock_server)
            .await;

        let client = client(&mock_server.uri());
        let err = client.check_status(TX_ID).await.unwrap_err();

        assert!(matches!(err, LinePayError::BusinessError { .. }));
        assert_eq!(err.return_code(), Some("1150"));
        assert!(err.is_auth_error());
    }

    #[tokio::test]
    async fn test_http_error_end_to_end() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path(format!("/v4/payments/{}/refund", TX_ID)))
            .respond_with(ResponseTemplate::new(500).set_body_json(json!({
                "returnCode": "9000",
                "returnMessage": "Internal error"
            })))
            .mount(&mock_server)
            .await;
        Mock::given(method("POST"))
            .and(path(format!("/v4/payments/authorizations/{}/void", TX_ID)))
            .respond_with(ResponseTemplate::new(503).set_body_json(json!({})))
            .mount(&mock_server)
            .await;

        let client = client(&mock_server.uri());
        let err = client
            .refund(TX_ID, &RefundPaymentRequest::default())
            .await
            .unwrap_err();

        assert!(matches!(err, LinePayError::HttpError { .. }));
        assert_eq!(err.return_code(), Some("9000"));
        assert_eq!(err.return_message(), Some("Internal error"));
        assert_eq!(err.http_status(), Some(500));
        assert!(err.is_internal_error());

        let err = client.void(TX_ID).await.unwrap_err();
        assert!(matches!(err, LinePayError::HttpError { .. }));
        assert_eq!(err.return_code(), Some("HTTP_ERROR"));
        assert_eq!(err.return_message(), Some("Service Unavailable"));
        assert_eq!(err.raw_response(), Some("{}"));
    }

    #[tokio::test]
    async fn test_non_json_body_is_parse_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(format!("/v4/payments/requests/{}/check", TX_ID)))
            .respond_with(ResponseTemplate::new(400).set_body_string("Bad Request"))
            .mount(&mock_server)
            .await;

        let client = client(&mock_server.uri());
        let err = client.check_status(TX_ID).await.unwrap_err();

        match &err {
            LinePayError::ParseError {
                http_status,
                raw_response,
            } => {
                assert_eq!(*http_status, 400);
                assert_eq!(raw_response, "Bad Request");
            }
            other => panic!("expected parse error, got {other:?}"),
        }
        assert_eq!(err.return_code(), Some("PARSE_ERROR"));
    }

    #[test]
    fn test_verify_signature_with_channel_secret() {
        let client = client("http://127.0.0.1:1");
        let signature = signature::sign("testsecret", "/callback", "{}", "n1", "");
        let data = "testsecret/callback{}n1";

        assert!(client.verify_signature(data, &signature));
        assert!(!client.verify_signature(data, "forged"));
    }
}

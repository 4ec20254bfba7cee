use crate::domain::entities::{Package, PaymentOptions, PaymentRequestBody, RedirectUrls};
use crate::domain::errors::{LinePayError, LinePayResult};
use crate::domain::value_objects::Currency;

/// 金额比较容差，用于吸收浮点运算误差（不是业务舍入规则）
pub const AMOUNT_TOLERANCE: f64 = 0.01;

// 0.01 本身无法精确表示，差值恰好为 0.01 时需要这点余量
const TOLERANCE_SLACK: f64 = 1e-9;

fn amounts_match(a: f64, b: f64) -> bool {
    (a - b).abs() <= AMOUNT_TOLERANCE + TOLERANCE_SLACK
}

/// 支付请求草稿
///
/// 通过一系列 `with_*` 转换逐步构建，验证通过后才能转换为
/// [`PaymentRequestBody`]。
///
/// ```
/// use linepay_rs::domain::{Currency, Package, PaymentDraft, Product};
///
/// let body = PaymentDraft::new()
///     .with_amount(100.0)
///     .with_currency(Currency::Twd)
///     .with_order_id("ORDER_001")
///     .with_package(Package::new("PKG_1", 100.0).with_product(Product::new("Item", 1, 100.0)))
///     .with_redirect_urls("https://example.com/confirm", "https://example.com/cancel")
///     .into_body()
///     .unwrap();
///
/// assert_eq!(body.amount(), 100.0);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PaymentDraft {
    amount: Option<f64>,
    currency: Option<Currency>,
    order_id: Option<String>,
    packages: Vec<Package>,
    redirect_urls: Option<RedirectUrls>,
    options: Option<PaymentOptions>,
}

impl PaymentDraft {
    pub fn new() -> Self {
        Self::default()
    }

    /// 设置总金额，必须等于所有包裹金额之和
    pub fn with_amount(mut self, amount: f64) -> Self {
        self.amount = Some(amount);
        self
    }

    pub fn with_currency(mut self, currency: Currency) -> Self {
        self.currency = Some(currency);
        self
    }

    /// 商户订单号（唯一）
    pub fn with_order_id(mut self, order_id: impl Into<String>) -> Self {
        self.order_id = Some(order_id.into());
        self
    }

    /// 追加包裹，保持添加顺序
    pub fn with_package(mut self, package: Package) -> Self {
        self.packages.push(package);
        self
    }

    pub fn with_redirect_urls(
        mut self,
        confirm_url: impl Into<String>,
        cancel_url: impl Into<String>,
    ) -> Self {
        self.redirect_urls = Some(RedirectUrls::new(confirm_url, cancel_url));
        self
    }

    pub fn with_redirect(mut self, redirect_urls: RedirectUrls) -> Self {
        self.redirect_urls = Some(redirect_urls);
        self
    }

    pub fn with_options(mut self, options: PaymentOptions) -> Self {
        self.options = Some(options);
        self
    }

    pub fn packages(&self) -> &[Package] {
        &self.packages
    }

    /// 验证草稿，遇到第一个错误立即返回
    pub fn validate(&self) -> LinePayResult<()> {
        // 1. 基础字段
        let amount = match self.amount {
            Some(amount) if amount.is_finite() && amount >= 0.0 => amount,
            _ => {
                return Err(LinePayError::validation(
                    "amount",
                    "Amount is required and must be non-negative",
                ));
            }
        };

        if self.currency.is_none() {
            return Err(LinePayError::validation("currency", "Currency is required"));
        }

        if self.order_id.as_deref().is_none_or(str::is_empty) {
            return Err(LinePayError::validation("orderId", "OrderId is required"));
        }

        if self.packages.is_empty() {
            return Err(LinePayError::validation(
                "packages",
                "At least one package is required",
            ));
        }

        if self.redirect_urls.is_none() {
            return Err(LinePayError::validation(
                "redirectUrls",
                "Redirect URLs are required",
            ));
        }

        // 2. 包裹金额之和必须等于总金额
        let packages_total: f64 = self.packages.iter().map(|pkg| pkg.amount).sum();
        if !amounts_match(packages_total, amount) {
            return Err(LinePayError::validation(
                "packages",
                format!(
                    "Sum of package amounts ({}) does not match total amount ({})",
                    packages_total, amount
                ),
            ));
        }

        // 3. 每个包裹内商品小计之和必须等于包裹金额
        for (index, pkg) in self.packages.iter().enumerate() {
            if pkg.amount.is_nan() || pkg.amount < 0.0 {
                return Err(LinePayError::validation(
                    format!("packages[{}].amount", index),
                    "Package amount must be non-negative",
                ));
            }

            let products_total = pkg.products_total();
            if !amounts_match(products_total, pkg.amount) {
                return Err(LinePayError::validation(
                    format!("packages[{}].products", index),
                    format!(
                        "Sum of product amounts ({}) in package index {} does not match package amount ({})",
                        products_total, index, pkg.amount
                    ),
                ));
            }
        }

        Ok(())
    }

    /// 验证并冻结为请求体
    pub fn into_body(self) -> LinePayResult<PaymentRequestBody> {
        self.validate()?;

        match self {
            PaymentDraft {
                amount: Some(amount),
                currency: Some(currency),
                order_id: Some(order_id),
                packages,
                redirect_urls: Some(redirect_urls),
                options,
            } => Ok(PaymentRequestBody {
                amount,
                currency,
                order_id,
                packages,
                redirect_urls,
                options,
            }),
            _ => Err(LinePayError::validation(
                "draft",
                "Validation failed unexpectedly",
            )),
        }
    }
}

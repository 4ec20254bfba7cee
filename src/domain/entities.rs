use crate::domain::value_objects::{ConfirmUrlType, Currency, PayType};
use serde::{Deserialize, Serialize};

/// 商品
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    pub name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,

    /// 数量
    pub quantity: u32,

    /// 单价
    #[serde(with = "crate::domain::amount")]
    pub price: f64,

    /// 原价（仅用于展示）
    #[serde(
        default,
        with = "crate::domain::amount::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub original_price: Option<f64>,
}

impl Product {
    pub fn new(name: impl Into<String>, quantity: u32, price: f64) -> Self {
        Self {
            id: None,
            name: name.into(),
            image_url: None,
            quantity,
            price,
            original_price: None,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_image_url(mut self, url: impl Into<String>) -> Self {
        self.image_url = Some(url.into());
        self
    }

    pub fn with_original_price(mut self, price: f64) -> Self {
        self.original_price = Some(price);
        self
    }

    /// 小计 = 数量 × 单价
    pub fn subtotal(&self) -> f64 {
        f64::from(self.quantity) * self.price
    }
}

/// 包裹：一组商品，金额必须等于商品小计之和
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Package {
    pub id: String,

    #[serde(with = "crate::domain::amount")]
    pub amount: f64,

    /// 用户手续费
    #[serde(
        default,
        with = "crate::domain::amount::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub user_fee: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    pub products: Vec<Product>,
}

impl Package {
    pub fn new(id: impl Into<String>, amount: f64) -> Self {
        Self {
            id: id.into(),
            amount,
            user_fee: None,
            name: None,
            products: Vec::new(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_user_fee(mut self, fee: f64) -> Self {
        self.user_fee = Some(fee);
        self
    }

    pub fn with_product(mut self, product: Product) -> Self {
        self.products.push(product);
        self
    }

    pub fn products_total(&self) -> f64 {
        self.products.iter().map(Product::subtotal).sum()
    }
}

/// 跳转URL
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RedirectUrls {
    /// 用户授权后跳转
    pub confirm_url: String,

    /// 用户取消后跳转
    pub cancel_url: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub confirm_url_type: Option<ConfirmUrlType>,
}

impl RedirectUrls {
    pub fn new(confirm_url: impl Into<String>, cancel_url: impl Into<String>) -> Self {
        Self {
            confirm_url: confirm_url.into(),
            cancel_url: cancel_url.into(),
            confirm_url_type: None,
        }
    }
}

/// 扩展选项
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment: Option<PaymentSettings>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub display: Option<DisplayOptions>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub shipping: Option<ShippingOptions>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub extra: Option<ExtraOptions>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentSettings {
    /// 是否自动请款，默认 true
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capture: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub pay_type: Option<PayType>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayOptions {
    /// 例如 `en`、`zh-Hant`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub check_confirm_url_browser: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingOptions {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub shipping_type: Option<String>,

    #[serde(
        default,
        with = "crate::domain::amount::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub fee_amount: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub fee_inquiry_url: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub fee_inquiry_type: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<ShippingAddress>,
}

/// 收货地址
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingAddress {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub optional: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub recipient: Option<Recipient>,
}

/// 收件人
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipient {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name_optional: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name_optional: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_no: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtraOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub branch_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub branch_id: Option<String>,
}

/// `POST /v4/payments/request` 请求体
///
/// 只能通过 [`PaymentDraft::into_body`](crate::domain::PaymentDraft::into_body)
/// 在验证通过后构造。
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRequestBody {
    #[serde(with = "crate::domain::amount")]
    pub(crate) amount: f64,
    pub(crate) currency: Currency,
    pub(crate) order_id: String,
    pub(crate) packages: Vec<Package>,
    pub(crate) redirect_urls: RedirectUrls,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) options: Option<PaymentOptions>,
}

impl PaymentRequestBody {
    pub fn amount(&self) -> f64 {
        self.amount
    }

    pub fn currency(&self) -> Currency {
        self.currency
    }

    pub fn order_id(&self) -> &str {
        &self.order_id
    }

    pub fn packages(&self) -> &[Package] {
        &self.packages
    }

    pub fn redirect_urls(&self) -> &RedirectUrls {
        &self.redirect_urls
    }

    pub fn options(&self) -> Option<&PaymentOptions> {
        self.options.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_package_products_total() {
        let package = Package::new("PKG_1", 250.0)
            .with_product(Product::new("A", 2, 100.0))
            .with_product(Product::new("B", 1, 50.0));

        assert_eq!(package.products_total(), 250.0);
    }

    #[test]
    fn test_optional_fields_omitted() {
        let package = Package::new("PKG_1", 100.0).with_product(Product::new("A", 1, 100.0));
        let json = serde_json::to_value(&package).unwrap();

        assert!(json.get("userFee").is_none());
        assert!(json.get("name").is_none());
        assert!(json["products"][0].get("imageUrl").is_none());
    }

    #[test]
    fn test_options_camel_case() {
        let options = PaymentOptions {
            payment: Some(PaymentSettings {
                capture: Some(false),
                pay_type: Some(PayType::Normal),
            }),
            shipping: Some(ShippingOptions {
                shipping_type: Some("NO_SHIPPING".to_string()),
                ..Default::default()
            }),
            ..Default::default()
        };
        let json = serde_json::to_value(&options).unwrap();

        assert_eq!(json["payment"]["payType"], "NORMAL");
        assert_eq!(json["payment"]["capture"], false);
        assert_eq!(json["shipping"]["type"], "NO_SHIPPING");
        assert!(json.get("display").is_none());
    }
}

pub mod amount;
pub mod entities;
pub mod errors;
pub mod payment_draft;
pub mod value_objects;

pub use entities::{
    DisplayOptions, ExtraOptions, Package, PaymentOptions, PaymentRequestBody, PaymentSettings,
    Product, Recipient, RedirectUrls, ShippingAddress, ShippingOptions,
};
pub use errors::{LinePayError, LinePayErrorRecord, LinePayResult};
pub use payment_draft::{AMOUNT_TOLERANCE, PaymentDraft};
pub use value_objects::{ConfirmUrlType, Currency, Environment, PayType, TransactionId};

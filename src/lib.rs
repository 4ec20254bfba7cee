//! LINE Pay V4 签名请求客户端
//!
//! - `domain`: 付款草稿、验证规则、错误类型
//! - `ports`: 七个远端操作的端口接口与请求/响应类型
//! - `infrastructure`: 配置、签名、传输层与客户端实现
//! - `application`: confirmUrl 回调参数解析

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod ports;

pub use application::ConfirmCallback;
pub use domain::{Currency, Environment, LinePayError, LinePayResult, Package, PaymentDraft, Product};
pub use infrastructure::{LinePayClient, LinePayConfig};
pub use ports::LinePayPort;

pub mod line_pay_config;

pub use line_pay_config::{DEFAULT_TIMEOUT_MS, LinePayConfig};

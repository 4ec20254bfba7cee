pub mod line_pay_adapter;

pub use line_pay_adapter::LinePayClient;

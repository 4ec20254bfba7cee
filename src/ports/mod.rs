pub mod line_pay_port;

pub use line_pay_port::*;

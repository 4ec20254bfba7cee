pub mod adapters;
pub mod config;
pub mod signature;
pub mod transport;

pub use adapters::LinePayClient;
pub use config::LinePayConfig;
pub use signature::{sign, verify_signature};
pub use transport::Transport;

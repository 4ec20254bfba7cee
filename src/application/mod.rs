pub mod callback;

pub use callback::ConfirmCallback;

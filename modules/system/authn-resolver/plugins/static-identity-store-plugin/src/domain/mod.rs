pub mod client;
pub mod service;

pub use service::{Service, password_sha256_hex};

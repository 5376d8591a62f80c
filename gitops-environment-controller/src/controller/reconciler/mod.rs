pub mod context;
pub mod desired;
pub mod environment;
pub mod error;

//! Adapters - Concrete implementations of ports.

#[cfg(feature = "aws")]
pub mod aws;

pub mod http;
pub mod local;

#[cfg(feature = "postgres")]
pub mod postgres;

//! HTTP inbound adapter exposing REST endpoints.

pub mod auth;
pub mod cache_control;
pub mod error;
pub mod health;
pub mod session;
pub mod session_config;
pub mod staff;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod vehicles;

pub use error::ApiResult;

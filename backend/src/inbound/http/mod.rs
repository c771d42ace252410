//! HTTP inbound adapter exposing the review REST endpoints.

pub mod cache_control;
pub mod error;
pub mod health;
pub mod identity;
pub mod images;
pub mod reviews;
pub mod schemas;
pub mod state;
pub mod validation;

pub use error::ApiResult;

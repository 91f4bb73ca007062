//! # Blog Core
//!
//! The domain layer of the blog service.
//! This crate contains the post resource rules (validation, ownership and the
//! five post operations) with zero infrastructure dependencies.

pub mod domain;
pub mod error;
pub mod policy;
pub mod ports;
pub mod service;

pub use error::DomainError;
pub use service::PostService;

//! # Blog Core
//!
//! The domain layer of the blog persistence stack.
//! Entities, validation rules, repository ports and the services that drive them.
//! Nothing in here knows which database sits behind the ports.

pub mod domain;
pub mod error;
pub mod ports;
pub mod services;

pub use error::{DomainError, RepoError};

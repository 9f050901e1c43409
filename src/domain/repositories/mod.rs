//! Collaborator trait definitions for the domain layer.
//!
//! These traits describe what the engine consumes from the outside world.
//! Concrete implementations live in `crate::infrastructure`; mock
//! implementations are auto-generated via `mockall` for testing.
//!
//! # Available Repositories
//!
//! - [`LogoRepository`] - Logo asset resolution

pub mod logo_repository;

pub use logo_repository::{LogoError, LogoRepository};

#[cfg(test)]
pub use logo_repository::MockLogoRepository;

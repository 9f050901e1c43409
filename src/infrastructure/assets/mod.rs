//! Logo asset resolution.

mod fs_logo_repository;

pub use fs_logo_repository::FsLogoRepository;

//! Common utilities and shared types for the Wilaiety registry.
//!
//! This crate provides foundational components used across all wilaiety crates:
//!
//! - **Configuration**: Application settings via [`Config`]
//! - **Error handling**: Unified error types via [`AppError`] and [`AppResult`]
//! - **GPS**: `"lat,lng"` coordinate strings via [`parse_gps`]
//! - **I18n**: French/Arabic text resolution via [`Lang`] and [`t`]
//! - **ID Generation**: UUID-based identifiers via [`IdGenerator`]
//! - **Storage**: Bucketed file storage (local filesystem)
//!
//! # Example
//!
//! ```no_run
//! use wilaiety_common::{Config, IdGenerator, AppResult};
//!
//! fn example() -> AppResult<()> {
//!     let config = Config::load()?;
//!     let id_gen = IdGenerator::new();
//!     let id = id_gen.generate();
//!     println!("Generated ID: {}", id);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod gps;
pub mod i18n;
pub mod id;
pub mod storage;

pub use config::Config;
pub use error::{AppError, AppResult};
pub use gps::parse_gps;
pub use i18n::{Bilingual, Direction, Lang, t};
pub use id::IdGenerator;
pub use storage::{Bucket, LocalStorage, StorageBackend, UploadedFile, storage_key};

//! Common utilities and shared types for voyage.
//!
//! This crate provides foundational components used across all voyage crates:
//!
//! - **Configuration**: Application settings via [`Config`]
//! - **Error handling**: Unified error types via [`AppError`] and [`AppResult`]
//! - **ID Generation**: booking references and transaction ids via [`IdGenerator`]
//!
//! # Example
//!
//! ```no_run
//! use voyage_common::{Config, IdGenerator, AppResult};
//!
//! fn example() -> AppResult<()> {
//!     let config = Config::load()?;
//!     let id_gen = IdGenerator::new();
//!     let reference = id_gen.booking_reference();
//!     println!("{} issued {}", config.server.url, reference);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod id;

pub use config::Config;
pub use error::{AppError, AppResult, FieldErrors};
pub use id::IdGenerator;

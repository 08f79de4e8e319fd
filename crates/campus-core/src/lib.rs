//! # Campus Core
//!
//! Core types shared by every Campus crate.
//!
//! - [`errors`]: Application error type with HTTP response conversion
//! - [`password`]: Salted adaptive password hashing and verification
//!
//! # Example
//!
//! ```ignore
//! use campus_core::errors::AppError;
//! use campus_core::password::{hash_password, verify_password};
//!
//! let hash = hash_password("secure_password")?;
//! assert!(verify_password("secure_password", &hash)?);
//!
//! let error = AppError::bad_request(anyhow::anyhow!("username is required"));
//! ```

pub mod errors;
pub mod password;

// Re-export commonly used types at crate root
pub use errors::AppError;
pub use password::{PasswordError, dummy_hash, hash_password, verify_password};

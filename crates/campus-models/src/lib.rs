//! # Campus Models
//!
//! Domain models shared between the auth core, the storage layer and the
//! HTTP layer.
//!
//! - [`ids`]: Strongly-typed UUID identifiers
//! - [`users`]: User records and the credential view used for login
//! - [`refresh_tokens`]: Stored refresh-token families

pub mod ids;
pub mod refresh_tokens;
pub mod users;

pub use ids::{TokenFamilyId, UserId};
pub use refresh_tokens::RefreshTokenEntry;
pub use users::{NewUser, User, UserCredentials, UserLookup};

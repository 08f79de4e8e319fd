//! # Campus Auth
//!
//! The authentication core of the Campus API.
//!
//! - [`claims`]: Token claims and the access/refresh type tag
//! - [`jwt`]: [`TokenCodec`], which signs and parses tokens
//! - [`ledger`]: The refresh-token ledger contract ([`RefreshTokenLedger`])
//! - [`tokens`]: [`TokenService`], owner of the token-family lifecycle
//! - [`directory`]: The user-storage contract consumed by login and signup
//! - [`service`]: [`AuthService`], which composes all of the above
//! - [`error`]: [`AuthError`] and its HTTP status mapping
//!
//! # Token families
//!
//! Every login or signup creates one *family*: an access token and a refresh
//! token sharing a [`TokenFamilyId`](campus_models::TokenFamilyId), plus one
//! ledger row keyed by that id. A signature proves a token was issued by us;
//! only the ledger row says whether the family is still live. Revoking the
//! row kills both tokens before their natural expiry.
//!
//! ```text
//! Active ──revoke──▶ Revoked   (terminal, stored)
//!    └────TTL──────▶ Expired   (terminal, implicit)
//! ```
//!
//! # Example
//!
//! ```ignore
//! use campus_auth::{AuthService, TokenCodec, TokenService};
//!
//! let codec = TokenCodec::new(&jwt_config);
//! let tokens = TokenService::new(codec, ledger);
//! let auth = AuthService::new(directory, tokens);
//!
//! let (user, pair) = auth.signup("a@b.com", "alice", "secret123", None).await?;
//! let claims = auth.verify(&pair.access_token).await?;
//! assert_eq!(claims.username, "alice");
//! ```

pub mod claims;
pub mod directory;
pub mod error;
pub mod jwt;
pub mod ledger;
#[cfg(any(test, feature = "test-utils"))]
pub mod memory;
pub mod service;
pub mod tokens;

// Re-export commonly used types at crate root
pub use claims::{TokenClaims, TokenType};
pub use directory::{DirectoryError, UserDirectory};
pub use error::AuthError;
pub use jwt::{IssuedToken, TokenCodec};
pub use ledger::{LedgerError, RefreshTokenEntry, RefreshTokenLedger, token_fingerprint};
pub use service::AuthService;
pub use tokens::{TokenPair, TokenService};

/// Boxed error used by storage backends to report failures the core does not
/// need to inspect.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

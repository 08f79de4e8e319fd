//! Request extractors for authenticated routes.
//!
//! - [`auth`]: Bearer header parsing and the [`AuthUser`](auth::AuthUser)
//!   extractor
//!
//! # Authentication Flow
//!
//! 1. Client sends request with `Authorization: Bearer <token>` header
//! 2. `AuthUser` validates the access token and checks its family in the ledger
//! 3. Handler executes with the token claims
//!
//! # Example
//!
//! ```ignore
//! use crate::middleware::auth::AuthUser;
//!
//! async fn get_profile(AuthUser(claims): AuthUser) -> impl IntoResponse {
//!     // claims.sub is the user id
//! }
//! ```

pub mod auth;

use std::sync::Arc;

use sqlx::PgPool;

use campus_auth::{AuthService, TokenCodec, TokenService};
use campus_config::{CorsConfig, JwtConfig};
use campus_db::{PgRefreshTokenLedger, PgUserDirectory};

/// The auth orchestrator as wired for production.
pub type Auth = AuthService<PgUserDirectory, PgRefreshTokenLedger>;

#[derive(Clone, Debug)]
pub struct AppState {
    pub db: PgPool,
    pub auth: Arc<Auth>,
    pub cors_config: CorsConfig,
}

impl AppState {
    pub fn new(db: PgPool, jwt_config: &JwtConfig, cors_config: CorsConfig) -> Self {
        let tokens = TokenService::new(
            TokenCodec::new(jwt_config),
            PgRefreshTokenLedger::new(db.clone()),
        );
        let auth = AuthService::new(PgUserDirectory::new(db.clone()), tokens);

        Self {
            db,
            auth: Arc::new(auth),
            cors_config,
        }
    }
}

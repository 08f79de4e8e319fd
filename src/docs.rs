use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use campus_auth::{TokenClaims, TokenType};
use campus_models::{User, UserId};

use crate::modules::auth::controller::ErrorResponse;
use crate::modules::auth::model::{
    LoginRequest, RefreshTokenRequest, SignupRequest, TokenPairResponse, TokensResponse,
    VerifyTokenRequest,
};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::auth::controller::signup,
        crate::modules::auth::controller::login,
        crate::modules::auth::controller::refresh,
        crate::modules::auth::controller::logout,
        crate::modules::auth::controller::revoke,
        crate::modules::auth::controller::verify,
        crate::modules::users::controller::get_profile,
    ),
    components(
        schemas(
            User,
            UserId,
            SignupRequest,
            LoginRequest,
            RefreshTokenRequest,
            VerifyTokenRequest,
            TokensResponse,
            TokenPairResponse,
            TokenClaims,
            TokenType,
            ErrorResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "Signup, login and token lifecycle"),
        (name = "Users", description = "The authenticated user's account")
    ),
    info(
        title = "Campus API",
        version = "0.1.0",
        description = "School management API. Authentication uses short-lived access tokens and revocable refresh-token families.",
        license(
            name = "MIT"
        )
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            )
        }
    }
}

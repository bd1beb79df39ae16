//! Session tokens.
//!
//! A session token is an HS256-signed JWT carrying the account's email and role. Tokens are not stored as such, but
//! each account remembers the last token it was issued, and only that token is honoured. Logging in again therefore
//! ends every earlier session of the account.
use std::{
    fmt::{Debug, Formatter},
    future::{ready, Ready},
};

use actix_web::{dev::Payload, FromRequest, HttpMessage, HttpRequest};
use chrono::{Duration, Utc};
use depot_engine::{
    db_types::{Role, UserAccount},
    AccountApi,
    AccountManagement,
    AuthApi,
    AuthManagement,
};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use log::*;
use serde::{Deserialize, Serialize};

use crate::{
    config::AuthConfig,
    errors::{AuthError, ServerError},
};

/// How long a session token stays valid, whether or not it is superseded earlier.
pub const SESSION_LIFETIME_HOURS: i64 = 72;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JwtClaims {
    pub email: String,
    pub role: Role,
    pub exp: i64,
    pub iat: i64,
    /// Random per-token value, so two logins within the same second still yield different tokens.
    pub jti: String,
}

impl JwtClaims {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

//-------------------------------------------------  TokenIssuer  ------------------------------------------------------
pub struct TokenIssuer {
    encoding_key: EncodingKey,
    lifetime: Duration,
}

impl Debug for TokenIssuer {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "TokenIssuer (lifetime: {}h)", self.lifetime.num_hours())
    }
}

impl TokenIssuer {
    pub fn new(config: &AuthConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.jwt_secret.reveal().as_bytes());
        Self { encoding_key, lifetime: Duration::hours(SESSION_LIFETIME_HOURS) }
    }

    /// Signs a new token for the given email and role. This method DOES NOT record the token as the account's
    /// current one; see [`SessionManager::start_session`].
    pub fn issue_token(&self, email: &str, role: Role) -> Result<String, AuthError> {
        let now = Utc::now();
        let claims = JwtClaims {
            email: email.to_string(),
            role,
            iat: now.timestamp(),
            exp: (now + self.lifetime).timestamp(),
            jti: format!("{:016x}", rand::random::<u64>()),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AuthError::TokenIssue(e.to_string()))
    }
}

//-------------------------------------------------  Session  ----------------------------------------------------------
/// An authenticated request's account and token claims. The session middleware inserts it into the request
/// extensions, and handlers receive it as an extractor.
#[derive(Debug, Clone)]
pub struct Session {
    pub account: UserAccount,
    pub claims: JwtClaims,
}

impl FromRequest for Session {
    type Error = ServerError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let session = req.extensions().get::<Session>().cloned();
        ready(session.ok_or(ServerError::AuthenticationError(AuthError::MissingCredential)))
    }
}

//-------------------------------------------------  SessionManager  ---------------------------------------------------
pub struct SessionManager<A> {
    issuer: TokenIssuer,
    decoding_key: DecodingKey,
    validation: Validation,
    auth_api: AuthApi<A>,
}

impl<A> Debug for SessionManager<A> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "SessionManager ({:?})", self.issuer)
    }
}

impl<A> SessionManager<A>
where A: AuthManagement
{
    pub fn new(config: &AuthConfig, auth_api: AuthApi<A>) -> Self {
        let decoding_key = DecodingKey::from_secret(config.jwt_secret.reveal().as_bytes());
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_required_spec_claims(&["exp", "iat"]);
        Self { issuer: TokenIssuer::new(config), decoding_key, validation, auth_api }
    }

    pub fn issuer(&self) -> &TokenIssuer {
        &self.issuer
    }

    /// Checks the token's signature and expiry. This says nothing about whether the token is still current.
    pub fn validate_token(&self, token: &str) -> Result<JwtClaims, AuthError> {
        decode::<JwtClaims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| AuthError::InvalidCredential(format!("{:?}", e.kind())))
    }

    /// Resolves a presented token to its account. The token must be correctly signed, unexpired, and the account's
    /// current token.
    pub async fn authenticate(&self, token: &str) -> Result<Session, ServerError> {
        let claims = self.validate_token(token).map_err(|e| {
            debug!("🔑️ Rejected credential. {e}");
            e
        })?;
        let account = self.auth_api.account_for_token(token).await?.ok_or_else(|| {
            debug!("🔑️ Rejected stale credential for {}", claims.email);
            AuthError::StaleCredential
        })?;
        trace!("🔑️ Authenticated {} ({})", account.email, claims.role);
        Ok(Session { account, claims })
    }

    /// As [`Self::authenticate`], and additionally requires the token to carry the admin role.
    pub async fn authenticate_admin(&self, token: &str) -> Result<Session, ServerError> {
        let session = self.authenticate(token).await?;
        if session.claims.is_admin() {
            Ok(session)
        } else {
            debug!("🔑️ {} is not an admin", session.claims.email);
            Err(AuthError::Forbidden("Admin role required".into()).into())
        }
    }

    /// Verifies the credentials and starts a new session for the account, ending any earlier one.
    pub async fn login<B: AccountManagement>(
        &self,
        accounts: &AccountApi<B>,
        email: &str,
        password: &str,
    ) -> Result<String, ServerError> {
        let account = accounts.verify_credentials(email, password).await?;
        self.start_session(&account).await
    }

    /// Issues a token with the account's stored role and records it as the account's only current token.
    pub async fn start_session(&self, account: &UserAccount) -> Result<String, ServerError> {
        let token = self.issuer.issue_token(&account.email, account.role)?;
        self.auth_api.record_session_token(account.id, &token).await?;
        info!("🔑️ {} logged in with the {} role", account.email, account.role);
        Ok(token)
    }
}

use actix_web::{
    error::ResponseError,
    http::{header::ContentType, StatusCode},
    HttpResponse,
};
use depot_engine::{AccountApiError, AuthApiError, CheckoutError, InventoryApiError, OrderApiError};
use log::*;
use thiserror::Error;

use crate::data_objects::JsonResponse;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Could not initialize server. {0}")]
    InitializeError(String),
    #[error("An error occurred on the backend of the server. {0}")]
    BackendError(String),
    #[error("Could not read request body: {0}")]
    InvalidRequestBody(String),
    #[error("Could not read request path: {0}")]
    InvalidRequestPath(String),
    #[error("An I/O error happened in the server. {0}")]
    IOError(#[from] std::io::Error),
    #[error("Invalid server configuration. {0}")]
    ConfigurationError(String),
    #[error("UnspecifiedError. {0}")]
    Unspecified(String),
    #[error("Authentication Error. {0}")]
    AuthenticationError(#[from] AuthError),
    #[error("The data was not found. {0}")]
    NoRecordFound(String),
    #[error("{0}")]
    CheckoutRejected(String),
    #[error("{0}")]
    AccountRejected(String),
    #[error("{0}")]
    InvalidInput(String),
    #[error("The store is busy. {0}")]
    ServiceUnavailable(String),
}

impl ServerError {
    /// The message sent to clients. Internal failures are reported generically; the details only go to the log.
    pub fn public_message(&self) -> String {
        match self {
            Self::AuthenticationError(e) => e.public_message().to_string(),
            Self::ServiceUnavailable(_) => "The store is busy. Please retry.".to_string(),
            e if e.status_code() == StatusCode::INTERNAL_SERVER_ERROR => "Internal server error".to_string(),
            e => e.to_string(),
        }
    }
}

impl ResponseError for ServerError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequestBody(_) => StatusCode::BAD_REQUEST,
            Self::InvalidRequestPath(_) => StatusCode::BAD_REQUEST,
            Self::CheckoutRejected(_) => StatusCode::BAD_REQUEST,
            Self::AccountRejected(_) => StatusCode::BAD_REQUEST,
            Self::InvalidInput(_) => StatusCode::BAD_REQUEST,
            Self::AuthenticationError(e) => match e {
                AuthError::MissingCredential => StatusCode::UNAUTHORIZED,
                AuthError::InvalidCredential(_) => StatusCode::UNAUTHORIZED,
                AuthError::StaleCredential => StatusCode::UNAUTHORIZED,
                AuthError::InvalidLogin => StatusCode::UNAUTHORIZED,
                AuthError::Forbidden(_) => StatusCode::FORBIDDEN,
                AuthError::TokenIssue(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::NoRecordFound(_) => StatusCode::NOT_FOUND,
            Self::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::InitializeError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::BackendError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::IOError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::ConfigurationError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Unspecified(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            error!("💻️ {self}");
        }
        HttpResponse::build(status)
            .insert_header(ContentType::json())
            .json(JsonResponse::new(status, self.public_message()))
    }
}

#[derive(Debug, Clone, Error)]
pub enum AuthError {
    #[error("No credential was provided.")]
    MissingCredential,
    #[error("The credential is invalid. {0}")]
    InvalidCredential(String),
    #[error("The credential has been superseded by a newer login.")]
    StaleCredential,
    #[error("Invalid email or password.")]
    InvalidLogin,
    #[error("Insufficient Permissions. {0}")]
    Forbidden(String),
    #[error("Could not issue a session token. {0}")]
    TokenIssue(String),
}

impl AuthError {
    /// Missing, invalid and stale credentials are deliberately indistinguishable to clients.
    pub fn public_message(&self) -> &'static str {
        match self {
            AuthError::MissingCredential | AuthError::InvalidCredential(_) | AuthError::StaleCredential => {
                "Unauthorized"
            },
            AuthError::InvalidLogin => "Invalid email or password",
            AuthError::Forbidden(_) => "Forbidden",
            AuthError::TokenIssue(_) => "Internal server error",
        }
    }
}

impl From<AuthApiError> for ServerError {
    fn from(e: AuthApiError) -> Self {
        match e {
            AuthApiError::StoreTimeout => Self::ServiceUnavailable(e.to_string()),
            AuthApiError::AccountNotFound(_) => Self::NoRecordFound(e.to_string()),
            AuthApiError::DatabaseError(e) => Self::BackendError(format!("Database error: {e}")),
        }
    }
}

impl From<AccountApiError> for ServerError {
    fn from(e: AccountApiError) -> Self {
        match e {
            AccountApiError::InvalidCredentials => Self::AuthenticationError(AuthError::InvalidLogin),
            AccountApiError::AccountAlreadyExists | AccountApiError::ValidationError(_) => {
                Self::AccountRejected(e.to_string())
            },
            AccountApiError::AccountNotFound(_) => Self::NoRecordFound(e.to_string()),
            AccountApiError::StoreTimeout => Self::ServiceUnavailable(e.to_string()),
            AccountApiError::PasswordHashError(_) => Self::BackendError(e.to_string()),
            AccountApiError::DatabaseError(e) => Self::BackendError(format!("Database error: {e}")),
        }
    }
}

impl From<InventoryApiError> for ServerError {
    fn from(e: InventoryApiError) -> Self {
        match e {
            InventoryApiError::StoreTimeout => Self::ServiceUnavailable(e.to_string()),
            InventoryApiError::InvalidOffer(_) => Self::InvalidInput(e.to_string()),
            InventoryApiError::DatabaseError(e) => Self::BackendError(format!("Database error: {e}")),
        }
    }
}

impl From<CheckoutError> for ServerError {
    fn from(e: CheckoutError) -> Self {
        match e {
            CheckoutError::StoreTimeout => Self::ServiceUnavailable(e.to_string()),
            CheckoutError::DatabaseError(e) => Self::BackendError(format!("Database error: {e}")),
            e => Self::CheckoutRejected(e.to_string()),
        }
    }
}

impl From<OrderApiError> for ServerError {
    fn from(e: OrderApiError) -> Self {
        match e {
            OrderApiError::OrderNotFound(_) => Self::NoRecordFound(e.to_string()),
            OrderApiError::InvalidStatus(_) => Self::InvalidInput(e.to_string()),
            OrderApiError::StoreTimeout => Self::ServiceUnavailable(e.to_string()),
            OrderApiError::DatabaseError(e) => Self::BackendError(format!("Database error: {e}")),
        }
    }
}

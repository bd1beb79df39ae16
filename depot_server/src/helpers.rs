use actix_web::{error::JsonPayloadError, web, HttpRequest, HttpResponse};
use log::debug;

use crate::errors::ServerError;

/// Malformed JSON bodies are reported with the same `{code, message}` body as every other error.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err: JsonPayloadError, req: &HttpRequest| {
        debug!("💻️ Malformed request body for {}. {err}", req.path());
        ServerError::InvalidRequestBody(err.to_string()).into()
    })
}

/// Non-numeric ids in paths such as `/auth/orders/{id}` are bad requests.
pub fn path_config() -> web::PathConfig {
    web::PathConfig::default().error_handler(|err, req| {
        debug!("💻️ Malformed request path {}. {err}", req.path());
        ServerError::InvalidRequestPath(err.to_string()).into()
    })
}

/// Fallback for requests that match no route.
pub async fn not_found(req: HttpRequest) -> Result<HttpResponse, ServerError> {
    Err(ServerError::NoRecordFound(format!("No route for {} {}", req.method(), req.path())))
}

//! Session middleware for the depot server.
//!
//! Reads the credential from the `Authorization` header, resolves it through the [`SessionManager`] registered as app
//! data, and stores the resulting [`Session`] in the request extensions. Requests without a current credential are
//! answered with 401 before they reach the handler.
//!
//! The header value is the token itself. A `Bearer ` prefix is not stripped, so such a header fails validation.

use std::{marker::PhantomData, pin::Pin, rc::Rc};

use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::header::AUTHORIZATION,
    web,
    Error,
    HttpMessage,
};
use depot_engine::AuthManagement;
use futures::{
    future::{ok, Ready},
    Future,
};
use log::*;

use crate::{
    auth::SessionManager,
    errors::{AuthError, ServerError},
};

/// Extracts the presented credential. A missing or empty header is reported before any parsing happens.
pub fn credential_from_request(req: &ServiceRequest) -> Result<String, AuthError> {
    let header = req.headers().get(AUTHORIZATION).ok_or(AuthError::MissingCredential)?;
    let token = header.to_str().map_err(|e| AuthError::InvalidCredential(e.to_string()))?.trim();
    if token.is_empty() {
        return Err(AuthError::MissingCredential);
    }
    Ok(token.to_string())
}

pub struct SessionMiddlewareFactory<A> {
    _backend: PhantomData<A>,
}

impl<A> SessionMiddlewareFactory<A> {
    pub fn new() -> Self {
        Self { _backend: PhantomData }
    }
}

impl<A> Default for SessionMiddlewareFactory<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S, B, A> Transform<S, ServiceRequest> for SessionMiddlewareFactory<A>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
    A: AuthManagement + 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Transform = SessionMiddlewareService<S, A>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ok(SessionMiddlewareService { service: Rc::new(service), _backend: PhantomData })
    }
}

pub struct SessionMiddlewareService<S, A> {
    service: Rc<S>,
    _backend: PhantomData<A>,
}

impl<S, B, A> Service<ServiceRequest> for SessionMiddlewareService<S, A>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
    A: AuthManagement + 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        Box::pin(async move {
            let token = credential_from_request(&req).map_err(ServerError::from)?;
            let sessions = req.app_data::<web::Data<SessionManager<A>>>().cloned().ok_or_else(|| {
                error!("💻️ No session manager has been registered. Sessions cannot be checked.");
                ServerError::InitializeError("Session manager is not configured".into())
            })?;
            let session = sessions.authenticate(&token).await?;
            req.extensions_mut().insert(session);
            service.call(req).await
        })
    }
}

use actix_web::{
    body::to_bytes,
    http::StatusCode,
    test,
    test::TestRequest,
    web,
    App,
    ResponseError,
};
use chrono::{TimeZone, Utc};
use depot_engine::{
    db_types::{Role, UserAccount},
    AccountApi,
    AuthApi,
    CheckoutApi,
    InventoryApi,
    OrderLifecycleApi,
};
use log::debug;

use super::mocks::MockBackend;
use crate::{
    auth::{SessionManager, TokenIssuer},
    config::AuthConfig,
    server::register_routes,
};

// DO NOT re-use this secret anywhere.
const TEST_JWT_SECRET: &str = "depot-endpoint-tests-0f9c2a7e5b1d4c38a6e2";

pub fn auth_config() -> AuthConfig {
    AuthConfig::new(TEST_JWT_SECRET).expect("Test secret is long enough")
}

pub fn issue_token(email: &str, role: Role) -> String {
    TokenIssuer::new(&auth_config()).issue_token(email, role).expect("Failed to sign token")
}

pub fn account(id: i64, email: &str, role: Role) -> UserAccount {
    let timestamp = Utc.with_ymd_and_hms(2024, 10, 16, 9, 0, 0).unwrap();
    UserAccount {
        id,
        username: email.split('@').next().unwrap_or_default().to_string(),
        email: email.to_string(),
        password_hash: "not-a-real-hash".to_string(),
        current_token: None,
        role,
        created_at: timestamp,
        updated_at: timestamp,
    }
}

/// One mock per API, so that each test only sets expectations on the backend that the route under test touches.
#[derive(Default)]
pub struct Backends {
    pub accounts: MockBackend,
    pub auth: MockBackend,
    pub inventory: MockBackend,
    pub checkout: MockBackend,
    pub orders: MockBackend,
}

impl Backends {
    /// Honours `token` as the current token of `account`. Any other token is stale.
    pub fn with_session(mut self, token: &str, account: UserAccount) -> Self {
        let token = token.to_string();
        self.auth.expect_fetch_account_by_token().returning(move |t| Ok((t == token).then(|| account.clone())));
        self
    }

    /// Issues a token for a fresh account with the given role and makes it the current one.
    pub fn logged_in(self, email: &str, role: Role) -> (Self, String) {
        let token = issue_token(email, role);
        let backends = self.with_session(&token, account(1, email, role));
        (backends, token)
    }
}

/// Runs a single request through an app with every route registered over the mocks.
pub async fn send(backends: Backends, req: TestRequest) -> (StatusCode, String) {
    let _ = env_logger::try_init();
    let sessions = SessionManager::new(&auth_config(), AuthApi::new(backends.auth));
    let app = App::new()
        .app_data(web::Data::new(AccountApi::new(backends.accounts)))
        .app_data(web::Data::new(InventoryApi::new(backends.inventory)))
        .app_data(web::Data::new(CheckoutApi::new(backends.checkout)))
        .app_data(web::Data::new(OrderLifecycleApi::new(backends.orders)))
        .app_data(web::Data::new(sessions))
        .configure(register_routes::<MockBackend>);
    let service = test::init_service(app).await;
    debug!("Making request");
    // Errors raised by middleware are returned from the service rather than rendered into a response.
    match test::try_call_service(&service, req.to_request()).await {
        Ok(res) => {
            let status = res.status();
            let body = test::read_body(res).await;
            (status, String::from_utf8_lossy(&body).into_owned())
        },
        Err(e) => {
            let res = e.as_response_error().error_response();
            let status = res.status();
            let body = to_bytes(res.into_body()).await.unwrap();
            (status, String::from_utf8_lossy(&body).into_owned())
        },
    }
}

pub fn with_token(req: TestRequest, token: &str) -> TestRequest {
    req.insert_header(("Authorization", token))
}

use std::time::Duration;

use actix_web::{dev::Server, http::KeepAlive, middleware::Logger, web, App, HttpServer};
use depot_engine::{
    AccountApi,
    AccountManagement,
    AuthApi,
    AuthManagement,
    CheckoutApi,
    InventoryApi,
    InventoryManagement,
    OrderLifecycleApi,
    OrderManagement,
    SqliteDatabase,
};
use log::*;

use crate::{
    auth::SessionManager,
    config::{AuthConfig, ServerConfig},
    errors::ServerError,
    helpers::{json_config, not_found, path_config},
    routes::{
        health,
        CheckoutRoute,
        DashboardRoute,
        DeleteUserRoute,
        LoginRoute,
        OffersRoute,
        OrderStatusRoute,
        RegisterRoute,
        UpdateOrderStatusRoute,
        UpdateUserRoleRoute,
        UsersRoute,
    },
    setup::{bootstrap_admin, seed_offers},
};

pub async fn run_server(config: ServerConfig) -> Result<(), ServerError> {
    let db = SqliteDatabase::new_with_url(&config.database_url, config.max_connections, config.store_timeout)
        .await
        .map_err(|e| ServerError::InitializeError(e.to_string()))?;
    db.migrate().await.map_err(|e| ServerError::InitializeError(e.to_string()))?;
    if let Some(admin) = &config.admin {
        bootstrap_admin(admin, &AccountApi::new(db.clone())).await?;
    }
    if let Some(path) = &config.seed_offers {
        seed_offers(path, &InventoryApi::new(db.clone())).await?;
    }
    let srv = create_server_instance(config, db)?;
    srv.await.map_err(|e| ServerError::Unspecified(e.to_string()))
}

pub fn create_server_instance(config: ServerConfig, db: SqliteDatabase) -> Result<Server, ServerError> {
    let access_log_format = if config.use_x_forwarded_for {
        "%t (%D ms) %s %{r}a %{Host}i %r"
    } else {
        "%t (%D ms) %s %a %{Host}i %r"
    };
    let auth_config = config.auth.clone();
    let srv = HttpServer::new(move || {
        App::new()
            .wrap(Logger::new(access_log_format).log_target("depot::access_log"))
            .configure(|cfg| configure_routes(cfg, db.clone(), &auth_config))
    })
    .keep_alive(KeepAlive::Timeout(Duration::from_secs(600)))
    .bind((config.host.as_str(), config.port))?
    .run();
    info!("🚀️ Listening on {}:{}", config.host, config.port);
    Ok(srv)
}

/// Registers the APIs over `db` and every route. Each worker calls this with its own clone of the backend handle.
pub fn configure_routes<B>(cfg: &mut web::ServiceConfig, db: B, auth: &AuthConfig)
where B: AccountManagement + AuthManagement + InventoryManagement + OrderManagement + Clone + 'static {
    let sessions = SessionManager::new(auth, AuthApi::new(db.clone()));
    cfg.app_data(web::Data::new(AccountApi::new(db.clone())))
        .app_data(web::Data::new(InventoryApi::new(db.clone())))
        .app_data(web::Data::new(CheckoutApi::new(db.clone())))
        .app_data(web::Data::new(OrderLifecycleApi::new(db)))
        .app_data(web::Data::new(sessions));
    register_routes::<B>(cfg);
}

/// Registers the routes only. The APIs and the [`SessionManager`] they use must already be app data.
pub fn register_routes<B>(cfg: &mut web::ServiceConfig)
where B: AccountManagement + AuthManagement + InventoryManagement + OrderManagement + 'static {
    cfg.app_data(json_config())
        .app_data(path_config())
        .service(health)
        .service(RegisterRoute::<B>::new())
        .service(LoginRoute::<B>::new())
        .service(OffersRoute::<B>::new())
        .service(CheckoutRoute::<B>::new())
        .service(OrderStatusRoute::<B>::new())
        .service(DashboardRoute::<B>::new())
        .service(UpdateOrderStatusRoute::<B>::new())
        .service(UsersRoute::<B>::new())
        .service(DeleteUserRoute::<B>::new())
        .service(UpdateUserRoleRoute::<B>::new())
        .default_service(web::to(not_found));
}

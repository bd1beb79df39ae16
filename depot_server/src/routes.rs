//! Request handler definitions
//!
//! Define each route and it handler here.
//! Handlers that are more than a line or two MUST go into a separate module. Keep this module neat and tidy 🙏
//!
//! A note about performance:
//! Since each worker thread processes its requests sequentially, handlers which block the current thread will cause the
//! current worker to stop processing new requests:
//! ```nocompile
//!     fn my_handler() -> impl Responder {
//!         std::thread::sleep(Duration::from_secs(5)); // <-- Bad practice! Will cause the current worker thread to
//! hang!
//!     }
//! ```
//! For this reason, any long, non-cpu-bound operation (e.g. I/O, database operations, etc.) should be expressed as
//! futures or asynchronous functions. Password hashing is CPU-bound, so the account API moves it onto the blocking
//! thread pool.
//!
//! Routes come in three flavours:
//! * public routes (`/health`, `/auth/register`, `/auth/login`),
//! * `where authenticated` routes, which need a current session of any role,
//! * `where requires [..]` routes, which additionally need one of the listed roles.
use actix_web::{get, http::StatusCode, web, HttpResponse, Responder};
use depot_engine::{
    db_types::Role,
    AccountApi,
    AccountManagement,
    AuthManagement,
    CheckoutApi,
    InventoryApi,
    InventoryManagement,
    OrderLifecycleApi,
    OrderManagement,
};
use log::*;

use crate::{
    auth::{Session, SessionManager},
    data_objects::{
        CheckoutRequest,
        CheckoutResponse,
        DashboardResponse,
        EmailRequest,
        JsonResponse,
        LoginRequest,
        LoginResponse,
        OffersResponse,
        OrderStatusResponse,
        RegisterRequest,
        RoleUpdateRequest,
        UpdateStatusRequest,
        UsersResponse,
    },
    errors::ServerError,
};

// Web-actix cannot handle generics in handlers, so it's implemented manually using the `route!` macro
#[macro_export]
macro_rules! route {
    ($name:ident => $method:ident $path:literal impl $($bounds:ident),+ where requires [$($roles:expr),+]) => {
        paste::paste! { pub struct [<$name:camel Route>]<A>(core::marker::PhantomData<fn() -> A>);}
        paste::paste! { impl<A> [<$name:camel Route>]<A> {
            #[allow(clippy::new_without_default)]
            pub fn new() -> Self {
                Self(core::marker::PhantomData::<fn() -> A>)
            }
        }}
        paste::paste! { impl<A> actix_web::dev::HttpServiceFactory for [<$name:camel Route>]<A>
        where
            A: $($bounds +)+ depot_engine::AuthManagement + 'static,
        {
            fn register(self, config: &mut actix_web::dev::AppService) {
                let res = actix_web::Resource::new($path)
                    .name(stringify!($name))
                    .guard(actix_web::guard::$method())
                    .to($name::<A>)
                    .wrap($crate::middleware::AclMiddlewareFactory::new(&[$($roles),+]))
                    .wrap($crate::middleware::SessionMiddlewareFactory::<A>::new());
                actix_web::dev::HttpServiceFactory::register(res, config);
            }
        }}
    };

    ($name:ident => $method:ident $path:literal impl $($bounds:ident),+ where authenticated) => {
        paste::paste! { pub struct [<$name:camel Route>]<A>(core::marker::PhantomData<fn() -> A>);}
        paste::paste! { impl<A> [<$name:camel Route>]<A> {
            #[allow(clippy::new_without_default)]
            pub fn new() -> Self {
                Self(core::marker::PhantomData::<fn() -> A>)
            }
        }}
        paste::paste! { impl<A> actix_web::dev::HttpServiceFactory for [<$name:camel Route>]<A>
        where
            A: $($bounds +)+ depot_engine::AuthManagement + 'static,
        {
            fn register(self, config: &mut actix_web::dev::AppService) {
                let res = actix_web::Resource::new($path)
                    .name(stringify!($name))
                    .guard(actix_web::guard::$method())
                    .to($name::<A>)
                    .wrap($crate::middleware::SessionMiddlewareFactory::<A>::new());
                actix_web::dev::HttpServiceFactory::register(res, config);
            }
        }}
    };

    ($name:ident => $method:ident $path:literal impl $($bounds:ident),+) => {
        paste::paste! { pub struct [<$name:camel Route>]<A>(core::marker::PhantomData<fn() -> A>);}
        paste::paste! { impl<A> [<$name:camel Route>]<A> {
            #[allow(clippy::new_without_default)]
            pub fn new() -> Self {
                Self(core::marker::PhantomData::<fn() -> A>)
            }
        }}
        paste::paste! { impl<A> actix_web::dev::HttpServiceFactory for [<$name:camel Route>]<A>
        where
            A: $($bounds +)+ 'static,
        {
            fn register(self, config: &mut actix_web::dev::AppService) {
                let res = actix_web::Resource::new($path)
                    .name(stringify!($name))
                    .guard(actix_web::guard::$method())
                    .to($name::<A>);
                actix_web::dev::HttpServiceFactory::register(res, config);
            }
        }}
    };
}

//----------------------------------------------   Health  ----------------------------------------------------
#[get("/health")]
pub async fn health() -> impl Responder {
    trace!("💻️ Received health check request");
    HttpResponse::Ok().body("👍️\n")
}

//----------------------------------------------   Auth  ----------------------------------------------------
route!(register => Post "/auth/register" impl AccountManagement);
pub async fn register<B: AccountManagement>(
    body: web::Json<RegisterRequest>,
    api: web::Data<AccountApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let RegisterRequest { username, email, password } = body.into_inner();
    debug!("💻️ Registration request for {username}");
    let account = api.register(&username, &email, &password).await?;
    let message = format!("Account {} created", account.username);
    Ok(HttpResponse::Created().json(JsonResponse::new(StatusCode::CREATED, message)))
}

route!(login => Post "/auth/login" impl AccountManagement, AuthManagement);
pub async fn login<B: AccountManagement + AuthManagement>(
    body: web::Json<LoginRequest>,
    accounts: web::Data<AccountApi<B>>,
    sessions: web::Data<SessionManager<B>>,
) -> Result<HttpResponse, ServerError> {
    debug!("💻️ Login request for {}", body.email);
    let token = sessions.login(&accounts, &body.email, &body.password).await?;
    Ok(HttpResponse::Ok().json(LoginResponse { token }))
}

route!(offers => Get "/auth/offers" impl InventoryManagement where authenticated);
pub async fn offers<B: InventoryManagement>(api: web::Data<InventoryApi<B>>) -> Result<HttpResponse, ServerError> {
    let offers = api.offers().await?;
    Ok(HttpResponse::Ok().json(OffersResponse { offers }))
}

//----------------------------------------------   Orders  ----------------------------------------------------
route!(checkout => Post "/auth/checkout" impl OrderManagement where authenticated);
pub async fn checkout<B: OrderManagement>(
    session: Session,
    body: web::Json<CheckoutRequest>,
    api: web::Data<CheckoutApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let cart = body.cart();
    debug!("💻️ Checkout request from {} for {} lines", session.claims.email, cart.len());
    let result = api.checkout(&cart).await?;
    Ok(HttpResponse::Ok().json(CheckoutResponse {
        order_id: result.order_id,
        total: result.total,
        status: result.status,
    }))
}

route!(order_status => Get "/auth/orders/{id}" impl OrderManagement where authenticated);
pub async fn order_status<B: OrderManagement>(
    path: web::Path<i64>,
    api: web::Data<OrderLifecycleApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let order_id = path.into_inner();
    let status = api.order_status(order_id).await?;
    Ok(HttpResponse::Ok().json(OrderStatusResponse { status }))
}

//----------------------------------------------   Admin  ----------------------------------------------------
route!(dashboard => Get "/admin/dashboard" impl InventoryManagement, OrderManagement where requires [Role::Admin]);
pub async fn dashboard<B: InventoryManagement + OrderManagement>(
    inventory: web::Data<InventoryApi<B>>,
    orders: web::Data<OrderLifecycleApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let dashboard = orders.dashboard().await?;
    let offers = inventory.offers().await?;
    let orders = orders.orders().await?;
    Ok(HttpResponse::Ok().json(DashboardResponse { dashboard, offers, orders }))
}

route!(update_order_status => Patch "/admin/orders/{id}" impl OrderManagement where requires [Role::Admin]);
pub async fn update_order_status<B: OrderManagement>(
    session: Session,
    path: web::Path<i64>,
    body: web::Json<UpdateStatusRequest>,
    api: web::Data<OrderLifecycleApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let order_id = path.into_inner();
    info!("💻️ {} is setting order #{order_id} to '{}'", session.claims.email, body.status);
    let status = api.update_status(order_id, &body.status).await?;
    Ok(HttpResponse::Ok().json(OrderStatusResponse { status }))
}

route!(users => Get "/admin/users" impl AccountManagement where requires [Role::Admin]);
pub async fn users<B: AccountManagement>(api: web::Data<AccountApi<B>>) -> Result<HttpResponse, ServerError> {
    let users = api.accounts().await?;
    Ok(HttpResponse::Ok().json(UsersResponse { users }))
}

route!(delete_user => Delete "/admin/users" impl AccountManagement where requires [Role::Admin]);
pub async fn delete_user<B: AccountManagement>(
    session: Session,
    body: web::Json<EmailRequest>,
    api: web::Data<AccountApi<B>>,
) -> Result<HttpResponse, ServerError> {
    info!("💻️ {} is deleting account {}", session.claims.email, body.email);
    api.delete_account(&body.email).await?;
    Ok(HttpResponse::Ok().json(JsonResponse::success(format!("Account {} deleted", body.email))))
}

route!(update_user_role => Patch "/admin/users/role" impl AccountManagement where requires [Role::Admin]);
pub async fn update_user_role<B: AccountManagement>(
    session: Session,
    body: web::Json<RoleUpdateRequest>,
    api: web::Data<AccountApi<B>>,
) -> Result<HttpResponse, ServerError> {
    info!("💻️ {} is giving {} the {} role", session.claims.email, body.email, body.role);
    let account = api.set_role(&body.email, body.role).await?;
    let message = format!("{} now has the {} role. It applies from their next login.", account.email, account.role);
    Ok(HttpResponse::Ok().json(JsonResponse::success(message)))
}

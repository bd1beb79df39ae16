//! # Depot server
//! This crate hosts the HTTP surface of the supply depot. It is responsible for:
//! * Registering accounts and issuing session tokens, honouring only the most recent token of each account.
//! * Listing the offers in stock and checking carts out into orders.
//! * Letting admins move orders through their lifecycle, view the dashboard and manage accounts.
//!
//! All state lives in the store behind `depot_engine`; the server holds none between requests.
//!
//! ## Configuration
//! The server is configured via environment variables. See [config](config/index.html) for more information.
//!
//! ## Routes
//! The server exposes the following routes:
//! * `/health`: A health check route that returns a 200 OK response.
//! * `/auth/register`, `/auth/login`: Public account routes.
//! * `/auth/offers`, `/auth/checkout`, `/auth/orders/{id}`: Routes for any logged-in account.
//! * `/admin/dashboard`, `/admin/orders/{id}`, `/admin/users`, `/admin/users/role`: Admin-only routes.

pub mod auth;
pub mod cli;
pub mod config;
pub mod data_objects;
pub mod errors;
pub mod helpers;
pub mod middleware;
pub mod routes;
pub mod server;
pub mod setup;

#[cfg(test)]
mod endpoint_tests;

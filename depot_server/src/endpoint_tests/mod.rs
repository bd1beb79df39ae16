mod admin;
mod auth;
mod helpers;
mod mocks;
mod session_flow;

//! Budgetra HTTP shell.
//!
//! Exposes the building blocks (config, state, error handling, routes, page
//! rendering) so integration tests and the binary entrypoint can both use
//! them.
//!
//! This is a single-user shell. Every request is served as whoever the
//! process-wide session store holds, with no per-request credentials, so
//! [`config::ServerConfig`] refuses non-loopback bind addresses. The auth
//! form endpoints carry no CSRF token; anything able to reach the loopback
//! port can sign the local user in or out.

pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod pages;
pub mod response;
pub mod router;
pub mod routes;
pub mod state;

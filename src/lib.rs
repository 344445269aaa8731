//! Forward-auth gateway: verified token claims -> upstream request headers,
//! plus service-account credential selection.

pub mod api;
pub mod app;
pub mod config;
pub mod error;
pub mod headers;
pub mod middleware;
pub mod services;
pub mod state;

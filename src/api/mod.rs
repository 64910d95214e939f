//! API Module
//!
//! HTTP handlers and routing for the cache REST adapter.
//!
//! # Endpoints
//! - `POST /cache` - Store a key-value pair
//! - `GET /cache?key=K` - Retrieve a value by key
//! - `DELETE /cache?key=K` - Delete a key
//! - `GET /cache/all` - List every stored key
//! - `DELETE /cache/all` - Remove every entry
//! - `GET /stats` - Get cache statistics
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;

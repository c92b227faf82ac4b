//! InkShare persistence service
//!
//! Stores shared rooms and read-only snapshots, and hosts uploaded asset
//! payloads so shared documents never carry embedded binary data.
//!
//! ## Endpoints
//!
//! - `POST /api/new-room` with `{ schema, snapshot }` replies `{ error, slug }`
//! - `POST /api/snapshots` with `{ schema, snapshot, parent_slug? }` replies `{ error, roomId }`
//! - `GET /api/rooms/{slug}` and `GET /api/snapshots/{id}` return the stored document
//! - `PUT /uploads/{object}` stores raw bytes and replies `{ url }`
//! - `GET /uploads/{object}` serves them back

pub mod client;
pub mod config;
pub mod routes;
pub mod state;

pub use client::InProcessClient;
pub use config::{ConfigError, ServerConfig};
pub use routes::{ApiError, create_router};
pub use state::{AppState, StoredDocument};

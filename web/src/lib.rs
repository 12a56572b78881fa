//! Axum HTTP surface for the co-working booking API.
//!
//! Handlers stay thin: they extract the caller and the payload, call one
//! service method and wrap the result in the response envelope.
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  router + middleware                    │  ← tracing, CORS, correlation IDs
//! ├─────────────────────────────────────────┤
//! │  extractors (AuthUser, Payload)         │  ← bearer tokens, JSON bodies
//! ├─────────────────────────────────────────┤
//! │  handlers                               │  ← one service call each
//! ├─────────────────────────────────────────┤
//! │  cowork-core services                   │
//! └─────────────────────────────────────────┘
//! ```
//!
//! # Response contract
//!
//! - success: `{"success": true, "data": ..., "count": n}` (`count` on lists)
//! - failure: `{"success": false, "message": "..."}`
//!
//! # Example
//!
//! ```ignore
//! use cowork_core::memory::InMemoryStore;
//! use cowork_web::{AppState, TokenIssuer, build_router};
//! use std::sync::Arc;
//!
//! let store = Arc::new(InMemoryStore::new());
//! let tokens = TokenIssuer::new(b"secret", chrono::Duration::days(30));
//! let state = AppState::new(store.clone(), store.clone(), store, tokens, 3);
//! let app = build_router(state);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod auth;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod response;
pub mod router;
pub mod state;

pub use auth::{AuthUser, Claims, TokenIssuer};
pub use error::AppError;
pub use extractors::{CorrelationId, Payload};
pub use middleware::{CORRELATION_ID_HEADER, correlation_id_layer};
pub use response::ApiResponse;
pub use router::build_router;
pub use state::AppState;

//! # Spotify Integration Module
//!
//! This module provides the interface to the Spotify Web API used by the sync
//! flows: authentication, catalog search, and playlist management. It is the
//! only place that speaks HTTP to Spotify; everything above it works with the
//! explicit result types defined in [`crate::types`], constructed immediately
//! after each call returns.
//!
//! ## Architecture
//!
//! ```text
//! Application Layer (CLI flows, Management)
//!          ↓
//! Spotify Integration Layer
//!     ├── Authentication (token cache + refresh / client credentials)
//!     └── SpotifyConnection (user lookup, search, playlists)
//!          ↓
//! HTTP Layer (reqwest, JSON)
//!          ↓
//! Spotify Web API
//! ```
//!
//! ## Core Modules
//!
//! - [`auth`] - Token lifecycle: loads the cached token from the local data
//!   directory, refreshes it through the refresh-token grant when expired
//!   (4-minute early-refresh buffer), and falls back to the client-credentials
//!   grant when no cached token exists. The interactive OAuth bootstrap is an
//!   external concern; this module only consumes its artifacts.
//! - [`client`] - [`client::SpotifyConnection`], an authenticated handle
//!   carrying the HTTP client, API base URL and resolved user identity. The
//!   handle is read-only-safe for concurrent search calls and is shared
//!   across workers without additional synchronization.
//!
//! ## Error Handling
//!
//! All requests implement the same resilience policy:
//! - 502 Bad Gateway → wait 10 seconds and retry
//! - 429 Too Many Requests → honor the `Retry-After` header up to 120 seconds
//! - other HTTP or network errors → propagate as `reqwest::Error`
//!
//! Per-track resolution misses are not errors: a search returning an empty
//! item list yields `Ok(None)` and is counted by the caller.
//!
//! ## API Coverage
//!
//! - `GET  /me` - resolve the authenticated user for playlist ownership
//! - `GET  /search` - track search (limit 1, first-hit selection)
//! - `GET  /me/playlists` - playlist lookup (first page only)
//! - `POST /users/{user_id}/playlists` - create a private playlist
//! - `POST /playlists/{id}/tracks` - batched track adds (100 per call)
//! - `GET  /playlists/{id}/tracks` - paginated playlist-item fetch
//! - `POST /api/token` - token refresh and client-credentials grants

pub mod auth;
pub mod client;

pub use auth::TokenManager;
pub use client::SpotifyConnection;

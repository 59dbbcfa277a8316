//! # CLI Module
//!
//! This module implements the three top-level sync flows. Each flow is a pure
//! sequencing of the management components: discovery, catalog resolution,
//! then playlist reconciliation or file materialization.
//!
//! ## Flows
//!
//! - [`to_spotify`] - walk a local directory (tags first, filename-parse
//!   fallback), resolve each valid track against the Spotify catalog
//!   sequentially, then ensure the target playlist exists and append the
//!   matches in batches.
//! - [`from_spotify`] - fetch the full playlist track list page by page,
//!   resolve each track against YouTube on a bounded worker pool, then
//!   materialize every resolved track on a second pool. The two phases run
//!   strictly in sequence; results are collected in completion order.
//! - [`from_youtube`] - one bulk yt-dlp playlist invocation with the
//!   post-processing hook applied to every file the tool reports finished;
//!   the tool manages its own internal parallelism.
//!
//! ## Error Handling
//!
//! Fatal setup errors (missing credentials, inaccessible directory, failed
//! connection) abort through `error!` before any per-track work begins.
//! Everything after setup is per-item: misses and transient failures are
//! warned about and counted, and the flow exits 0 with a final summary line
//! as the primary success signal.

mod from_spotify;
mod from_youtube;
mod to_spotify;

pub use from_spotify::from_spotify;
pub use from_youtube::from_youtube;
pub use to_spotify::to_spotify;

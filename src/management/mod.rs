mod materialize;
mod pool;
mod reconciler;
mod resolver;
mod scan;

pub use materialize::{
    FinishAction, FinishOutcome, MaterializeOutcome, Materializer, finish_batch, finish_download,
    plan_finish,
};
pub use pool::map_bounded;
pub use reconciler::{AddOutcome, add_tracks, ensure_playlist};
pub use resolver::{resolve_spotify, resolve_youtube};
pub use scan::walk_directory;

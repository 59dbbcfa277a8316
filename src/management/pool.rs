use std::future::Future;
use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use crate::warning;

/// Maps `op` over `items` on a bounded worker pool and collects the results
/// in completion order.
///
/// `workers == 0` means "use a system-chosen maximum". Each item runs as its
/// own task gated by a semaphore permit, so at most `workers` operations are
/// in flight at once. Panicked tasks are reported and skipped; they never
/// cancel siblings.
pub async fn map_bounded<T, R, F, Fut>(workers: usize, items: Vec<T>, op: F) -> Vec<R>
where
    T: Send + 'static,
    R: Send + 'static,
    F: Fn(T) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
{
    let permits = if workers == 0 {
        std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(4)
    } else {
        workers
    };

    let semaphore = Arc::new(Semaphore::new(permits));
    let op = Arc::new(op);
    let mut set: JoinSet<R> = JoinSet::new();

    for item in items {
        let semaphore = Arc::clone(&semaphore);
        let op = Arc::clone(&op);
        set.spawn(async move {
            // The semaphore is never closed; acquire only fails after close.
            let _permit = semaphore
                .acquire_owned()
                .await
                .expect("worker pool semaphore closed");
            op(item).await
        });
    }

    let mut results = Vec::with_capacity(set.len());
    while let Some(joined) = set.join_next().await {
        match joined {
            Ok(result) => results.push(result),
            Err(e) => {
                warning!("Worker task failed: {}", e);
            }
        }
    }

    results
}

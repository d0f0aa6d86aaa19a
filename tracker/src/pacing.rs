//! Fixed delays between API calls.

use std::future::Future;
use std::time::Duration;

/// Something that can wait for a while.
///
/// The tracker never sleeps directly; it asks its pacer to. Production code uses
/// [`TokioPacer`], while tests swap in a pacer that only records what it was asked to do.
pub trait Pacer {
    /// Waits for `duration` before returning.
    fn pause(&mut self, duration: Duration) -> impl Future<Output = ()>;
}

/// Pauses by sleeping on the tokio timer.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioPacer;

impl Pacer for TokioPacer {
    async fn pause(&mut self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

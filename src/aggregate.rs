use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use tokio::time::{Instant, timeout};
use tracing::{debug, warn};

use crate::model::{AggregatedResult, SourceResult};
use crate::sources::Source;

/// Look `word` up in every enabled source concurrently and collect one
/// result per source, in the order the sources were given.
///
/// Failures stay inside their own slot: an adapter error, or an adapter
/// that outlives `deadline`, produces a result with `error` set and no
/// entries, and has no effect on sibling sources. The call returns once
/// every source has resolved; an empty source list resolves immediately.
pub async fn aggregate(
    word: &str,
    sources: &[Arc<dyn Source>],
    deadline: Duration,
) -> AggregatedResult {
    let lookups = sources.iter().map(|source| {
        let source = Arc::clone(source);
        async move {
            let start = Instant::now();
            let outcome = timeout(deadline, source.query(word)).await;
            let elapsed = start.elapsed();

            let (entries, error) = match outcome {
                Ok(Ok(entries)) => {
                    debug!(source = source.name(), count = entries.len(), ?elapsed, "source answered");
                    (entries, None)
                }
                Ok(Err(e)) => {
                    warn!(source = source.name(), error = %e, "source failed");
                    (vec![], Some(e.to_string()))
                }
                Err(_) => {
                    warn!(source = source.name(), ?deadline, "source deadline exceeded");
                    (vec![], Some(format!("timed out after {deadline:?}")))
                }
            };

            SourceResult {
                source: source.name().to_string(),
                entries,
                link: source.link(word),
                elapsed,
                error,
            }
        }
    });

    // join_all yields outputs in input order, which pins each slot to
    // its source independently of completion order.
    join_all(lookups).await
}

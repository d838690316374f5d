//! One fetch-decode-evaluate cycle, and the loop that repeats it.

use std::future::Future;
use std::time::Duration;

use thiserror::Error;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

use crate::alert::{Alert, evaluate};
use crate::fetch::{FetchError, RetryError, RetryPolicy, StatsSource};
use crate::stats::{DecodeError, Snapshot, decode};

#[derive(Debug, Error)]
pub enum CycleError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error("error parsing server statistics: {0}")]
    Decode(#[from] DecodeError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleReport {
    pub snapshot: Snapshot,
    pub alerts: Vec<Alert>,
}

/// Fetches and decodes a snapshot, retrying the pair as a unit.
pub async fn fetch_snapshot<S: StatsSource>(
    source: &S,
    policy: &RetryPolicy,
) -> Result<Snapshot, RetryError<CycleError>> {
    policy
        .run(|_attempt| async move {
            let raw = source.fetch().await?;
            debug!(bytes = raw.len(), "received stats payload");
            Ok::<_, CycleError>(decode(&raw)?)
        })
        .await
}

pub async fn run_cycle<S: StatsSource>(
    source: &S,
    policy: &RetryPolicy,
) -> Result<CycleReport, RetryError<CycleError>> {
    let snapshot = fetch_snapshot(source, policy).await?;
    debug!(summary = %snapshot.summary(), "decoded snapshot");

    let alerts = evaluate(&snapshot);
    info!(alerts = alerts.len(), "evaluated snapshot");

    Ok(CycleReport { snapshot, alerts })
}

/// Runs a cycle every `interval` until `shutdown` resolves.
///
/// `shutdown` is raced against both the wait for the next tick and the cycle
/// itself, so an in-flight fetch or retry delay is abandoned on shutdown.
/// Errors returned by `on_cycle` stop the loop.
pub async fn watch<S, F, H, E>(
    source: &S,
    policy: &RetryPolicy,
    interval: Duration,
    shutdown: F,
    mut on_cycle: H,
) -> Result<(), E>
where
    S: StatsSource,
    F: Future<Output = ()>,
    H: FnMut(Result<CycleReport, RetryError<CycleError>>) -> Result<(), E>,
{
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = ticker.tick() => {}
            () = &mut shutdown => break,
        }
        tokio::select! {
            result = run_cycle(source, policy) => on_cycle(result)?,
            () = &mut shutdown => break,
        }
    }

    info!("shutdown requested, stopping");
    Ok(())
}

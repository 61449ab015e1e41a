//! Expiry sweep: transitions stale unconfirmed invitations to EXPIRED.
//!
//! One producer drains the (unconfirmed, expiry) index page by page and
//! sends each page into a bounded channel; one consumer filters each batch
//! with the expiry predicate and fans the surviving updates out to a
//! semaphore-bounded worker pool. The consumer finishes a batch before
//! pulling the next, so backpressure is per batch while the producer keeps
//! prefetching up to the channel depth. Channel closure is the
//! end-of-stream signal; joining both task handles is run completion.

use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::{mpsc, Semaphore};
use tokio::task::JoinSet;
use tracing::{debug, info, warn};
use usher_storage::{timestamps, Invitation, InvitationUpdate, InviteStatus, Store};

use crate::metrics;

/// Pages buffered between the index reader and the update stage.
pub const BATCH_QUEUE_DEPTH: usize = 4;

/// Concurrent conditional updates in flight per batch.
pub const UPDATE_WORKERS: usize = 10;

/// Accounting for one sweep run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SweepReport {
    /// Index pages fetched.
    pub pages: usize,
    /// Invitations examined across all pages.
    pub examined: usize,
    /// Invitations transitioned to EXPIRED.
    pub transitioned: usize,
    /// Invitations that vanished between read and update.
    pub skipped_missing: usize,
    /// Invitations whose update failed with a store error.
    pub update_errors: usize,
}

enum UpdateOutcome {
    Transitioned,
    Missing,
    Failed,
}

/// Run one sweep to completion and report.
///
/// Best effort: individual update failures are counted, not retried; a page
/// fetch failure ends enumeration for this run. The next scheduled run
/// heals whatever this one missed.
pub async fn run(store: Arc<dyn Store>) -> SweepReport {
    let started = Instant::now();
    // One clock reading for the whole run, at the same precision the
    // records carry.
    let now = timestamps::truncate_to_seconds(Utc::now());

    let (batch_tx, batch_rx) = mpsc::channel::<Vec<Invitation>>(BATCH_QUEUE_DEPTH);

    let producer = tokio::spawn(produce_batches(store.clone(), batch_tx));
    let consumer = tokio::spawn(consume_batches(store, batch_rx, now));

    let pages = match producer.await {
        Ok(pages) => pages,
        Err(e) => {
            warn!(error = %e, "sweep producer task failed");
            0
        }
    };
    let mut report = match consumer.await {
        Ok(report) => report,
        Err(e) => {
            warn!(error = %e, "sweep consumer task failed");
            SweepReport::default()
        }
    };
    report.pages = pages;

    info!(
        pages = report.pages,
        examined = report.examined,
        transitioned = report.transitioned,
        skipped_missing = report.skipped_missing,
        update_errors = report.update_errors,
        "sweep run complete"
    );
    metrics::record_sweep(&report, started.elapsed());
    report
}

/// Drive scheduled sweeps until shutdown. The first run happens
/// immediately, then every `interval`.
pub async fn run_periodic(
    store: Arc<dyn Store>,
    interval: std::time::Duration,
    mut shutdown: tokio::sync::broadcast::Receiver<()>,
) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                run(store.clone()).await;
            }
            _ = shutdown.recv() => break,
        }
    }
}

async fn produce_batches(store: Arc<dyn Store>, batch_tx: mpsc::Sender<Vec<Invitation>>) -> usize {
    let mut pages = 0;
    let mut start = None;
    loop {
        let page = match store.query_by_status(InviteStatus::Unconfirmed, start).await {
            Ok(page) => page,
            Err(e) => {
                // Enumeration ends here; the next scheduled run retries.
                warn!(error = %e, "sweep page fetch failed");
                break;
            }
        };
        pages += 1;

        let next = page.next;
        if !page.items.is_empty() && batch_tx.send(page.items).await.is_err() {
            // Consumer is gone; nothing left to feed.
            break;
        }
        match next {
            Some(token) => start = Some(token),
            None => break,
        }
    }
    pages
}

async fn consume_batches(
    store: Arc<dyn Store>,
    mut batch_rx: mpsc::Receiver<Vec<Invitation>>,
    now: DateTime<Utc>,
) -> SweepReport {
    let workers = Arc::new(Semaphore::new(UPDATE_WORKERS));
    let mut report = SweepReport::default();

    while let Some(batch) = batch_rx.recv().await {
        report.examined += batch.len();

        let stale: Vec<Invitation> = batch
            .into_iter()
            .filter(|invitation| {
                invitation.is_expired_at(now)
                    && invitation.invite_status != InviteStatus::Confirmed
            })
            .collect();
        debug!(stale = stale.len(), "processing sweep batch");

        let mut updates = JoinSet::new();
        for invitation in stale {
            let store = store.clone();
            let workers = workers.clone();
            updates.spawn(async move {
                let _permit = workers.acquire_owned().await.expect("semaphore closed");
                expire_one(store.as_ref(), &invitation).await
            });
        }

        // The batch must fully settle before the next one starts.
        while let Some(joined) = updates.join_next().await {
            match joined {
                Ok(UpdateOutcome::Transitioned) => report.transitioned += 1,
                Ok(UpdateOutcome::Missing) => report.skipped_missing += 1,
                Ok(UpdateOutcome::Failed) => report.update_errors += 1,
                Err(e) => {
                    warn!(error = %e, "sweep update task failed");
                    report.update_errors += 1;
                }
            }
        }
    }

    report
}

async fn expire_one(store: &dyn Store, invitation: &Invitation) -> UpdateOutcome {
    let update = InvitationUpdate::status(InviteStatus::Expired);
    match store
        .update_invitation(&invitation.email, &invitation.code, &update)
        .await
    {
        Ok(Some(_)) => UpdateOutcome::Transitioned,
        Ok(None) => {
            debug!(
                email = %invitation.email,
                code = %invitation.code,
                "invitation vanished before expiry update"
            );
            UpdateOutcome::Missing
        }
        Err(e) => {
            warn!(
                email = %invitation.email,
                code = %invitation.code,
                error = %e,
                "expiry update failed"
            );
            UpdateOutcome::Failed
        }
    }
}

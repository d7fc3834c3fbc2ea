//! Countdown driver task
//!
//! The only owner of wall-clock timers. It watches run snapshots and keeps
//! two timers in line with them: a one-second ticker that exists only while
//! the run is counting, and a one-shot settle sleep for the currently armed
//! token. The ticker is rebuilt on every start, resume and phase entry, so
//! paused time is never counted and each phase gets its full first second.

use std::{pin::Pin, sync::Arc, time::Duration};
use tokio::time::{interval_at, sleep, Instant, Interval, MissedTickBehavior, Sleep};
use tracing::{debug, error, info};

use crate::{
    engine::{SettleToken, SETTLE_DELAY},
    state::{AppState, RunSnapshot},
};

const TICK_PERIOD: Duration = Duration::from_secs(1);

struct Ticker {
    epoch: u64,
    interval: Interval,
}

struct PendingSettle {
    token: SettleToken,
    sleep: Pin<Box<Sleep>>,
}

/// Background task that turns elapsed time into ticks and settles
pub async fn countdown_timer_task(state: Arc<AppState>) {
    info!("Starting countdown timer task");

    let mut run_rx = state.run_update_tx.subscribe();
    let mut ticker: Option<Ticker> = None;
    let mut settle: Option<PendingSettle> = None;
    let mut last_settled: Option<SettleToken> = None;

    loop {
        let snapshot = run_rx.borrow_and_update().clone();
        sync_ticker(&mut ticker, &snapshot);
        sync_settle(&mut settle, last_settled, &snapshot);

        tokio::select! {
            epoch = next_tick(&mut ticker) => {
                if let Err(e) = state.tick(epoch) {
                    error!("Failed to apply tick: {}", e);
                }
            }

            token = settle_elapsed(&mut settle) => {
                settle = None;
                last_settled = Some(token);
                if let Err(e) = state.settle(token) {
                    error!("Failed to apply settle: {}", e);
                }
            }

            changed = run_rx.changed() => {
                if changed.is_err() {
                    info!("Run updates closed, stopping countdown timer task");
                    break;
                }
            }
        }
    }
}

fn sync_ticker(ticker: &mut Option<Ticker>, snapshot: &RunSnapshot) {
    if !snapshot.is_running() || snapshot.settling {
        if ticker.take().is_some() {
            debug!("Ticker stopped");
        }
        return;
    }

    let current = ticker.as_ref().map(|t| t.epoch);
    if current != Some(snapshot.run_epoch) {
        let mut interval = interval_at(Instant::now() + TICK_PERIOD, TICK_PERIOD);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        *ticker = Some(Ticker {
            epoch: snapshot.run_epoch,
            interval,
        });
        debug!("Ticker started for epoch {}", snapshot.run_epoch);
    }
}

fn sync_settle(
    settle: &mut Option<PendingSettle>,
    last_settled: Option<SettleToken>,
    snapshot: &RunSnapshot,
) {
    match snapshot.settle_token {
        Some(token) if Some(token) == last_settled => *settle = None,
        Some(token) => {
            if settle.as_ref().map(|s| s.token) != Some(token) {
                debug!("Settle armed for {:?}", token);
                *settle = Some(PendingSettle {
                    token,
                    sleep: Box::pin(sleep(SETTLE_DELAY)),
                });
            }
        }
        None => {
            if settle.take().is_some() {
                debug!("Pending settle cancelled");
            }
        }
    }
}

async fn next_tick(ticker: &mut Option<Ticker>) -> u64 {
    match ticker {
        Some(ticker) => {
            ticker.interval.tick().await;
            ticker.epoch
        }
        None => std::future::pending().await,
    }
}

async fn settle_elapsed(settle: &mut Option<PendingSettle>) -> SettleToken {
    match settle {
        Some(pending) => {
            pending.sleep.as_mut().await;
            pending.token
        }
        None => std::future::pending().await,
    }
}

use log::debug;
use std::future::Future;
use std::time::Duration;
use tokio::time::{interval, MissedTickBehavior};

/// Runs `cycle` on every tick of `period`, the first one immediately.
///
/// Each cycle is awaited before the next tick, so cycles never overlap; a
/// cycle longer than the period delays the following ones instead of
/// bunching them up. Stops after `max_cycles` when given and returns the
/// number of completed cycles.
pub async fn run_every<F, Fut>(period: Duration, max_cycles: Option<usize>, mut cycle: F) -> usize
where
    F: FnMut(usize) -> Fut,
    Fut: Future<Output = ()>,
{
    let mut ticker = interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let mut completed = 0;
    while max_cycles.map_or(true, |max| completed < max) {
        ticker.tick().await;
        debug!("Refresh cycle {}", completed + 1);
        cycle(completed).await;
        completed += 1;
    }
    completed
}

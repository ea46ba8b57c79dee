//! Per-unit execution loops.
//!
//! Each unit runs `sleep → attempt → notify` on its own task, forever. A loop
//! only stops when the observer has closed the notification channel.

use stabring_core::Actor;
use tokio::task::JoinHandle;
use tracing::{debug, trace};

use crate::channel::Notifier;
use crate::config::SimulationConfig;
use crate::delay::ExponentialDelay;

/// Drive one unit until the notification channel closes.
pub async fn run_unit(mut actor: Actor, mut delay: ExponentialDelay, notifier: Notifier) {
    let id = actor.id();
    debug!(unit = %id, mean_delay = delay.mean(), "execution loop started");
    loop {
        tokio::time::sleep(delay.next_delay()).await;

        if !actor.try_act() {
            trace!(unit = %id, "not privileged");
            continue;
        }
        debug!(unit = %id, value = actor.value(), "took the token");

        if notifier.notify(id).await.is_err() {
            debug!(unit = %id, "observer gone, stopping");
            return;
        }
    }
}

/// Spawn one execution loop per actor.
pub fn spawn_units(
    actors: Vec<Actor>,
    config: &SimulationConfig,
    notifier: &Notifier,
) -> Vec<JoinHandle<()>> {
    actors
        .into_iter()
        .map(|actor| {
            let delay =
                ExponentialDelay::for_unit(config.mean_delay, config.time_unit, config.seed, actor.id());
            tokio::spawn(run_unit(actor, delay, notifier.clone()))
        })
        .collect()
}

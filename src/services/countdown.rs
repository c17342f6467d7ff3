//! Display-only countdown broadcasting.
//!
//! A one-second ticker pushes the seconds-remaining of the next upcoming
//! batch to attached boards. The tick is purely a display derivative of the
//! game clock; it never flips a substitution to Due. That transition is the
//! elapsed-time comparison performed wherever plan state is read.

use std::{sync::Arc, time::SystemTime};

use tokio::{
    sync::mpsc,
    task::JoinHandle,
    time::{Duration, MissedTickBehavior, interval},
};

use crate::{
    dto::sse::CountdownTickEvent,
    services::sse_events,
    state::{SharedState, session::SessionContext},
};

const COUNTDOWN_PERIOD: Duration = Duration::from_secs(1);

/// Handle to a running countdown ticker.
pub struct CountdownHandle {
    stop: mpsc::Sender<()>,
    task: JoinHandle<()>,
}

impl CountdownHandle {
    /// Cancel the ticker and wait for it to wind down.
    pub async fn stop(self) {
        let _ = self.stop.send(()).await;
        let _ = self.task.await;
    }
}

/// Spawn the one-second countdown ticker for an open session.
pub fn start(state: SharedState, ctx: Arc<SessionContext>) -> CountdownHandle {
    let (stop, rx) = mpsc::channel(1);
    let task = tokio::spawn(run_countdown_loop(state, ctx, rx));
    CountdownHandle { stop, task }
}

async fn run_countdown_loop(
    state: SharedState,
    ctx: Arc<SessionContext>,
    mut stop: mpsc::Receiver<()>,
) {
    let mut period = interval(COUNTDOWN_PERIOD);
    period.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = period.tick() => tick_once(&state, &ctx).await,
            _ = stop.recv() => break,
        }
    }
}

async fn tick_once(state: &SharedState, ctx: &SessionContext) {
    let tick = {
        let session = ctx.session().read().await;
        if !session.clock.is_running() {
            return;
        }
        let elapsed = session.clock.tick(SystemTime::now());
        let half = session.clock.half();

        session
            .plan
            .batches()
            .into_iter()
            .find(|(_, members)| members.iter().any(|sub| !sub.status.is_terminal()))
            .map(|(key, members)| CountdownTickEvent {
                team_id: ctx.team_id(),
                trigger_secs: key.trigger_secs,
                half: key.half.number(),
                seconds_remaining: key.trigger_secs.saturating_sub(elapsed),
                due: members.iter().any(|sub| sub.is_due(elapsed, half)),
            })
    };

    if let Some(tick) = tick {
        sse_events::broadcast_countdown_tick(state, tick);
    }
}

use chrono::{NaiveDate, NaiveDateTime};
use ractor::{Actor, ActorProcessingErr, ActorRef, RpcReplyPort};
use shiftdesk_core::{Shift, next_trigger};
use shiftdesk_schema::DispatchSummary;
use tokio::task::JoinHandle;
use tracing::{error, info};

use super::{Dispatcher, SendReceipt};
use crate::clock::Clock;
use crate::error::DeskError;
use crate::utils::logging::debug_json;

#[derive(Debug)]
pub enum DispatchMessage {
    /// Fired by the timer task at each trigger time.
    Scheduled { date: NaiveDate, shift: Shift },

    /// Manual pass with the same "already sent" guard as the scheduled one.
    RunNow(NaiveDate, Shift, RpcReplyPort<Result<DispatchSummary, DeskError>>),

    /// Email a single report right away.
    SendReport {
        report_id: i64,
        shift: Option<Shift>,
        recipients: Option<Vec<String>>,
        reply: RpcReplyPort<Result<SendReceipt, DeskError>>,
    },
}

#[derive(Clone)]
pub struct DispatcherHandle {
    actor: ActorRef<DispatchMessage>,
    clock: Clock,
}

impl DispatcherHandle {
    pub async fn run_now(&self, date: NaiveDate, shift: Shift) -> Result<DispatchSummary, DeskError> {
        ractor::call!(self.actor, DispatchMessage::RunNow, date, shift)
            .map_err(|e| DeskError::RactorError(format!("Dispatcher RunNow RPC failed: {e}")))?
    }

    pub async fn send_report(
        &self,
        report_id: i64,
        shift: Option<Shift>,
        recipients: Option<Vec<String>>,
    ) -> Result<SendReceipt, DeskError> {
        ractor::call!(self.actor, |reply| DispatchMessage::SendReport {
            report_id,
            shift,
            recipients,
            reply,
        })
        .map_err(|e| DeskError::RactorError(format!("Dispatcher SendReport RPC failed: {e}")))?
    }

    /// Same message the timer sends at a trigger time. Fire-and-forget.
    pub fn trigger(&self, date: NaiveDate, shift: Shift) -> Result<(), DeskError> {
        self.actor
            .cast(DispatchMessage::Scheduled { date, shift })
            .map_err(|e| DeskError::RactorError(format!("Dispatcher Scheduled cast failed: {e}")))
    }

    pub fn clock(&self) -> Clock {
        self.clock
    }
}

pub struct DispatchArgs {
    pub dispatcher: Dispatcher,
    /// Start the trigger timer; off in tests and when `dispatch.enabled = false`.
    pub schedule: bool,
}

struct DispatchState {
    dispatcher: Dispatcher,
    timer: Option<JoinHandle<()>>,
}

struct DispatchActor;

#[ractor::async_trait]
impl Actor for DispatchActor {
    type Msg = DispatchMessage;
    type State = DispatchState;
    type Arguments = DispatchArgs;

    async fn pre_start(
        &self,
        myself: ActorRef<Self::Msg>,
        args: Self::Arguments,
    ) -> Result<Self::State, ActorProcessingErr> {
        let timer = args
            .schedule
            .then(|| spawn_timer(myself, args.dispatcher.clock()));
        info!(scheduled = timer.is_some(), "Dispatcher initialized");
        Ok(DispatchState {
            dispatcher: args.dispatcher,
            timer,
        })
    }

    async fn handle(
        &self,
        _myself: ActorRef<Self::Msg>,
        message: Self::Msg,
        state: &mut Self::State,
    ) -> Result<(), ActorProcessingErr> {
        match message {
            DispatchMessage::Scheduled { date, shift } => {
                info!(%date, shift = %shift, "scheduled dispatch triggered");
                match state.dispatcher.run(date, shift).await {
                    Ok(summary) => debug_json("scheduled dispatch summary", &summary),
                    Err(e) => {
                        error!(%date, shift = %shift, error = %e, "scheduled dispatch aborted");
                    }
                }
            }
            DispatchMessage::RunNow(date, shift, reply) => {
                let _ = reply.send(state.dispatcher.run(date, shift).await);
            }
            DispatchMessage::SendReport {
                report_id,
                shift,
                recipients,
                reply,
            } => {
                let res = state.dispatcher.send_now(report_id, shift, recipients).await;
                let _ = reply.send(res);
            }
        }
        Ok(())
    }

    async fn post_stop(
        &self,
        _myself: ActorRef<Self::Msg>,
        state: &mut Self::State,
    ) -> Result<(), ActorProcessingErr> {
        if let Some(timer) = state.timer.take() {
            timer.abort();
        }
        Ok(())
    }
}

/// Next trigger to wait for. Counted from the later of `now` and the last fired trigger so
/// an early wake-up never fires the same instant twice.
fn next_wake(now: NaiveDateTime, last: Option<NaiveDateTime>) -> (NaiveDateTime, Shift) {
    let from = last.map_or(now, |l| l.max(now));
    next_trigger(from)
}

/// Sleeps until each trigger time and pokes the actor.
fn spawn_timer(myself: ActorRef<DispatchMessage>, clock: Clock) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut last: Option<NaiveDateTime> = None;
        loop {
            let now = clock.now_local();
            let (at, shift) = next_wake(now, last);
            let wait = (at - now).to_std().unwrap_or_default();
            info!(next = %at, shift = %shift, wait_secs = wait.as_secs(), "next report dispatch");
            tokio::time::sleep(wait).await;

            if myself
                .cast(DispatchMessage::Scheduled {
                    date: at.date(),
                    shift,
                })
                .is_err()
            {
                break;
            }
            last = Some(at);
        }
    })
}

pub async fn spawn(args: DispatchArgs) -> Result<DispatcherHandle, DeskError> {
    let clock = args.dispatcher.clock();
    let (actor, _jh) = Actor::spawn(None, DispatchActor, args)
        .await
        .map_err(|e| DeskError::RactorError(format!("failed to spawn Dispatcher: {e}")))?;
    Ok(DispatcherHandle { actor, clock })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(d: u32, h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, d)
            .unwrap()
            .and_hms_opt(h, m, s)
            .unwrap()
    }

    #[test]
    fn first_wake_is_the_next_trigger() {
        assert_eq!(next_wake(at(1, 10, 0, 0), None), (at(1, 15, 0, 0), Shift::First));
    }

    #[test]
    fn early_wake_does_not_refire_the_last_trigger() {
        // woke a second early for the 15:00 trigger
        let last = Some(at(1, 15, 0, 0));
        assert_eq!(
            next_wake(at(1, 14, 59, 59), last),
            (at(1, 23, 0, 0), Shift::Second)
        );
    }

    #[test]
    fn late_wake_skips_to_the_trigger_after_now() {
        let last = Some(at(1, 23, 0, 0));
        assert_eq!(next_wake(at(2, 7, 30, 0), last), (at(2, 15, 0, 0), Shift::First));
    }
}

use std::sync::{Arc, Mutex};
use std::time::Duration;

use exam_core::{Clock, ExamSession, Tick};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// Drives one-second ticks into a shared session until expiry or cancellation.
///
/// The timer holds no exam state of its own: expiry reaches submission
/// through the session's tick handling, so stopping this task late can never
/// cause a second submission — at worst a final tick finds the countdown
/// dormant and the task exits.
#[derive(Debug)]
pub struct ExamTimer {
    handle: JoinHandle<()>,
}

impl ExamTimer {
    /// Spawns the ticking task over `session`.
    #[must_use]
    pub fn spawn(session: Arc<Mutex<ExamSession>>, clock: Clock) -> Self {
        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(Duration::from_secs(1));
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            // the first interval tick resolves immediately; consume it so the
            // first decrement lands a full second after start
            interval.tick().await;

            loop {
                interval.tick().await;
                let outcome = {
                    let Ok(mut session) = session.lock() else {
                        tracing::error!("exam session lock poisoned, stopping timer");
                        return;
                    };
                    session.tick(clock.now())
                };

                match outcome {
                    Tick::Running(_) => {}
                    Tick::Expired => {
                        tracing::info!("exam time expired, session auto-submitted");
                        return;
                    }
                    Tick::Dormant => return,
                }
            }
        });
        Self { handle }
    }

    /// Stops ticking without touching the session. Idempotent.
    pub fn cancel(&self) {
        self.handle.abort();
    }

    /// True once the ticking task has exited (expiry, dormancy, or abort).
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for ExamTimer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

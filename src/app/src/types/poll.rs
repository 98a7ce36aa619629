use serde::{Deserialize, Serialize};

pub const DEFAULT_POLL_INTERVAL_MS: u64 = 5000;

/// Relay list access state shared by the poll timer and relay writes
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub enum PollState {
    #[default]
    Idle,
    Polling,
    WriteInFlight,
}

/// Serializes relay list polls against relay writes.
///
/// A poll never starts while a write is in flight. Writes are never held
/// back: only one relay can be toggled per user action. Every write bumps
/// `write_generation`; a relay list fetched under an older generation is
/// never applied.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PollCoordinator {
    state: PollState,
    write_generation: u64,
    pub status_interval_ms: u64,
    pub relay_interval_ms: u64,
    /// Set once on initialization; the shell starts both intervals when it sees it
    pub timers_started: bool,
}

impl Default for PollCoordinator {
    fn default() -> Self {
        Self {
            state: PollState::Idle,
            write_generation: 0,
            status_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            relay_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            timers_started: false,
        }
    }
}

impl PollCoordinator {
    pub fn state(&self) -> PollState {
        self.state
    }

    /// Applies the host override to both timers and marks them started
    pub fn start_timers(&mut self, interval_ms: Option<u64>) {
        if let Some(interval) = interval_ms {
            self.status_interval_ms = interval;
            self.relay_interval_ms = interval;
        }
        self.timers_started = true;
    }

    /// Called on a relay tick; `None` means the tick is skipped without a fetch.
    ///
    /// The returned write generation travels with the request and is handed
    /// back to [`PollCoordinator::finish_poll`].
    pub fn begin_poll(&mut self) -> Option<u64> {
        match self.state {
            PollState::WriteInFlight => None,
            PollState::Idle | PollState::Polling => {
                self.state = PollState::Polling;
                Some(self.write_generation)
            }
        }
    }

    /// Called when a relay list response arrives; `false` means it is stale
    pub fn finish_poll(&mut self, generation: u64) -> bool {
        if generation < self.write_generation {
            return false;
        }
        match self.state {
            PollState::Polling => {
                self.state = PollState::Idle;
                true
            }
            PollState::Idle => true,
            PollState::WriteInFlight => false,
        }
    }

    pub fn begin_write(&mut self) {
        if self.state != PollState::Idle {
            log::debug!("relay write started while {:?}", self.state);
        }
        self.state = PollState::WriteInFlight;
        self.write_generation += 1;
    }

    /// Returns to `Idle`; returns whether a relay list refresh should follow
    pub fn finish_write(&mut self, success: bool) -> bool {
        self.state = PollState::Idle;
        success
    }
}

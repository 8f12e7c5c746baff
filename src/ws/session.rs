//! Per-connection watch state.
//!
//! Every `watch` or `unwatch` bumps the session generation. Fetch results
//! are tagged with the generation that requested them and are accepted only
//! while that generation is still current, so a slow response for an older
//! watch can never replace the state of a newer one.

use chrono::{DateTime, Utc};

use super::messages::{ServerEvent, ViewKind};
use crate::domain::TimeRemaining;

/// What a connection is currently watching.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchTarget {
    /// Page kind.
    pub view: ViewKind,
    /// Fundraising address or proposal id.
    pub id: String,
}

/// Watch state owned by a single WebSocket connection.
#[derive(Debug, Default)]
pub struct ViewSession {
    generation: u64,
    target: Option<WatchTarget>,
    /// `Some` once data for the current generation has arrived.
    deadline: Option<Option<DateTime<Utc>>>,
}

impl ViewSession {
    /// Creates an idle session.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current generation.
    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    /// Current target, if any.
    #[must_use]
    pub const fn target(&self) -> Option<&WatchTarget> {
        self.target.as_ref()
    }

    /// Starts a new watch and returns its generation. Countdown ticks pause
    /// until [`Self::accept`] delivers the new data.
    pub fn watch(&mut self, target: WatchTarget) -> u64 {
        self.generation += 1;
        self.target = Some(target);
        self.deadline = None;
        self.generation
    }

    /// Stops watching. Results still in flight become stale.
    pub fn unwatch(&mut self) {
        self.generation += 1;
        self.target = None;
        self.deadline = None;
    }

    /// Returns `true` if `generation` is the current one.
    #[must_use]
    pub const fn is_current(&self, generation: u64) -> bool {
        self.target.is_some() && generation == self.generation
    }

    /// Records fetched data for `generation`. Returns `false` and leaves the
    /// session untouched when the result is stale.
    pub fn accept(&mut self, generation: u64, deadline: Option<DateTime<Utc>>) -> bool {
        if !self.is_current(generation) {
            return false;
        }
        self.deadline = Some(deadline);
        true
    }

    /// Records a failed fetch for `generation`: the watch ends. Returns
    /// `false` when the failure is stale.
    pub fn fail(&mut self, generation: u64) -> bool {
        if !self.is_current(generation) {
            return false;
        }
        self.target = None;
        self.deadline = None;
        true
    }

    /// Countdown event for `now`, or `None` while nothing is loaded.
    #[must_use]
    pub fn countdown(&self, now: DateTime<Utc>) -> Option<ServerEvent> {
        let target = self.target.as_ref()?;
        let deadline = self.deadline?;
        let time_remaining = TimeRemaining::until(deadline, now);
        Some(ServerEvent::Countdown {
            generation: self.generation,
            view: target.view,
            id: target.id.clone(),
            time_remaining,
            display: time_remaining.to_string(),
        })
    }
}

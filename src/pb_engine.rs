//! Discrete-event engine: ordered event queue plus the virtual clock.
//!
//! The scenario driver only needs two things from this module: schedule an
//! event at a virtual time, and drain the queue in order until it is empty.
//! Execution of the drained events happens elsewhere (see `pb_probe`).

use crate::pb_interface::{EndpointIndex, ScenarioError, SessionId, VirtualTime};
use std::cmp::Ordering;
use std::collections::BTreeMap;

// ============================================================================
// Events
// ============================================================================

/// Everything that can sit in the event queue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimEvent {
    /// Kick off a registered probe session.
    StartSession { session: SessionId },

    /// An echo request leaves the session's source endpoint.
    EchoRequest { session: SessionId, seq: u32 },

    /// The matching echo reply arrives back at the source endpoint.
    EchoReply {
        session: SessionId,
        seq: u32,
        sent_at: VirtualTime,
    },
}

/// Key for ordering events in the queue.
///
/// Events are ordered by virtual time first, then by endpoint index, then
/// by a FIFO sequence number. Endpoint and sequence only break ties between
/// events sharing a timestamp, so the whole run is deterministic for a
/// fixed scenario.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventKey {
    pub time: VirtualTime,
    pub endpoint: EndpointIndex,
    pub sequence: u64,
}

impl Ord for EventKey {
    fn cmp(&self, other: &Self) -> Ordering {
        match self.time.cmp(&other.time) {
            Ordering::Equal => {}
            ord => return ord,
        }

        match self.endpoint.cmp(&other.endpoint) {
            Ordering::Equal => {}
            ord => return ord,
        }

        self.sequence.cmp(&other.sequence)
    }
}

impl PartialOrd for EventKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

// ============================================================================
// Event queue
// ============================================================================

/// Single-threaded event queue with a monotonic virtual clock.
///
/// `now` is the timestamp of the most recently popped event; scheduling
/// into the past is an engine failure (it would break the non-decreasing
/// execution order every consumer relies on).
#[derive(Debug, Default)]
pub struct EventQueue {
    events: BTreeMap<EventKey, SimEvent>,
    now: VirtualTime,
    next_sequence: u64,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current virtual time.
    pub fn now(&self) -> VirtualTime {
        self.now
    }

    /// Number of events still outstanding.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Register `event` for `endpoint` at virtual time `time`.
    pub fn schedule(
        &mut self,
        time: VirtualTime,
        endpoint: EndpointIndex,
        event: SimEvent,
    ) -> Result<(), ScenarioError> {
        if time < self.now {
            return Err(ScenarioError::Engine(format!(
                "event scheduled at {:?} but virtual clock is already at {:?}",
                time, self.now
            )));
        }

        let key = EventKey {
            time,
            endpoint,
            sequence: self.next_sequence,
        };
        self.next_sequence += 1;
        self.events.insert(key, event);
        Ok(())
    }

    /// Remove and return the next event in virtual-time order, advancing
    /// the clock to its timestamp. `None` once the queue is drained.
    pub fn pop_next(&mut self) -> Option<(EventKey, SimEvent)> {
        let (key, event) = self.events.pop_first()?;
        self.now = key.time;
        Some((key, event))
    }
}

//! In-process echo workload.
//!
//! Each probe session is a lightweight ping client driven entirely by
//! queue events: a start event emits request 0, every request schedules
//! its reply one segment round-trip later and the next request one probe
//! interval later, and replies accumulate RTT at the source endpoint.

use crate::pb_address::EndpointAddressMap;
use crate::pb_engine::{EventQueue, SimEvent};
use crate::pb_interface::{
    ProbeSessionSpec, ScenarioError, SessionId, VirtualTime, PROBE_INTERVAL,
};
use crate::pb_segment::CsmaSegment;
use log::trace;
use std::time::Duration;

/// Runtime state of one probe session.
#[derive(Debug)]
pub struct EchoSession {
    pub spec: ProbeSessionSpec,
    pub requests_sent: u32,
    pub replies_received: u32,
    pub total_rtt: VirtualTime,
}

impl EchoSession {
    fn new(spec: ProbeSessionSpec) -> Self {
        Self {
            spec,
            requests_sent: 0,
            replies_received: 0,
            total_rtt: Duration::ZERO,
        }
    }
}

/// Executes queue events against the per-session echo state.
#[derive(Debug)]
pub struct EchoDriver {
    sessions: Vec<EchoSession>,
}

impl EchoDriver {
    pub fn new(specs: Vec<ProbeSessionSpec>) -> Self {
        Self {
            sessions: specs.into_iter().map(EchoSession::new).collect(),
        }
    }

    pub fn sessions(&self) -> &[EchoSession] {
        &self.sessions
    }

    pub fn into_sessions(self) -> Vec<EchoSession> {
        self.sessions
    }

    fn session_mut(&mut self, session: SessionId) -> Result<&mut EchoSession, ScenarioError> {
        self.sessions
            .get_mut(session)
            .ok_or_else(|| ScenarioError::Engine(format!("unknown session id {}", session)))
    }

    /// Execute one popped event, scheduling any follow-up events.
    pub fn handle(
        &mut self,
        event: SimEvent,
        addresses: &EndpointAddressMap,
        segment: &CsmaSegment,
        queue: &mut EventQueue,
    ) -> Result<(), ScenarioError> {
        match event {
            SimEvent::StartSession { session } => {
                let now = queue.now();
                let source = self.session_mut(session)?.spec.source;
                trace!("session {} starting on endpoint {}", session, source);
                queue.schedule(now, source, SimEvent::EchoRequest { session, seq: 0 })?;
            }

            SimEvent::EchoRequest { session, seq } => {
                let now = queue.now();
                let round_trip = segment.round_trip();
                let state = self.session_mut(session)?;
                let spec = state.spec.clone();

                // addresses come from the same map the selector drew from,
                // so resolution cannot fail on a well-formed scenario
                if addresses.endpoint_for(spec.target).is_none() {
                    return Err(ScenarioError::Engine(format!(
                        "target {} is not assigned on this segment",
                        spec.target
                    )));
                }

                state.requests_sent += 1;
                trace!(
                    "endpoint {} -> {}: request {}/{} ({} bytes)",
                    spec.source,
                    spec.target,
                    seq + 1,
                    spec.count,
                    spec.payload_bytes
                );

                queue.schedule(
                    now + round_trip,
                    spec.source,
                    SimEvent::EchoReply {
                        session,
                        seq,
                        sent_at: now,
                    },
                )?;

                if seq + 1 < spec.count {
                    let next = now + PROBE_INTERVAL;
                    let past_stop = spec.stop.map(|stop| next > stop).unwrap_or(false);
                    if !past_stop {
                        queue.schedule(
                            next,
                            spec.source,
                            SimEvent::EchoRequest {
                                session,
                                seq: seq + 1,
                            },
                        )?;
                    }
                }
            }

            SimEvent::EchoReply { session, seq, sent_at } => {
                let now = queue.now();
                let state = self.session_mut(session)?;
                state.replies_received += 1;
                state.total_rtt += now - sent_at;
                trace!(
                    "endpoint {} <- {}: reply {} (rtt {:?})",
                    state.spec.source,
                    state.spec.target,
                    seq + 1,
                    now - sent_at
                );
            }
        }

        Ok(())
    }
}

//! Scenario driver: construction phases plus the run loop.
//!
//! A scenario moves through strictly sequential phases: topology, address
//! assignment, session scheduling, run, teardown. Each phase consumes the
//! previous phase's output, so nothing can execute out of order, and every
//! construction error aborts before the first event is ever popped.

use crate::pb_address::{assign_addresses, AddressBlock};
use crate::pb_engine::EventQueue;
use crate::pb_interface::{ProbeSessionSpec, ScenarioError, VirtualTime};
use crate::pb_probe::EchoDriver;
use crate::pb_scheduler::{schedule_sessions, ProbeParams};
use crate::pb_selector::PeerSelector;
use crate::pb_topology::build_topology;
use log::{debug, info};
use rand::Rng;
use std::net::Ipv4Addr;
use std::time::Duration;

/// The one flat LAN every scenario runs on.
pub const SCENARIO_BLOCK: AddressBlock = AddressBlock::new(Ipv4Addr::new(10, 0, 0, 0), 24);

// ============================================================================
// Configuration
// ============================================================================

/// Scenario input parameters. Owned by the caller, read-only here.
#[derive(Debug, Clone)]
pub struct ScenarioConfig {
    /// Endpoint count N.
    pub nodes: u32,

    /// Probe sessions per endpoint A.
    pub apps: u32,

    /// Explicit seed for the peer selector. `None` draws a fresh seed
    /// from OS entropy, so reruns differ unless a seed is pinned.
    pub seed: Option<[u8; 32]>,

    /// Probe parameters applied to every session.
    pub probe: ProbeParams,

    /// One-way propagation delay of the shared segment.
    pub segment_delay: VirtualTime,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            nodes: 1,
            apps: 1,
            seed: None,
            probe: ProbeParams::default(),
            segment_delay: Duration::ZERO,
        }
    }
}

// ============================================================================
// Report
// ============================================================================

/// Outcome of a completed scenario.
#[derive(Debug)]
pub struct ScenarioReport {
    pub endpoints: u32,
    pub session_specs: Vec<ProbeSessionSpec>,
    pub requests_sent: u64,
    pub replies_received: u64,
    pub total_rtt: VirtualTime,
    pub events_processed: u64,
    pub final_time: VirtualTime,
    pub seed_used: [u8; 32],
}

impl ScenarioReport {
    pub fn num_sessions(&self) -> usize {
        self.session_specs.len()
    }

    pub fn mean_rtt(&self) -> Option<VirtualTime> {
        if self.replies_received == 0 {
            return None;
        }
        Some(self.total_rtt / self.replies_received as u32)
    }

    pub fn print_summary(&self) {
        info!("scenario complete at virtual time {:?}", self.final_time);
        info!(
            "  endpoints: {}  sessions: {}  events: {}",
            self.endpoints,
            self.num_sessions(),
            self.events_processed
        );
        info!(
            "  requests sent: {}  replies received: {}",
            self.requests_sent, self.replies_received
        );
        if let Some(rtt) = self.mean_rtt() {
            info!("  mean rtt: {:?}", rtt);
        }
    }
}

// ============================================================================
// Scenario
// ============================================================================

/// One benchmark scenario, from construction through teardown.
#[derive(Debug)]
pub struct Scenario {
    config: ScenarioConfig,
}

impl Scenario {
    pub fn new(config: ScenarioConfig) -> Self {
        Self { config }
    }

    /// Build the scenario and drive it to completion.
    ///
    /// All resources (topology, sessions, queue) are dropped before
    /// returning; the report is the only thing that survives the run.
    pub fn run(self) -> Result<ScenarioReport, ScenarioError> {
        let seed = self.config.seed.unwrap_or_else(|| {
            let mut seed = [0u8; 32];
            rand::thread_rng().fill(&mut seed);
            seed
        });

        // 1. topology
        let topology = build_topology(self.config.nodes, self.config.segment_delay)?;

        // 2. addresses
        let addresses = assign_addresses(&topology, &SCENARIO_BLOCK)?;

        // 3. peer selection + session scheduling
        let mut selector = PeerSelector::new(seed);
        let mut queue = EventQueue::new();
        let specs = schedule_sessions(
            &topology,
            &addresses,
            &mut selector,
            self.config.apps,
            &self.config.probe,
            &mut queue,
        )?;
        let session_specs = specs.clone();

        info!(
            "scenario ready: {} endpoints, {} sessions, seed {:02x?}",
            topology.len(),
            specs.len(),
            &seed[..4]
        );

        // 4. run until the queue is idle
        let mut driver = EchoDriver::new(specs);
        let mut events_processed = 0u64;
        while let Some((_, event)) = queue.pop_next() {
            driver.handle(event, &addresses, topology.segment(), &mut queue)?;
            events_processed += 1;
        }
        debug!("queue drained after {} events", events_processed);

        // 5. teardown: fold session state into the report, drop the rest
        let mut requests_sent = 0u64;
        let mut replies_received = 0u64;
        let mut total_rtt = Duration::ZERO;
        for session in driver.into_sessions() {
            requests_sent += u64::from(session.requests_sent);
            replies_received += u64::from(session.replies_received);
            total_rtt += session.total_rtt;
        }

        Ok(ScenarioReport {
            endpoints: self.config.nodes,
            session_specs,
            requests_sent,
            replies_received,
            total_rtt,
            events_processed,
            final_time: queue.now(),
            seed_used: seed,
        })
    }
}

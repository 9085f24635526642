//! Session scheduler: one probe session per (endpoint, probe-index) pair.

use crate::pb_address::EndpointAddressMap;
use crate::pb_engine::{EventQueue, SimEvent};
use crate::pb_interface::{
    ProbeSessionSpec, ScenarioError, VirtualTime, PROBE_COUNT, PROBE_PAYLOAD_BYTES,
    SESSION_START_OFFSET,
};
use crate::pb_selector::PeerSelector;
use crate::pb_topology::Topology;
use log::debug;

/// Probe parameters shared by every session of a scenario.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbeParams {
    /// Echo exchanges per session.
    pub count: u32,

    /// Echo payload size in bytes.
    pub payload_bytes: usize,

    /// Session start time, relative to the scenario epoch.
    pub start: VirtualTime,

    /// Optional cutoff after which no further requests are sent.
    pub stop: Option<VirtualTime>,
}

impl Default for ProbeParams {
    fn default() -> Self {
        Self {
            count: PROBE_COUNT,
            payload_bytes: PROBE_PAYLOAD_BYTES,
            start: SESSION_START_OFFSET,
            stop: None,
        }
    }
}

/// Build and register every probe session.
///
/// Iterates endpoints in creation order and probe indices in ascending
/// order; that pair ordering is also the registration order, which breaks
/// ties between sessions sharing the same start time. Sessions are
/// independent of each other, so construction has no side effects beyond
/// queue registration.
pub fn schedule_sessions(
    topology: &Topology,
    addresses: &EndpointAddressMap,
    selector: &mut PeerSelector,
    apps_per_endpoint: u32,
    params: &ProbeParams,
    queue: &mut EventQueue,
) -> Result<Vec<ProbeSessionSpec>, ScenarioError> {
    if apps_per_endpoint == 0 {
        return Err(ScenarioError::NoProbeSessions);
    }

    let mut specs = Vec::with_capacity(topology.len() * apps_per_endpoint as usize);
    for endpoint in topology.endpoints() {
        for probe_index in 0..apps_per_endpoint {
            let target = selector.pick_target(addresses)?;
            let spec = ProbeSessionSpec {
                source: endpoint.index,
                target,
                count: params.count,
                payload_bytes: params.payload_bytes,
                start: params.start,
                stop: params.stop,
            };

            debug!(
                "session {}/{} on endpoint {}: target {}",
                probe_index + 1,
                apps_per_endpoint,
                endpoint.index,
                target
            );

            let session = specs.len();
            queue.schedule(spec.start, spec.source, SimEvent::StartSession { session })?;
            specs.push(spec);
        }
    }

    Ok(specs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pb_address::{assign_addresses, AddressBlock};
    use crate::pb_topology::build_topology;
    use std::net::Ipv4Addr;
    use std::time::Duration;

    fn fixture(n: u32) -> (Topology, EndpointAddressMap) {
        let topology = build_topology(n, Duration::ZERO).unwrap();
        let block = AddressBlock::new(Ipv4Addr::new(10, 0, 0, 0), 24);
        let addresses = assign_addresses(&topology, &block).unwrap();
        (topology, addresses)
    }

    #[test]
    fn produces_one_spec_per_endpoint_and_probe_index() {
        let (topology, addresses) = fixture(5);
        let mut selector = PeerSelector::new([1u8; 32]);
        let mut queue = EventQueue::new();

        let specs = schedule_sessions(
            &topology,
            &addresses,
            &mut selector,
            3,
            &ProbeParams::default(),
            &mut queue,
        )
        .unwrap();

        assert_eq!(specs.len(), 15);
        assert_eq!(queue.len(), 15);

        // registration order: endpoint ascending, probe index ascending
        let sources: Vec<_> = specs.iter().map(|s| s.source).collect();
        assert_eq!(sources, vec![0, 0, 0, 1, 1, 1, 2, 2, 2, 3, 3, 3, 4, 4, 4]);
    }

    #[test]
    fn specs_carry_the_reference_probe_parameters() {
        let (topology, addresses) = fixture(2);
        let mut selector = PeerSelector::new([2u8; 32]);
        let mut queue = EventQueue::new();

        let specs = schedule_sessions(
            &topology,
            &addresses,
            &mut selector,
            1,
            &ProbeParams::default(),
            &mut queue,
        )
        .unwrap();

        for spec in &specs {
            assert_eq!(spec.count, 20);
            assert_eq!(spec.payload_bytes, 1000);
            assert_eq!(spec.start, Duration::from_secs(1));
            assert_eq!(spec.stop, None);
        }
    }

    #[test]
    fn start_events_pop_in_registration_order() {
        let (topology, addresses) = fixture(3);
        let mut selector = PeerSelector::new([3u8; 32]);
        let mut queue = EventQueue::new();

        schedule_sessions(
            &topology,
            &addresses,
            &mut selector,
            2,
            &ProbeParams::default(),
            &mut queue,
        )
        .unwrap();

        let mut sessions = Vec::new();
        while let Some((_, SimEvent::StartSession { session })) = queue.pop_next() {
            sessions.push(session);
        }
        assert_eq!(sessions, vec![0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn self_targeting_session_is_accepted() {
        let (topology, addresses) = fixture(1);
        let mut selector = PeerSelector::new([0u8; 32]);
        let mut queue = EventQueue::new();

        let specs = schedule_sessions(
            &topology,
            &addresses,
            &mut selector,
            1,
            &ProbeParams::default(),
            &mut queue,
        )
        .unwrap();

        assert_eq!(specs.len(), 1);
        assert_eq!(specs[0].source, 0);
        assert_eq!(specs[0].target, addresses.address_of(0).unwrap());
    }

    #[test]
    fn zero_apps_is_a_configuration_error() {
        let (topology, addresses) = fixture(2);
        let mut selector = PeerSelector::new([0u8; 32]);
        let mut queue = EventQueue::new();

        let err = schedule_sessions(
            &topology,
            &addresses,
            &mut selector,
            0,
            &ProbeParams::default(),
            &mut queue,
        )
        .unwrap_err();

        assert_eq!(err, ScenarioError::NoProbeSessions);
        assert!(queue.is_empty());
    }
}

//! Topology builder: N endpoints on one shared segment.

use crate::pb_interface::{AttachmentId, EndpointIndex, ScenarioError, VirtualTime};
use crate::pb_segment::CsmaSegment;
use log::debug;

/// One simulated host. Lives for the whole scenario.
#[derive(Debug, Clone, Copy)]
pub struct Endpoint {
    pub index: EndpointIndex,
    pub attachment: AttachmentId,
}

/// The assembled network: every endpoint attached to the one segment,
/// in creation order.
#[derive(Debug)]
pub struct Topology {
    segment: CsmaSegment,
    endpoints: Vec<Endpoint>,
}

impl Topology {
    pub fn segment(&self) -> &CsmaSegment {
        &self.segment
    }

    /// Endpoints in creation order.
    pub fn endpoints(&self) -> &[Endpoint] {
        &self.endpoints
    }

    pub fn len(&self) -> usize {
        self.endpoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.endpoints.is_empty()
    }
}

/// Create `num_endpoints` endpoints attached to a fresh shared segment
/// with the given propagation delay.
pub fn build_topology(
    num_endpoints: u32,
    segment_delay: VirtualTime,
) -> Result<Topology, ScenarioError> {
    if num_endpoints == 0 {
        return Err(ScenarioError::NoEndpoints);
    }

    let mut segment = CsmaSegment::new(segment_delay);
    let endpoints = (0..num_endpoints)
        .map(|index| {
            let attachment = segment.attach(index);
            Endpoint { index, attachment }
        })
        .collect::<Vec<_>>();

    debug!(
        "topology ready: {} endpoints on one segment (delay {:?})",
        endpoints.len(),
        segment_delay
    );

    Ok(Topology { segment, endpoints })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn builds_endpoints_in_creation_order() {
        let topology = build_topology(4, Duration::ZERO).unwrap();
        assert_eq!(topology.len(), 4);
        assert_eq!(topology.segment().num_attached(), 4);
        for (i, endpoint) in topology.endpoints().iter().enumerate() {
            assert_eq!(endpoint.index as usize, i);
            assert_eq!(endpoint.attachment, i);
        }
    }

    #[test]
    fn single_endpoint_is_valid() {
        let topology = build_topology(1, Duration::ZERO).unwrap();
        assert_eq!(topology.len(), 1);
    }

    #[test]
    fn zero_endpoints_is_a_configuration_error() {
        let err = build_topology(0, Duration::ZERO).unwrap_err();
        assert_eq!(err, ScenarioError::NoEndpoints);
        assert!(err.is_configuration());
    }
}

//! Peer selector: picks a probe target among the assigned addresses.

use crate::pb_address::EndpointAddressMap;
use crate::pb_interface::ScenarioError;
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use std::net::Ipv4Addr;

/// Pseudo-random target selection over the endpoint address map.
///
/// The generator is seeded exactly once, at scenario construction, and is
/// never reseeded mid-scenario. Two quirks of the reference benchmark are
/// kept on purpose:
///
/// - the draw is `next_u32() % N`, which is NOT uniform over `[0, N)`
///   whenever `2^32` is not a multiple of `N`;
/// - self-selection is not excluded, so an endpoint may end up probing
///   its own address.
#[derive(Debug)]
pub struct PeerSelector {
    rng: StdRng,
}

impl PeerSelector {
    pub fn new(seed: [u8; 32]) -> Self {
        Self {
            rng: StdRng::from_seed(seed),
        }
    }

    /// Draw one target address. Always succeeds for a non-empty map.
    pub fn pick_target(&mut self, addresses: &EndpointAddressMap) -> Result<Ipv4Addr, ScenarioError> {
        if addresses.is_empty() {
            // cannot happen after topology construction; guard anyway
            return Err(ScenarioError::NoEndpoints);
        }

        let r = self.rng.next_u32() as usize % addresses.len();
        addresses
            .at_index(r)
            .ok_or_else(|| ScenarioError::Engine(format!("selection index {} out of range", r)))
    }
}

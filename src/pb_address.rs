//! Address block and the address assigner.
//!
//! Assignment is deliberately free of randomness: endpoints receive the
//! block's usable addresses in creation order, so the mapping is identical
//! for every run with the same endpoint count and block. Peer selection
//! reproducibility depends on this.

use crate::pb_interface::{EndpointIndex, ScenarioError};
use crate::pb_topology::Topology;
use hashbrown::HashMap;
use indexmap::IndexMap;
use log::debug;
use std::net::Ipv4Addr;

// ============================================================================
// Address block
// ============================================================================

/// A contiguous IPv4 allocation pool, e.g. `10.0.0.0/24`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AddressBlock {
    base: Ipv4Addr,
    prefix: u8,
}

impl AddressBlock {
    pub const fn new(base: Ipv4Addr, prefix: u8) -> Self {
        Self { base, prefix }
    }

    pub fn base(&self) -> Ipv4Addr {
        self.base
    }

    pub fn prefix(&self) -> u8 {
        self.prefix
    }

    /// Number of assignable host addresses. The all-zeros host (network
    /// address) and all-ones host (broadcast) are excluded.
    pub fn capacity(&self) -> usize {
        let host_bits = 32 - u32::from(self.prefix.min(32));
        if host_bits < 2 {
            return 0;
        }
        ((1u64 << host_bits) - 2) as usize
    }

    /// Usable host addresses in ascending order, starting at base + 1.
    pub fn usable_hosts(&self) -> impl Iterator<Item = Ipv4Addr> {
        let network = u32::from(self.base);
        (1..=self.capacity() as u32).map(move |offset| Ipv4Addr::from(network + offset))
    }

    /// True if `addr` falls inside the block's usable host range.
    pub fn contains(&self, addr: Ipv4Addr) -> bool {
        let offset = u32::from(addr).wrapping_sub(u32::from(self.base)) as u64;
        offset >= 1 && offset <= self.capacity() as u64
    }
}

// ============================================================================
// Endpoint address map
// ============================================================================

/// Immutable endpoint → address mapping, ordered by assignment.
///
/// Addressable three ways: by endpoint index, by assignment order (the two
/// coincide since assignment follows creation order) and in reverse by
/// address, which is what routes an echo request to its target endpoint.
#[derive(Debug)]
pub struct EndpointAddressMap {
    by_endpoint: IndexMap<EndpointIndex, Ipv4Addr>,
    by_address: HashMap<Ipv4Addr, EndpointIndex>,
}

impl EndpointAddressMap {
    pub fn len(&self) -> usize {
        self.by_endpoint.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_endpoint.is_empty()
    }

    pub fn address_of(&self, endpoint: EndpointIndex) -> Option<Ipv4Addr> {
        self.by_endpoint.get(&endpoint).copied()
    }

    /// Address at assignment position `index`.
    pub fn at_index(&self, index: usize) -> Option<Ipv4Addr> {
        self.by_endpoint.get_index(index).map(|(_, addr)| *addr)
    }

    /// Endpoint owning `addr`, if it was assigned from this map.
    pub fn endpoint_for(&self, addr: Ipv4Addr) -> Option<EndpointIndex> {
        self.by_address.get(&addr).copied()
    }

    /// (endpoint, address) pairs in assignment order.
    pub fn iter(&self) -> impl Iterator<Item = (EndpointIndex, Ipv4Addr)> + '_ {
        self.by_endpoint.iter().map(|(e, a)| (*e, *a))
    }
}

/// Assign one address from `block` to every endpoint, in creation order.
pub fn assign_addresses(
    topology: &Topology,
    block: &AddressBlock,
) -> Result<EndpointAddressMap, ScenarioError> {
    let required = topology.len();
    let usable = block.capacity();
    if usable < required {
        return Err(ScenarioError::BlockTooSmall { usable, required });
    }

    let mut by_endpoint = IndexMap::with_capacity(required);
    let mut by_address = HashMap::with_capacity(required);
    for (endpoint, addr) in topology.endpoints().iter().zip(block.usable_hosts()) {
        by_endpoint.insert(endpoint.index, addr);
        by_address.insert(addr, endpoint.index);
    }

    debug!(
        "assigned {} addresses from {}/{}",
        by_endpoint.len(),
        block.base(),
        block.prefix()
    );

    Ok(EndpointAddressMap {
        by_endpoint,
        by_address,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pb_topology::build_topology;
    use std::collections::HashSet;
    use std::time::Duration;

    fn block() -> AddressBlock {
        AddressBlock::new(Ipv4Addr::new(10, 0, 0, 0), 24)
    }

    #[test]
    fn slash_24_has_254_usable_hosts() {
        assert_eq!(block().capacity(), 254);
        let hosts: Vec<_> = block().usable_hosts().collect();
        assert_eq!(hosts.first().copied(), Some(Ipv4Addr::new(10, 0, 0, 1)));
        assert_eq!(hosts.last().copied(), Some(Ipv4Addr::new(10, 0, 0, 254)));
    }

    #[test]
    fn tiny_prefixes_have_no_usable_hosts() {
        assert_eq!(AddressBlock::new(Ipv4Addr::new(10, 0, 0, 0), 31).capacity(), 0);
        assert_eq!(AddressBlock::new(Ipv4Addr::new(10, 0, 0, 0), 32).capacity(), 0);
    }

    #[test]
    fn all_addresses_distinct_and_in_block() {
        for n in [1u32, 2, 7, 100, 254] {
            let topology = build_topology(n, Duration::ZERO).unwrap();
            let map = assign_addresses(&topology, &block()).unwrap();
            assert_eq!(map.len(), n as usize);

            let distinct: HashSet<_> = map.iter().map(|(_, a)| a).collect();
            assert_eq!(distinct.len(), n as usize);
            assert!(distinct.iter().all(|a| block().contains(*a)));
        }
    }

    #[test]
    fn assignment_follows_creation_order() {
        let topology = build_topology(4, Duration::ZERO).unwrap();
        let map = assign_addresses(&topology, &block()).unwrap();
        for i in 0..4u32 {
            let expected = Ipv4Addr::new(10, 0, 0, (i + 1) as u8);
            assert_eq!(map.address_of(i), Some(expected));
            assert_eq!(map.at_index(i as usize), Some(expected));
            assert_eq!(map.endpoint_for(expected), Some(i));
        }
    }

    #[test]
    fn assignment_is_reproducible() {
        let a = assign_addresses(&build_topology(10, Duration::ZERO).unwrap(), &block()).unwrap();
        let b = assign_addresses(&build_topology(10, Duration::ZERO).unwrap(), &block()).unwrap();
        assert!(a.iter().eq(b.iter()));
    }

    #[test]
    fn exhausted_block_is_rejected() {
        let topology = build_topology(255, Duration::ZERO).unwrap();
        let err = assign_addresses(&topology, &block()).unwrap_err();
        assert_eq!(
            err,
            ScenarioError::BlockTooSmall {
                usable: 254,
                required: 255
            }
        );
        assert!(err.is_configuration());
    }

    #[test]
    fn unassigned_addresses_resolve_to_nothing() {
        let topology = build_topology(2, Duration::ZERO).unwrap();
        let map = assign_addresses(&topology, &block()).unwrap();
        assert_eq!(map.endpoint_for(Ipv4Addr::new(10, 0, 0, 200)), None);
    }
}

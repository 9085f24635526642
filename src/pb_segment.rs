//! Shared broadcast segment all endpoints attach to (one flat LAN).

use crate::pb_interface::{AttachmentId, EndpointIndex, VirtualTime};

/// A single shared-medium segment with a fixed propagation delay.
///
/// The segment does not model bandwidth, contention or loss; every
/// traversal costs exactly `delay`, regardless of payload size.
#[derive(Debug)]
pub struct CsmaSegment {
    delay: VirtualTime,
    attachments: Vec<EndpointIndex>,
}

impl CsmaSegment {
    pub fn new(delay: VirtualTime) -> Self {
        Self {
            delay,
            attachments: Vec::new(),
        }
    }

    /// Attach an endpoint to the segment, returning its attachment handle.
    pub fn attach(&mut self, endpoint: EndpointIndex) -> AttachmentId {
        let id = self.attachments.len();
        self.attachments.push(endpoint);
        id
    }

    pub fn num_attached(&self) -> usize {
        self.attachments.len()
    }

    /// One-way propagation delay.
    pub fn delay(&self) -> VirtualTime {
        self.delay
    }

    /// Request plus reply traversal time for an echo exchange.
    pub fn round_trip(&self) -> VirtualTime {
        self.delay + self.delay
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn attachments_get_sequential_handles() {
        let mut segment = CsmaSegment::new(Duration::ZERO);
        assert_eq!(segment.attach(0), 0);
        assert_eq!(segment.attach(1), 1);
        assert_eq!(segment.attach(2), 2);
        assert_eq!(segment.num_attached(), 3);
    }

    #[test]
    fn round_trip_is_twice_the_delay() {
        let segment = CsmaSegment::new(Duration::from_micros(50));
        assert_eq!(segment.round_trip(), Duration::from_micros(100));
    }
}

use std::fmt;
use std::net::Ipv4Addr;
use std::time::Duration;

// all indices are plain integers to keep scenario bookkeeping cheap
pub type EndpointIndex = u32;
pub type AttachmentId = usize;
pub type SessionId = usize;

/// The simulation engine's logical clock. Distinct from wall-clock time:
/// it only advances when the event queue executes an event.
pub type VirtualTime = Duration;

// ============================================================================
// Probe defaults
// ============================================================================

/// Echo exchanges per probe session (`ping -c 20`).
pub const PROBE_COUNT: u32 = 20;

/// Payload bytes per echo request (`ping -s 1000`).
pub const PROBE_PAYLOAD_BYTES: usize = 1000;

/// Spacing between consecutive echo requests within one session.
pub const PROBE_INTERVAL: VirtualTime = Duration::from_secs(1);

/// Sessions start this long after the scenario epoch.
pub const SESSION_START_OFFSET: VirtualTime = Duration::from_secs(1);

// ============================================================================
// Probe session descriptor
// ============================================================================

/// Fully-specified descriptor of one scheduled probe session.
///
/// Built by the session scheduler, registered once with the event queue,
/// never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeSessionSpec {
    /// Endpoint the probes originate from.
    pub source: EndpointIndex,

    /// Address the probes are directed at. May resolve back to `source`
    /// (self-ping is allowed, see the peer selector).
    pub target: Ipv4Addr,

    /// Number of echo exchanges to run.
    pub count: u32,

    /// Echo payload size in bytes.
    pub payload_bytes: usize,

    /// Virtual time the session starts at.
    pub start: VirtualTime,

    /// Optional virtual time after which no further requests are sent.
    /// `None` means the session runs all `count` exchanges.
    pub stop: Option<VirtualTime>,
}

// ============================================================================
// Errors
// ============================================================================

/// Errors a scenario run can surface.
///
/// Configuration errors are detected during construction, before any
/// virtual time advances. `Engine` is the only failure the run phase
/// itself can report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScenarioError {
    /// Topology requested with zero endpoints
    NoEndpoints,

    /// Zero probe sessions per endpoint requested
    NoProbeSessions,

    /// Address block has fewer usable host addresses than endpoints
    BlockTooSmall { usable: usize, required: usize },

    /// Unrecoverable internal failure of the simulation engine
    Engine(String),
}

impl ScenarioError {
    /// True for errors caused by an invalid `ScenarioConfig` (as opposed
    /// to an engine failure at run time).
    pub fn is_configuration(&self) -> bool {
        !matches!(self, Self::Engine(_))
    }
}

impl fmt::Display for ScenarioError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoEndpoints => write!(f, "scenario requires at least one endpoint"),
            Self::NoProbeSessions => {
                write!(f, "scenario requires at least one probe session per endpoint")
            }
            Self::BlockTooSmall { usable, required } => write!(
                f,
                "address block has {} usable addresses but {} endpoints need one each",
                usable, required
            ),
            Self::Engine(reason) => write!(f, "simulation engine failure: {}", reason),
        }
    }
}

impl std::error::Error for ScenarioError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn configuration_errors_are_classified() {
        assert!(ScenarioError::NoEndpoints.is_configuration());
        assert!(ScenarioError::NoProbeSessions.is_configuration());
        assert!(ScenarioError::BlockTooSmall { usable: 2, required: 5 }.is_configuration());
        assert!(!ScenarioError::Engine("clock moved backwards".into()).is_configuration());
    }
}

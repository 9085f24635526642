//! # pingbench - LAN ping benchmark scenario driver
//!
//! Builds a benchmark scenario of N simulated hosts on one shared
//! broadcast segment, gives each host a unique address from a contiguous
//! block, schedules A ping-style probe sessions per host against
//! pseudo-randomly chosen peers, and drives a virtual clock until all
//! scheduled work completes.
//!
//! ## Core Components
//!
//! - **Topology Builder** (`pb_topology`): N endpoints on one segment
//! - **Address Assigner** (`pb_address`): deterministic, creation-order
//!   address assignment from a contiguous block
//! - **Peer Selector** (`pb_selector`): seeded-once pseudo-random target
//!   draw (non-uniform modulo, self-selection allowed, both on purpose)
//! - **Session Scheduler** (`pb_scheduler`): one probe session per
//!   (endpoint, probe-index) pair, registered in a fixed order
//! - **Run Driver** (`pb_scenario`): run-until-idle and teardown
//!
//! The discrete-event engine (`pb_engine`), the segment model
//! (`pb_segment`) and the in-process echo workload (`pb_probe`) are
//! deliberately minimal collaborators behind narrow interfaces; the
//! scenario construction logic never reaches past them.
//!
//! ## Usage
//!
//! ```
//! use pingbench::{Scenario, ScenarioConfig};
//!
//! let config = ScenarioConfig {
//!     nodes: 4,
//!     apps: 1,
//!     seed: Some([42u8; 32]),
//!     ..Default::default()
//! };
//!
//! let report = Scenario::new(config).run().unwrap();
//! assert_eq!(report.num_sessions(), 4);
//! ```

pub mod pb_address;
pub mod pb_engine;
pub mod pb_interface;
pub mod pb_probe;
pub mod pb_scenario;
pub mod pb_scheduler;
pub mod pb_segment;
pub mod pb_selector;
pub mod pb_topology;

// Re-export commonly used types
pub use pb_address::{assign_addresses, AddressBlock, EndpointAddressMap};
pub use pb_engine::{EventKey, EventQueue, SimEvent};
pub use pb_interface::{
    EndpointIndex, ProbeSessionSpec, ScenarioError, SessionId, VirtualTime, PROBE_COUNT,
    PROBE_INTERVAL, PROBE_PAYLOAD_BYTES, SESSION_START_OFFSET,
};
pub use pb_scenario::{Scenario, ScenarioConfig, ScenarioReport, SCENARIO_BLOCK};
pub use pb_scheduler::{schedule_sessions, ProbeParams};
pub use pb_segment::CsmaSegment;
pub use pb_selector::PeerSelector;
pub use pb_topology::{build_topology, Endpoint, Topology};

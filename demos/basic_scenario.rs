//! Basic scenario: four hosts on one LAN, two probe sessions each
//!
//! Run with: cargo run --example basic_scenario

use log::info;
use pingbench::{Scenario, ScenarioConfig};
use simple_logger::SimpleLogger;

fn main() {
    SimpleLogger::new().init().unwrap();

    let config = ScenarioConfig {
        nodes: 4,
        apps: 2,
        ..Default::default()
    };

    let report = Scenario::new(config)
        .run()
        .expect("scenario should complete");

    report.print_summary();

    for (i, spec) in report.session_specs.iter().enumerate() {
        info!(
            "session {}: endpoint {} -> {} ({} probes, {} bytes)",
            i, spec.source, spec.target, spec.count, spec.payload_bytes
        );
    }
}

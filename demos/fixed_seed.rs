//! Run the same scenario twice with a fixed seed and verify the target
//! selections are identical.
//!
//! Run with: cargo run --example fixed_seed

use log::info;
use pingbench::{Scenario, ScenarioConfig};
use simple_logger::SimpleLogger;

fn main() {
    SimpleLogger::new().init().unwrap();

    let fixed_seed = [42u8; 32];
    info!("running twice with fixed seed: {:02x?}...", &fixed_seed[..4]);

    let config = ScenarioConfig {
        nodes: 10,
        apps: 3,
        seed: Some(fixed_seed),
        ..Default::default()
    };

    let first = Scenario::new(config.clone())
        .run()
        .expect("first run should complete");
    let second = Scenario::new(config)
        .run()
        .expect("second run should complete");

    assert_eq!(first.seed_used, fixed_seed, "seed mismatch!");
    assert_eq!(
        first.session_specs, second.session_specs,
        "target selections diverged!"
    );
    assert_eq!(first.final_time, second.final_time);

    first.print_summary();
    info!("✓ both runs selected identical targets");
}

// Scenario runner - build and run a LAN ping benchmark scenario
//
// Usage:
//   cargo run -- --nodes 4 --apps 2
//   cargo run -- scenarios/lan_ping.yaml
//   cargo run -- scenarios/lan_ping.yaml --seed 0x2a2a...

use log::info;
use pingbench::{ProbeParams, Scenario, ScenarioConfig};
use simple_logger::SimpleLogger;
use std::env;
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Scenario file format
#[derive(Debug, serde::Deserialize)]
struct ScenarioFile {
    /// Scenario metadata
    #[serde(default)]
    meta: ScenarioMeta,

    /// Configuration overrides
    config: ScenarioOverrides,
}

#[derive(Debug, Default, serde::Deserialize)]
struct ScenarioMeta {
    name: Option<String>,
    description: Option<String>,
}

#[derive(Debug, Default, serde::Deserialize)]
struct ScenarioOverrides {
    nodes: Option<u32>,
    apps: Option<u32>,
    probe_count: Option<u32>,
    payload_bytes: Option<usize>,
    start_after_ms: Option<u64>,
    stop_after_ms: Option<u64>,
    segment_delay_us: Option<u64>,
}

fn main() {
    SimpleLogger::new().init().unwrap();

    let args: Vec<String> = env::args().collect();

    let mut config = ScenarioConfig::default();
    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--nodes" => {
                config.nodes = parse_value(&args, i, "--nodes");
                i += 2;
            }
            "--apps" => {
                config.apps = parse_value(&args, i, "--apps");
                i += 2;
            }
            "--seed" => {
                if i + 1 >= args.len() {
                    usage_and_exit(&args[0]);
                }
                config.seed = Some(parse_seed_hex(&args[i + 1]));
                i += 2;
            }
            "--help" | "-h" => {
                usage_and_exit(&args[0]);
            }
            arg if !arg.starts_with("--") => {
                apply_scenario_file(Path::new(arg), &mut config);
                i += 1;
            }
            _ => {
                eprintln!("Unknown flag: {}", args[i]);
                usage_and_exit(&args[0]);
            }
        }
    }

    info!(
        "starting scenario: {} nodes, {} apps per node",
        config.nodes, config.apps
    );

    match Scenario::new(config).run() {
        Ok(report) => {
            report.print_summary();
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

fn usage_and_exit(program: &str) -> ! {
    eprintln!(
        "Usage: {} [scenario.yaml] [--nodes N] [--apps A] [--seed SEED_HEX]",
        program
    );
    eprintln!("\nExamples:");
    eprintln!("  {} --nodes 4 --apps 2", program);
    eprintln!("  {} scenarios/lan_ping.yaml", program);
    eprintln!("  {} scenarios/lan_ping.yaml --seed 0x2a2a2a...", program);
    std::process::exit(1);
}

fn parse_value(args: &[String], i: usize, flag: &str) -> u32 {
    let value = args.get(i + 1).unwrap_or_else(|| {
        eprintln!("{} requires a value", flag);
        std::process::exit(1);
    });
    value.parse().unwrap_or_else(|e| {
        eprintln!("Invalid value for {}: {}", flag, e);
        std::process::exit(1);
    })
}

fn apply_scenario_file(path: &Path, config: &mut ScenarioConfig) {
    info!("loading scenario from: {}", path.display());

    let yaml_content = fs::read_to_string(path).unwrap_or_else(|e| {
        eprintln!("Failed to read {}: {}", path.display(), e);
        std::process::exit(1);
    });

    let scenario: ScenarioFile = serde_yaml::from_str(&yaml_content).unwrap_or_else(|e| {
        eprintln!("Failed to parse {}: {}", path.display(), e);
        std::process::exit(1);
    });

    if let Some(ref name) = scenario.meta.name {
        info!("scenario: {}", name);
    }
    if let Some(ref desc) = scenario.meta.description {
        info!("  {}", desc);
    }

    let mut probe = ProbeParams::default();
    if let Some(v) = scenario.config.probe_count {
        probe.count = v;
    }
    if let Some(v) = scenario.config.payload_bytes {
        probe.payload_bytes = v;
    }
    if let Some(v) = scenario.config.start_after_ms {
        probe.start = Duration::from_millis(v);
    }
    if let Some(v) = scenario.config.stop_after_ms {
        probe.stop = Some(Duration::from_millis(v));
    }

    if let Some(v) = scenario.config.nodes {
        config.nodes = v;
    }
    if let Some(v) = scenario.config.apps {
        config.apps = v;
    }
    if let Some(v) = scenario.config.segment_delay_us {
        config.segment_delay = Duration::from_micros(v);
    }
    config.probe = probe;
}

fn parse_seed_hex(hex: &str) -> [u8; 32] {
    let hex = hex.strip_prefix("0x").unwrap_or(hex);
    let mut seed = [0u8; 32];

    for (i, chunk) in hex.as_bytes().chunks(2).enumerate() {
        if i >= 32 {
            break;
        }
        let byte_str = std::str::from_utf8(chunk).unwrap_or_else(|_| {
            eprintln!("Invalid hex seed");
            std::process::exit(1);
        });
        seed[i] = u8::from_str_radix(byte_str, 16).unwrap_or_else(|e| {
            eprintln!("Invalid hex seed: {}", e);
            std::process::exit(1);
        });
    }

    seed
}

use std::env;
use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use movetree_core::{Lamport, Move, NodeId, State};

const NODE_COUNT: u64 = 1_000;
const DEFAULT_BLOCK: usize = 10;

const CI_CONFIG: &[(u64, u64)] = &[(1_000, 5), (10_000, 1), (100_000, 1)];

const LOCAL_CONFIG: &[(u64, u64)] = &[(100, 1), (1_000, 1), (10_000, 1), (100_000, 1)];

#[derive(serde::Serialize)]
#[serde(rename_all = "camelCase")]
struct Output {
    implementation: &'static str,
    workload: String,
    timestamp: String,
    name: String,
    total_ops: u64,
    duration_ms: f64,
    ops_per_sec: f64,
    extra: Extra,
    source_file: Option<String>,
}

#[derive(serde::Serialize)]
#[serde(rename_all = "camelCase")]
struct Extra {
    count: u64,
    mode: &'static str,
    block: usize,
    noop_moves: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    iterations: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    avg_duration_ms: Option<f64>,
}

#[derive(Clone, Copy)]
enum Mode {
    Sequential,
    ReorderLast,
}

impl Mode {
    fn name(self) -> &'static str {
        match self {
            Mode::Sequential => "sequential",
            Mode::ReorderLast => "reorder-last",
        }
    }
}

// Deterministic scatter of `i` over the node space.
fn node_for(i: u64, salt: u64) -> NodeId {
    let mixed = (i ^ salt).wrapping_mul(0x9e37_79b9_7f4a_7c15);
    NodeId((mixed >> 32) % NODE_COUNT)
}

fn workload(count: u64, mode: Mode, block: usize) -> Vec<Move<Lamport>> {
    let mut ops: Vec<Move<Lamport>> = (0..count)
        .map(|t| Move::new(t, node_for(t, 0x5a), node_for(t, 0xa5), vec![0, 1, 2, 3, 4]))
        .collect();
    if let Mode::ReorderLast = mode {
        for chunk in ops.chunks_mut(block.max(1)) {
            chunk.reverse();
        }
    }
    ops
}

fn is_ci() -> bool {
    env::var("CI").map(|v| v == "true").unwrap_or(false)
}

fn run_benchmark(count: u64, mode: Mode, block: usize) -> (f64, usize) {
    let ops = workload(count, mode, block);
    let mut state = State::new();

    let start = Instant::now();
    for op in ops {
        state.apply(op);
    }
    let duration_ms = start.elapsed().as_secs_f64() * 1000.0;

    (duration_ms, state.noops().len())
}

fn main() {
    let config: &[(u64, u64)] = if is_ci() { CI_CONFIG } else { LOCAL_CONFIG };

    let mut out_dir: Option<PathBuf> = None;
    let mut custom_config: Option<Vec<(u64, u64)>> = None;
    let mut block = DEFAULT_BLOCK;
    for arg in env::args().skip(1) {
        if let Some(val) = arg.strip_prefix("--count=") {
            let count = val.parse().unwrap_or(1_000);
            custom_config = Some(vec![(count, 1)]);
        } else if let Some(val) = arg.strip_prefix("--counts=") {
            let parsed: Vec<(u64, u64)> = val
                .split(',')
                .filter_map(|s| s.trim().parse::<u64>().ok())
                .map(|c| (c, 1))
                .collect();
            if !parsed.is_empty() {
                custom_config = Some(parsed);
            }
        } else if let Some(val) = arg.strip_prefix("--block=") {
            block = val.parse().unwrap_or(DEFAULT_BLOCK);
        } else if let Some(val) = arg.strip_prefix("--out-dir=") {
            out_dir = Some(PathBuf::from(val));
        }
    }

    let config = custom_config.as_deref().unwrap_or(config);
    let out_dir = out_dir.unwrap_or_else(|| PathBuf::from("benchmarks/core"));
    fs::create_dir_all(&out_dir).expect("mkdirs");

    for mode in [Mode::Sequential, Mode::ReorderLast] {
        for &(count, iterations) in config {
            let (duration_ms, noop_moves, iterations_opt, avg_duration_ms) = if iterations > 1 {
                // Run multiple iterations and average
                let mut durations = Vec::new();
                let mut noops = 0;
                for _ in 0..iterations {
                    let (duration, n) = run_benchmark(count, mode, block);
                    durations.push(duration);
                    noops = n;
                }
                let avg = durations.iter().sum::<f64>() / durations.len() as f64;
                (avg, noops, Some(iterations), Some(avg))
            } else {
                let (duration, noops) = run_benchmark(count, mode, block);
                (duration, noops, None, None)
            };

            let workload_name = format!("{}-{}", mode.name(), count);
            let out_path = out_dir.join(format!("memory-{}.json", workload_name));

            let output = Output {
                implementation: "movetree-core",
                workload: workload_name.clone(),
                timestamp: chrono::Utc::now().to_rfc3339(),
                name: workload_name,
                total_ops: count,
                duration_ms,
                ops_per_sec: if duration_ms > 0.0 {
                    count as f64 / duration_ms * 1000.0
                } else {
                    f64::INFINITY
                },
                extra: Extra {
                    count,
                    mode: mode.name(),
                    block,
                    noop_moves,
                    iterations: iterations_opt,
                    avg_duration_ms,
                },
                source_file: Some(out_path.display().to_string()),
            };

            let json = serde_json::to_string_pretty(&output).expect("serialize");
            fs::write(&out_path, &json).expect("write output");
            println!("{}", json);
        }
    }
}

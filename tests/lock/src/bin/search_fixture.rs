//! Binary that runs every engine's single-path search over the built-in
//! worlds and prints deterministic output lines for cross-process
//! verification.
//!
//! Usage: `search_fixture [world_id ...]` (default: every built-in world)
//!
//! Output: one `key=value` block per world (see source for format).
//! Logs go to stderr, filtered by `ALEMBIC_LOG` (default `warn`).

use std::sync::Arc;

use alembic_harness::request::{Algorithm, RequestError, SearchRequest};
use alembic_harness::runner::run;
use alembic_harness::worlds::{by_id, WORLD_IDS};
use alembic_search::Searcher;
use tracing_subscriber::EnvFilter;

fn main() {
    let filter = EnvFilter::try_from_env("ALEMBIC_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let world_ids: Vec<&str> = if args.is_empty() {
        WORLD_IDS.to_vec()
    } else {
        args.iter().map(String::as_str).collect()
    };

    for world_id in world_ids {
        let world = by_id(world_id).unwrap_or_else(|| panic!("unknown world {world_id}"));
        let store = Arc::new(world.store());
        let searcher = Searcher::new(Arc::clone(&store));

        println!("world={world_id}");
        println!(
            "dataset_digest={}",
            store.digest().expect("store is loaded").as_str()
        );

        let mut targets = world.reachable_targets();
        targets.extend(world.unreachable_targets());
        targets.push("Fire".into());

        for target in &targets {
            for algorithm in Algorithm::ALL {
                let request = SearchRequest::shortest(target.as_str(), algorithm);
                match run(&searcher, &request) {
                    Ok(report) => {
                        let length = report.path.as_ref().map_or(0, |p| p.len());
                        println!(
                            "{algorithm}:{target} found={} length={length} nodes={} path_id={} report_digest={}",
                            report.path_found,
                            report.nodes_visited,
                            report.path_ids.first().map_or("-", String::as_str),
                            report.digest().expect("report serializes").as_str(),
                        );
                    }
                    Err(RequestError::UnknownTarget { .. }) => {
                        println!("{algorithm}:{target} unknown_target");
                    }
                    Err(err) => panic!("{algorithm}:{target} request failed: {err}"),
                }
            }
        }
    }
}

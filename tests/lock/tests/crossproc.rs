//! Cross-process determinism test for search reports.
//!
//! Spawns the `search_fixture` binary under 4 environment variants
//! and asserts all produce identical output.

use std::path::Path;
use std::process::Command;

fn binary_path() -> String {
    let mut path = std::env::current_exe()
        .expect("can resolve test binary path")
        .parent()
        .expect("binary dir exists")
        .parent()
        .expect("deps parent exists")
        .to_path_buf();
    path.push("search_fixture");
    path.to_string_lossy().to_string()
}

fn workspace_root() -> String {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .expect("tests/ exists")
        .parent()
        .expect("workspace root exists")
        .to_string_lossy()
        .to_string()
}

fn run_variant(work_dir: &str, env_overrides: &[(&str, &str)]) -> String {
    let bin = binary_path();

    let mut command = Command::new(&bin);
    command.current_dir(work_dir);

    command
        .env_remove("LC_ALL")
        .env_remove("LC_COLLATE")
        .env_remove("LANG")
        .env_remove("LANGUAGE")
        .env_remove("ALEMBIC_LOG");

    for &(key, val) in env_overrides {
        command.env(key, val);
    }

    let output = command.output().unwrap_or_else(|e| {
        panic!("failed to spawn {bin} (work_dir={work_dir}, overrides={env_overrides:?}): {e}")
    });

    assert!(
        output.status.success(),
        "search_fixture exited with {}: stderr={}",
        output.status,
        String::from_utf8_lossy(&output.stderr)
    );

    String::from_utf8(output.stdout).expect("stdout is valid UTF-8")
}

#[test]
fn crossproc_determinism_four_env_variants() {
    let root = workspace_root();
    let baseline = run_variant(&root, &[]);

    for world in ["world=cyclic", "world=diamond", "world=layered", "world=mud_brick"] {
        assert!(baseline.contains(world), "baseline output missing {world}");
    }
    assert!(
        baseline.contains("dataset_digest=sha256:"),
        "baseline output missing dataset_digest"
    );
    assert!(
        baseline.contains("bfs:Brick found=true length=2"),
        "baseline output missing the mud/brick BFS line"
    );
    assert!(
        baseline.contains("bfs:Fire found=true length=0 nodes=0"),
        "baseline output missing the base-element line"
    );
    assert!(
        baseline.contains("dfs:Stone unknown_target"),
        "baseline output missing the unknown-target line"
    );
    assert!(
        baseline.contains("bds:Phantom found=false"),
        "baseline output missing the unreachable-target line"
    );

    // Variant 2: different cwd.
    let alt_cwd = if cfg!(target_os = "windows") {
        "C:\\"
    } else {
        "/tmp"
    };
    let variant_cwd = run_variant(alt_cwd, &[]);
    assert_eq!(
        baseline, variant_cwd,
        "output differs when cwd changes from {root} to {alt_cwd}"
    );

    // Variant 3: different locale env.
    let variant_locale = run_variant(&root, &[("LC_ALL", "C"), ("LANG", "C")]);
    assert_eq!(
        baseline, variant_locale,
        "output differs when LC_ALL=C LANG=C"
    );

    // Variant 4: spurious env vars, verbose logging on stderr.
    let variant_noise = run_variant(
        &root,
        &[
            ("ALEMBIC_LOG", "debug"),
            ("ALEMBIC_NOISE", "should_not_matter"),
            ("TZ", "America/New_York"),
            ("HOME", "/nonexistent"),
        ],
    );
    assert_eq!(
        baseline, variant_noise,
        "output differs with spurious env vars"
    );
}

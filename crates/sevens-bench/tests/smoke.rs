use std::fs;
use std::path::Path;

use sevens_bench::config::BenchmarkConfig;
use sevens_bench::tournament::TournamentRunner;
use sha2::{Digest, Sha256};
use tempfile::tempdir;

fn load_config(output_dir: &Path, single_round: bool) -> BenchmarkConfig {
    let yaml = format!(
        r#"
run_id: "test_smoke"
matches:
  count: 3
  seed: 4242
  players: 4
  threshold: 30
  single_round: {single_round}
agents:
  - name: "greedy"
    locator: "greedy"
  - name: "random_a"
    locator: "random?seed=11"
  - name: "random_b"
    locator: "random?seed=12"
  - name: "lazy"
    locator: "passive"
outputs:
  jsonl: "{jsonl}"
  summary_md: "{summary}"
logging:
  enable_structured: false
"#,
        jsonl = output_dir.join("matches.jsonl").display(),
        summary = output_dir.join("summary.md").display(),
    );

    let mut cfg: BenchmarkConfig = serde_yaml::from_str(&yaml).expect("valid yaml");
    cfg.validate().expect("config validates");
    cfg
}

fn run_and_read(dir: &Path, single_round: bool) -> (Vec<serde_json::Value>, String) {
    let config = load_config(dir, single_round);
    let outputs = config.resolved_outputs();
    let runner = TournamentRunner::new(config, outputs).expect("runner created");
    let summary = runner.run().expect("tournament completes");

    assert_eq!(summary.matches_played, 3);
    assert_eq!(summary.rows_written, 12);
    assert!(summary.summary_path.exists(), "summary markdown missing");

    let jsonl = fs::read_to_string(&summary.jsonl_path).expect("jsonl readable");
    let mut rows = Vec::new();
    let mut normalized = String::new();
    for line in jsonl.lines() {
        let mut value: serde_json::Value = serde_json::from_str(line).expect("row decodes to JSON");
        if let Some(obj) = value.as_object_mut() {
            obj.insert("elapsed_ms".to_string(), serde_json::Value::from(0));
        }
        normalized.push_str(&serde_json::to_string(&value).expect("re-serialize normalized row"));
        normalized.push('\n');
        rows.push(value);
    }

    let digest = Sha256::digest(normalized.as_bytes());
    (rows, hex::encode(digest))
}

#[test]
fn same_seed_produces_identical_jsonl() {
    let first = tempdir().expect("temp dir");
    let second = tempdir().expect("temp dir");

    let (rows, digest_a) = run_and_read(first.path(), false);
    let (_, digest_b) = run_and_read(second.path(), false);
    assert_eq!(digest_a, digest_b, "JSONL output differs between identical runs");

    for chunk in rows.chunks(4) {
        let mut ranks: Vec<u64> = chunk
            .iter()
            .map(|row| row["position"].as_u64().expect("position"))
            .collect();
        ranks.sort_unstable();
        assert_eq!(ranks, vec![1, 2, 3, 4]);

        let players: Vec<u64> = chunk
            .iter()
            .map(|row| row["player"].as_u64().expect("player"))
            .collect();
        assert_eq!(players, vec![0, 1, 2, 3]);
        assert!(chunk.iter().any(|row| row["cards"].as_u64().expect("cards") >= 30));
    }

    let markdown = fs::read_to_string(first.path().join("summary.md")).expect("summary");
    assert!(markdown.contains("| greedy | `greedy` | 3 |"));
    assert!(markdown.contains("Avg rank"));
}

#[test]
fn single_round_mode_reports_at_most_one_winner_per_match() {
    let dir = tempdir().expect("temp dir");
    let (rows, _) = run_and_read(dir.path(), true);

    for chunk in rows.chunks(4) {
        let winners = chunk
            .iter()
            .filter(|row| row["position"].as_u64() == Some(1))
            .count();
        assert!(winners <= 1);
        assert!(chunk.iter().all(|row| row["mode"] == "single_round"));
        assert!(chunk.iter().all(|row| row["cards"].is_null()));
    }
}

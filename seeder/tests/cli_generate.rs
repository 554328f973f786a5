//! CLI tests for `seeder generate`.
//!
//! Spawns the seeder binary against a temporary output directory and checks
//! the files it writes.

use std::path::Path;
use std::process::{Command, Output};

use serde_json::Value;

use seeder::exit_codes;

fn seeder(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_seeder"))
        .current_dir(dir)
        .args(["--output-dir", "out"])
        .args(args)
        .output()
        .expect("run seeder")
}

fn read(path: &Path) -> Value {
    let raw = std::fs::read_to_string(path).expect("read output");
    serde_json::from_str(&raw).expect("parse output")
}

#[test]
fn generate_all_writes_every_seed_file() {
    let temp = tempfile::tempdir().expect("tempdir");
    let output = seeder(temp.path(), &["--seed", "1", "generate", "all"]);
    assert_eq!(output.status.code(), Some(exit_codes::OK));

    let out = temp.path().join("out");
    for file in [
        "initial_qna.json",
        "morph_list_full.json",
        "husbandry_data_dynamic.json",
        "community_qna_dynamic.json",
        "morph_data_full.json",
    ] {
        assert!(out.join(file).exists(), "{file} written");
    }
    assert_eq!(read(&out.join("initial_qna.json"))["total"], 50);
    assert_eq!(read(&out.join("husbandry_data_dynamic.json"))["total_articles"], 30);
    assert_eq!(read(&out.join("community_qna_dynamic.json"))["total_posts"], 50);

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout.lines().filter(|l| l.starts_with("generate: file=")).count(), 5);
}

#[test]
fn same_seed_gives_same_posts() {
    let first = tempfile::tempdir().expect("tempdir");
    let second = tempfile::tempdir().expect("tempdir");
    for dir in [first.path(), second.path()] {
        let output = seeder(dir, &["--seed", "99", "generate", "dynamic", "--tips", "2", "--posts", "3"]);
        assert_eq!(output.status.code(), Some(exit_codes::OK));
    }
    let a = read(&first.path().join("out/community_qna_dynamic.json"));
    let b = read(&second.path().join("out/community_qna_dynamic.json"));
    assert_eq!(a["total_posts"], 3);
    assert_eq!(a["posts"][0]["question_title"], b["posts"][0]["question_title"]);
    assert_eq!(a["posts"][2]["answer"]["body"], b["posts"][2]["answer"]["body"]);
}

#[test]
fn invalid_config_exits_with_invalid_code() {
    let temp = tempfile::tempdir().expect("tempdir");
    std::fs::write(temp.path().join("seeder.toml"), "[pacing]\nmin_delay_ms = 10\nmax_delay_ms = 1\n")
        .expect("write config");
    let output = seeder(temp.path(), &["generate", "encyclopedia"]);
    assert_eq!(output.status.code(), Some(exit_codes::INVALID));
    assert!(String::from_utf8_lossy(&output.stderr).contains("pacing.min_delay_ms"));
}

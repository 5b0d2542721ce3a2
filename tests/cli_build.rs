mod common;

use common::{TestEnv, FIRST, SECOND};

#[test]
fn test_build_single_decision() {
    let env = TestEnv::new();
    env.write("decisions/0001.decision", FIRST)
        .write("decisions/0002.decision", SECOND);

    let result = env.run(&["build", "decisions/0002.decision"]);

    assert!(result.success, "{}", result.combined_output());
    assert!(result.stdout.contains("Built /decisions/0002.decision (1 reports)"));
    let report = env.read(".internal/reports/decisions/0002.decision/decisions/index.md");
    assert!(report.starts_with("# Use CockroachDB\n"));
    assert!(report.contains("- 0001: Use PostgreSQL"));
}

#[test]
fn test_build_accepts_paths_on_disk() {
    let env = TestEnv::new();
    env.write("decisions/0001.decision", "title = \"Only\"\n");
    let on_disk = env.path("decisions/0001.decision");

    let result = env.run(&["build", on_disk.to_str().unwrap()]);

    assert!(result.success, "{}", result.combined_output());
    assert!(result.stdout.contains("Built /decisions/0001.decision"));
}

#[test]
fn test_build_invalid_decision_exits_non_zero() {
    let env = TestEnv::new();
    env.write("decisions/0001.decision", "title = \"\"\n");

    let result = env.run(&["build", "decisions/0001.decision", "--json"]);

    assert_eq!(result.exit_code, 1);
    let events = result.events();
    let outcome = &events[0]["outcome"];
    assert_eq!(outcome["valid"], false);
    assert_eq!(outcome["diagnostics"][0]["message"], "decision has no title");
}

#[test]
fn test_build_unknown_path_is_an_error() {
    let env = TestEnv::new();
    env.write("notes/readme.md", "hello");

    let result = env.run(&["build", "notes/readme.md"]);

    assert!(!result.success);
    assert!(result.stderr.contains("is not a known artifact"));
}

mod common;

use common::{TestEnv, FIRST, SECOND};

#[test]
fn test_check_valid_workspace_builds_reports() {
    let env = TestEnv::new();
    env.write("decisions/0001.decision", FIRST)
        .write("decisions/0002.decision", SECOND);

    let result = env.run(&["check"]);

    assert!(result.success, "check failed:\n{}", result.combined_output());
    assert!(result
        .stdout
        .contains("Checked 2 artifacts: 0 errors, 0 warnings"));
    assert!(env.exists(".internal/reports/decisions/0002.decision/decisions/index.md"));
    assert!(env.exists(".internal/reports/decision-index/index.md"));
    assert!(env.exists(".internal/inputs/decisions/decision.paths"));

    let index = env.read(".internal/reports/decision-index/index.md");
    assert!(index.contains("| 0001 | Use PostgreSQL | superseded |"));
    assert!(index.contains("| 0002 | Use CockroachDB | accepted |"));
}

#[test]
fn test_check_fails_on_dangling_link() {
    let env = TestEnv::new();
    env.write(
        "decisions/0002.decision",
        "title = \"Use CockroachDB\"\nsupersedes = [\"0009\"]\n",
    );

    let result = env.run(&["check"]);

    assert_eq!(result.exit_code, 1, "{}", result.combined_output());
    assert!(result.stdout.contains(
        "/decisions/0002.decision: ERROR [supersedes.0] superseded decision '0009' does not exist (decisions)"
    ));
    assert!(result.stdout.contains("fix: create-missing"));
    assert!(!env.exists(".internal/reports/decisions/0002.decision"));
}

#[test]
fn test_check_strict_warnings() {
    let env = TestEnv::new();
    env.write("decisions/0001.decision", FIRST);

    let lenient = env.run(&["check"]);
    assert!(lenient.success, "{}", lenient.combined_output());
    assert!(lenient.stdout.contains("0 errors, 1 warnings"));

    let strict = env.run(&["check", "--strict-warnings"]);
    assert_eq!(strict.exit_code, 1);
}

#[test]
fn test_check_reports_unparsable_decision() {
    let env = TestEnv::new();
    env.write("decisions/0001.decision", "title = [\n");

    let result = env.run(&["check"]);

    assert_eq!(result.exit_code, 1);
    assert!(result.stdout.contains("/decisions/0001.decision: ERROR"));
    assert!(result.stdout.contains("(parser)"));
}

#[test]
fn test_check_json_output() {
    let env = TestEnv::new();
    env.write("decisions/0001.decision", FIRST)
        .write("decisions/0002.decision", SECOND);

    let result = env.run(&["check", "--json"]);
    assert!(result.success, "{}", result.combined_output());

    let events = result.events();
    assert_eq!(events[0]["event"], "start");
    let artifacts: Vec<_> = events.iter().filter(|e| e["event"] == "artifact").collect();
    assert_eq!(artifacts.len(), 2);
    assert!(artifacts.iter().all(|e| e["valid"] == true));

    let complete = events.last().unwrap();
    assert_eq!(complete["event"], "complete");
    assert_eq!(complete["artifacts"], 2);
    assert_eq!(complete["success"], true);
}

#[test]
fn test_check_forgets_decisions_deleted_between_runs() {
    let env = TestEnv::new();
    env.write("decisions/0001.decision", FIRST)
        .write("decisions/0002.decision", SECOND);
    assert!(env.run(&["check"]).success);
    assert!(env.exists(".internal/diagnostics/decisions/0002.decision/decisions.json"));

    std::fs::remove_file(env.path("decisions/0002.decision")).unwrap();
    let result = env.run(&["check"]);

    assert!(!env.exists(".internal/diagnostics/decisions/0002.decision/decisions.json"));
    assert!(!env.exists(".internal/reports/decisions/0002.decision"));
    // 0001 is still superseded but nothing supersedes it any more
    assert!(result.stdout.contains("Checked 1 artifacts: 0 errors, 1 warnings"));
}

#[test]
fn test_check_with_empty_workspace() {
    let env = TestEnv::new();

    let result = env.run(&["check"]);

    assert!(result.success, "{}", result.combined_output());
    assert!(result.stdout.contains("Checked 0 artifacts"));
}

mod common;

use common::TestEnv;

const DANGLING: &str = "title = \"Use CockroachDB\"\nsupersedes = [\"0009\"]\n";

#[test]
fn test_apply_create_missing_fixes_workspace() {
    let env = TestEnv::new();
    env.write("decisions/0002.decision", DANGLING);
    assert!(!env.run(&["check"]).success);

    let result = env.run(&[
        "apply",
        "decisions/0002.decision",
        "create-missing",
        "--location",
        "supersedes.0",
    ]);

    assert!(result.success, "{}", result.combined_output());
    assert!(result.stdout.contains("changed /decisions/0009.decision"));
    let stub = env.read("decisions/0009.decision");
    assert!(stub.contains("title = \"0009\""));

    let check = env.run(&["check"]);
    assert!(check.success, "{}", check.combined_output());
}

#[test]
fn test_apply_unknown_code_fails() {
    let env = TestEnv::new();
    env.write("decisions/0002.decision", DANGLING);

    let result = env.run(&["apply", "decisions/0002.decision", "rename"]);

    assert!(!result.success);
    assert!(result.stderr.contains("had no effect"));
    assert!(!env.exists("decisions/0009.decision"));
}

#[test]
fn test_apply_json_lists_changed_resources() {
    let env = TestEnv::new();
    env.write("decisions/0002.decision", DANGLING);

    let result = env.run(&["--json", "apply", "decisions/0002.decision", "create-missing"]);

    assert!(result.success, "{}", result.combined_output());
    let events = result.events();
    assert_eq!(events[0]["command"], "apply");
    assert_eq!(events[0]["changed"][0], "/decisions/0009.decision");
}

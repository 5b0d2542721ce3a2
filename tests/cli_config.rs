mod common;

use common::{TestEnv, FIRST, SECOND};

#[test]
fn test_project_config_moves_roots() {
    let env = TestEnv::new();
    env.write(
        "blueprint.toml",
        "[engine]\ninternal_dir = \".bp\"\n\n[decisions]\nroot = \"docs/adr\"\n",
    )
    .write("docs/adr/0001.decision", FIRST)
    .write("docs/adr/0002.decision", SECOND)
    .write("decisions/0003.decision", "title = \"\"\n");

    let result = env.run(&["check"]);

    assert!(result.success, "{}", result.combined_output());
    assert!(result.stdout.contains("Checked 2 artifacts"));
    assert!(env.exists(".bp/reports/docs/adr/0002.decision/decisions/index.md"));
    assert!(!env.exists(".internal"));
}

#[test]
fn test_disabled_tools_are_not_run() {
    let env = TestEnv::new();
    env.write("blueprint.toml", "[tools]\nenabled = [\"decisions\"]\n")
        .write("decisions/0001.decision", FIRST)
        .write("decisions/0002.decision", SECOND);

    assert!(env.run(&["check"]).success);
    assert!(env.exists(".internal/reports/decisions/0001.decision/decisions/index.md"));
    assert!(!env.exists(".internal/reports/decision-index"));
}

#[test]
fn test_unknown_config_key_warns() {
    let env = TestEnv::new();
    env.write("blueprint.toml", "[watch]\ndebounce_mss = 10\n");

    let result = env.run(&["check"]);

    assert!(result.success, "{}", result.combined_output());
    assert!(result.stderr.contains("unknown config key 'watch.debounce_mss'"));
    assert!(result.stderr.contains("did you mean 'debounce_ms'"));
}

#[test]
fn test_unknown_tool_is_rejected() {
    let env = TestEnv::new();
    env.write("blueprint.toml", "[tools]\nenabled = [\"usecases\"]\n");

    let result = env.run(&["check"]);

    assert!(!result.success);
    assert!(result.stderr.contains("usecases"));
}

#[test]
fn test_root_is_discovered_from_subdirectory() {
    let env = TestEnv::new();
    env.write("blueprint.toml", "")
        .write("decisions/0001.decision", "title = \"Only\"\n");
    let nested = env.path("decisions");

    let result = env.run_from(&nested, &["check"], false);

    assert!(result.success, "{}", result.combined_output());
    assert!(result.stdout.contains("Checked 1 artifacts"));
    assert!(env.exists(".internal/reports/decisions/0001.decision/decisions/index.md"));
}

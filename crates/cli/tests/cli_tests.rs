//! CLI integration tests
use predicates::prelude::*;
use tempfile::TempDir;

const COLLAPSED_MARKER: char = '\u{F8F0}';
const EXPANDED_MARKER: char = '\u{F8F1}';

/// Command isolated from the user's config directory and API keys
fn cmd(home: &TempDir) -> assert_cmd::Command {
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("precis");
    cmd.env("HOME", home.path())
        .env("XDG_CONFIG_HOME", home.path())
        .env_remove("GEMINI_API_KEY")
        .env_remove("OPENAI_API_KEY")
        .env_remove("RUST_LOG");
    cmd
}

fn get_fixture_path(name: &str) -> String {
    format!("../../tests/fixtures/{}", name)
}

#[test]
fn test_cli_file_input() {
    let home = TempDir::new().unwrap();
    cmd(&home)
        .arg(get_fixture_path("article.html"))
        .assert()
        .success()
        .stdout(predicate::str::starts_with("  Why Terminals Still Matter"))
        .stdout(predicate::str::contains("Text is a universal interface"));
}

#[test]
fn test_cli_stdin_input() {
    let home = TempDir::new().unwrap();
    let html = std::fs::read_to_string(get_fixture_path("article.html")).unwrap();
    cmd(&home)
        .args(["-", "--title", "From stdin"])
        .write_stdin(html)
        .assert()
        .success()
        .stdout(predicate::str::starts_with("  From stdin\n  stdin\n"));
}

#[test]
fn test_cli_width_and_indent() {
    let home = TempDir::new().unwrap();
    let output = cmd(&home)
        .args(["-w", "50", "--indent", "    ", &get_fixture_path("article.html")])
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    for line in stdout.lines().filter(|l| !l.is_empty()) {
        assert!(line.starts_with("    "), "unindented line: {:?}", line);
        assert!(line.chars().count() <= 50, "line too wide: {:?}", line);
    }
}

#[test]
fn test_cli_summary_without_key_shows_error_notice() {
    let home = TempDir::new().unwrap();
    cmd(&home)
        .args(["--summarize", &get_fixture_path("article.html")])
        .assert()
        .success()
        .stdout(predicate::str::contains("Error generating summary: missing API key for provider: gemini"))
        .stdout(predicate::str::contains("Decades after"))
        .stderr(predicate::str::contains("No API key configured"));
}

#[test]
fn test_cli_encoded_view_without_summary_has_no_markers() {
    let home = TempDir::new().unwrap();
    let output = cmd(&home)
        .args(["--view", "encoded", &get_fixture_path("article.html")])
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(!stdout.contains(COLLAPSED_MARKER) && !stdout.contains(EXPANDED_MARKER));
}

#[test]
fn test_cli_no_images() {
    let home = TempDir::new().unwrap();
    let html = "<html><body><article><p>A paragraph long enough to count as the article body, with a picture \
                <img src=\"cat.jpg\" alt=\"A cat\"> in the middle of it and more words after the picture.</p>\
                </article></body></html>";

    cmd(&home)
        .args(["-", "-t", "T", "-w", "200"])
        .write_stdin(html)
        .assert()
        .success()
        .stdout(predicate::str::contains("[Image: A cat]"));
    cmd(&home)
        .args(["--no-images", "-", "-t", "T", "-w", "200"])
        .write_stdin(html)
        .assert()
        .success()
        .stdout(predicate::str::contains("Image").not());
}

#[test]
fn test_cli_references() {
    let home = TempDir::new().unwrap();
    cmd(&home)
        .args(["--references", &get_fixture_path("article.html")])
        .assert()
        .success()
        .stdout(predicate::str::contains("References"))
        .stdout(predicate::str::contains("last year: /archive/2024"));
}

#[test]
fn test_cli_output_file() {
    let home = TempDir::new().unwrap();
    let output = home.path().join("article.txt");

    cmd(&home)
        .args(["-o", output.to_str().unwrap()])
        .arg(get_fixture_path("article.html"))
        .assert()
        .success()
        .stderr(predicate::str::contains("Output written to"));

    let content = std::fs::read_to_string(&output).unwrap();
    assert!(content.contains("Why Terminals Still Matter"));
    assert!(!content.contains('\x1b'));
}

#[test]
fn test_cli_config_file() {
    let home = TempDir::new().unwrap();
    let config = home.path().join("precis.toml");
    std::fs::write(&config, "[reader]\nindent = \">> \"\n").unwrap();

    cmd(&home)
        .args(["-c", config.to_str().unwrap(), &get_fixture_path("article.html")])
        .assert()
        .success()
        .stdout(predicate::str::starts_with(">> Why Terminals Still Matter"));
}

#[test]
fn test_cli_provider_flag_does_not_reuse_file_key() {
    let home = TempDir::new().unwrap();
    let config = home.path().join("precis.toml");
    std::fs::write(&config, "[summary]\nprovider = \"gemini\"\napi_key = \"gemini-key\"\n").unwrap();

    cmd(&home)
        .args(["-c", config.to_str().unwrap(), "--summarize", "--provider", "openai", &get_fixture_path("article.html")])
        .assert()
        .success()
        .stdout(predicate::str::contains("missing API key for provider: openai"));
}

#[test]
fn test_cli_missing_config_file() {
    let home = TempDir::new().unwrap();
    cmd(&home)
        .args(["-c", "/nonexistent/precis.toml", &get_fixture_path("article.html")])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load config"));
}

#[test]
fn test_cli_invalid_file() {
    let home = TempDir::new().unwrap();
    cmd(&home).arg("nonexistent.html").assert().failure().stderr(predicate::str::contains("nonexistent.html"));
}

#[test]
fn test_cli_empty_content() {
    let home = TempDir::new().unwrap();
    cmd(&home)
        .arg(get_fixture_path("empty_content.html"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("could not fetch url"));
}

#[test]
fn test_cli_invalid_url() {
    let home = TempDir::new().unwrap();
    cmd(&home)
        .args(["--timeout", "1", "http://127.0.0.1:9/unreachable"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("could not fetch url http://127.0.0.1:9/unreachable"));
}

#[test]
fn test_cli_verbose() {
    let home = TempDir::new().unwrap();
    cmd(&home)
        .args(["-v", &get_fixture_path("article.html")])
        .assert()
        .success()
        .stderr(predicate::str::contains("Precis"));
}

#[test]
fn test_cli_invalid_view() {
    let home = TempDir::new().unwrap();
    cmd(&home).args(["--view", "sideways", &get_fixture_path("article.html")]).assert().failure();
}

#[test]
fn test_cli_completions() {
    let home = TempDir::new().unwrap();
    cmd(&home).args(["--completions", "bash"]).assert().success().stdout(predicate::str::contains("precis"));
}

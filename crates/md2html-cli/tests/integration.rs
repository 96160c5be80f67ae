//! Integration tests for md2html conversion

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn md2html() -> Command {
    Command::new(env!("CARGO_BIN_EXE_md2html"))
}

fn run(cmd: &mut Command) -> Output {
    cmd.output().expect("Failed to run md2html")
}

/// Copy a fixture into `dir` and return the new path
fn copy_fixture(name: &str, dir: &Path) -> PathBuf {
    let target = dir.join(format!("{}.md", name));
    fs::copy(fixtures_dir().join(format!("{}.md", name)), &target)
        .expect("Failed to copy fixture");
    target
}

/// Run md2html on a fixture file and return the output
fn convert_fixture(name: &str, args: &[&str]) -> String {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let input = copy_fixture(name, dir.path());
    let output = dir.path().join("out.html");

    let result = run(md2html().arg(&input).arg("-o").arg(&output).args(args));
    assert!(
        result.status.success(),
        "md2html failed: {}",
        String::from_utf8_lossy(&result.stderr)
    );

    fs::read_to_string(&output).expect("Failed to read output file")
}

#[test]
fn test_simple_conversion() {
    let output = convert_fixture("guide", &[]);
    insta::assert_snapshot!("guide_html", output);
}

#[test]
fn test_standalone_conversion() {
    let output = convert_fixture(
        "guide",
        &["--standalone", "--lang", "en", "--stylesheet", "site.css"],
    );
    insta::assert_snapshot!("guide_standalone", output);
}

#[test]
fn test_title_flag() {
    let output = convert_fixture("guide", &["--standalone", "--title", "Trip Notes"]);
    assert!(output.contains("<title>Trip Notes</title>\n"));
    assert!(output.starts_with("<!DOCTYPE html>\n<html>\n"));
}

#[test]
fn test_default_output_path() {
    let dir = tempfile::tempdir().unwrap();
    let input = copy_fixture("guide", dir.path());

    let result = run(md2html().arg(&input));
    assert!(result.status.success());

    let expected = dir.path().join("guide.html");
    assert!(expected.is_file());
    let stdout = String::from_utf8(result.stdout).unwrap();
    assert_eq!(stdout.trim(), expected.display().to_string());
}

#[test]
fn test_syntax_error_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let input = copy_fixture("broken", dir.path());

    let result = run(md2html().arg(&input));
    assert!(!result.status.success());

    let stderr = String::from_utf8(result.stderr).unwrap();
    assert!(
        stderr.contains("broken.md:3:29: expected `)`, got text"),
        "unexpected stderr: {}",
        stderr
    );
    assert!(!dir.path().join("broken.html").exists());
}

#[test]
fn test_missing_input() {
    let dir = tempfile::tempdir().unwrap();
    let result = run(md2html().arg(dir.path().join("nope.md")));
    assert!(!result.status.success());
    let stderr = String::from_utf8(result.stderr).unwrap();
    assert!(stderr.contains("Input path does not exist"));
}

#[test]
fn test_directory_conversion() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();
    fs::write(input.path().join("a.md"), "# A\n").unwrap();
    fs::write(input.path().join("notes.markdown"), "plain *notes*\n").unwrap();
    fs::write(input.path().join("skip.txt"), "# not markdown\n").unwrap();
    fs::create_dir(input.path().join("sub")).unwrap();
    fs::write(input.path().join("sub").join("b.md"), "`b`\n").unwrap();

    let result = run(md2html()
        .arg(input.path())
        .arg("-o")
        .arg(output.path())
        .arg("-r")
        .arg("-q"));
    assert!(result.status.success(), "md2html directory conversion failed");

    let read = |rel: &Path| fs::read_to_string(output.path().join(rel)).unwrap();
    assert_eq!(read(Path::new("a.html")), "<h1>A</h1>\n");
    assert_eq!(read(Path::new("notes.html")), "<p>plain <em>notes</em></p>\n");
    assert_eq!(
        read(&Path::new("sub").join("b.html")),
        "<p><code>b</code></p>\n"
    );
    assert!(!output.path().join("skip.html").exists());
}

#[test]
fn test_directory_not_recursive_by_default() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("top.md"), "top\n").unwrap();
    fs::create_dir(dir.path().join("sub")).unwrap();
    fs::write(dir.path().join("sub").join("inner.md"), "inner\n").unwrap();

    let result = run(md2html().arg(dir.path()).arg("-q"));
    assert!(result.status.success());
    assert!(dir.path().join("top.html").is_file());
    assert!(!dir.path().join("sub").join("inner.html").exists());
}

#[test]
fn test_directory_with_failure() {
    let dir = tempfile::tempdir().unwrap();
    copy_fixture("guide", dir.path());
    copy_fixture("broken", dir.path());

    let result = run(md2html().arg(dir.path()));
    assert!(!result.status.success());

    let stderr = String::from_utf8(result.stderr).unwrap();
    assert!(stderr.contains("Converted 1 files, 1 failed"));
    assert!(stderr.contains("3:29: expected `)`, got text"));
    assert!(dir.path().join("guide.html").is_file());
    assert!(!dir.path().join("broken.html").exists());
}

#[test]
fn test_config_file_next_to_input() {
    let dir = tempfile::tempdir().unwrap();
    let input = copy_fixture("guide", dir.path());
    fs::write(
        dir.path().join("_md2html.toml"),
        "[output]\nstandalone = true\nextension = \"htm\"\n\n[page]\ntitle = \"From Config\"\n",
    )
    .unwrap();

    let result = run(md2html().arg(&input).arg("-q"));
    assert!(result.status.success());

    let html = fs::read_to_string(dir.path().join("guide.htm")).unwrap();
    assert!(html.contains("<title>From Config</title>\n"));
    assert!(html.ends_with("</body>\n</html>\n"));
}

#[test]
fn test_explicit_config_and_override() {
    let dir = tempfile::tempdir().unwrap();
    let input = copy_fixture("guide", dir.path());
    let config = dir.path().join("site.toml");
    fs::write(&config, "[output]\nstandalone = true\n").unwrap();
    let output = dir.path().join("out.html");

    let result = run(md2html()
        .arg(&input)
        .arg("--config")
        .arg(&config)
        .arg("--no-standalone")
        .arg("-o")
        .arg(&output));
    assert!(result.status.success());

    let html = fs::read_to_string(&output).unwrap();
    assert!(html.starts_with("<h1>Field Guide</h1>\n"));
}

#[test]
fn test_refuses_to_overwrite_source() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("notes.md");
    fs::write(&input, "# Keep me\n").unwrap();
    fs::write(
        dir.path().join("_md2html.toml"),
        "[output]\nextension = \"md\"\n",
    )
    .unwrap();

    let result = run(md2html().arg(&input));
    assert!(!result.status.success());
    let stderr = String::from_utf8(result.stderr).unwrap();
    assert!(stderr.contains("Output would overwrite the input file"));
    assert_eq!(fs::read_to_string(&input).unwrap(), "# Keep me\n");

    // Same file spelled differently through -o
    let result = run(md2html().arg(&input).arg("-o").arg(dir.path().join(".").join("notes.md")));
    assert!(!result.status.success());
    assert_eq!(fs::read_to_string(&input).unwrap(), "# Keep me\n");
}

#[test]
fn test_directory_refuses_to_overwrite_sources() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("a.md"), "# A\n").unwrap();
    fs::create_dir(dir.path().join("sub")).unwrap();
    fs::write(dir.path().join("sub").join("b.md"), "b\n").unwrap();
    fs::write(
        dir.path().join("_md2html.toml"),
        "[output]\nextension = \"md\"\n",
    )
    .unwrap();

    let result = run(md2html().arg(dir.path()).arg("-r"));
    assert!(!result.status.success());
    let stderr = String::from_utf8(result.stderr).unwrap();
    assert!(stderr.contains("Converted 0 files, 2 failed"));
    assert_eq!(fs::read_to_string(dir.path().join("a.md")).unwrap(), "# A\n");
    assert_eq!(
        fs::read_to_string(dir.path().join("sub").join("b.md")).unwrap(),
        "b\n"
    );
}

#[test]
fn test_verbose_flag_on_subcommand() {
    let result = run(md2html()
        .arg("ast")
        .arg("-v")
        .arg(fixtures_dir().join("guide.md")));
    assert!(result.status.success());
    let _: serde_json::Value = serde_json::from_slice(&result.stdout).unwrap();
}

#[test]
fn test_init_config() {
    let dir = tempfile::tempdir().unwrap();
    let output_file = dir.path().join("_md2html.toml");

    let result = run(md2html().arg("init").arg("-o").arg(&output_file));
    assert!(result.status.success(), "md2html init failed");

    let content = fs::read_to_string(&output_file).expect("Failed to read config file");
    assert!(content.starts_with("#:schema "));
    assert!(content.contains("[output]"));
    assert!(content.contains("[page]"));

    // Refuses to overwrite
    let result = run(md2html().arg("init").arg("-o").arg(&output_file));
    assert!(!result.status.success());
}

#[test]
fn test_init_schema() {
    let result = run(md2html().arg("init").arg("--schema"));
    assert!(result.status.success(), "md2html init --schema failed");

    let schema: serde_json::Value =
        serde_json::from_slice(&result.stdout).expect("Schema is not valid JSON");
    assert_eq!(schema["title"], "Config");
    assert!(schema["properties"]["output"].is_object());
    assert!(schema["properties"]["page"].is_object());
}

#[test]
fn test_ast_dump() {
    let result = run(md2html().arg("ast").arg(fixtures_dir().join("guide.md")));
    assert!(result.status.success());

    let ast: serde_json::Value = serde_json::from_slice(&result.stdout).unwrap();
    let nodes = ast["nodes"].as_array().unwrap();
    assert_eq!(nodes.len(), 6);
    assert_eq!(nodes[0]["header"]["level"], 1);
    assert_eq!(nodes[4]["image"]["url"], "trail.png");
}

#[test]
fn test_ast_dump_syntax_error() {
    let result = run(md2html().arg("ast").arg(fixtures_dir().join("broken.md")));
    assert!(!result.status.success());
    assert!(result.stdout.is_empty());
}

#[test]
fn test_tokens_dump() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("hi.md");
    fs::write(&input, "# Hi\n").unwrap();

    let result = run(md2html().arg("tokens").arg(&input));
    assert!(result.status.success());

    let tokens: serde_json::Value = serde_json::from_slice(&result.stdout).unwrap();
    let texts: Vec<_> = tokens
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["text"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(texts, ["#", " Hi", "\n", "\n"]);
}

use anyhow::{Context, Result};
use serde_json::Value;

use crate::CliTest;

/// Validates config file structure and default values.
fn assert_config_content(content: &str) -> Result<()> {
    let parsed: Value = serde_json::from_str(content).context("Config should be valid JSON")?;

    for field in [
        "includes",
        "catalogRoot",
        "sourceExtensions",
        "defaultBackend",
        "resourceClasses",
        "localizers",
    ] {
        assert!(
            parsed.get(field).is_some(),
            "Config should have '{}' field",
            field
        );
    }
    assert_eq!(parsed["defaultBackend"], "xml");

    Ok(())
}

#[test]
fn test_init_creates_config() -> Result<()> {
    let test = CliTest::new()?;

    let run = test.run(&["init"])?;

    assert_eq!(run.code, Some(0));
    assert!(run.stdout.contains("Created .rescatrc.json"));
    assert!(test.root().join(".rescatrc.json").exists());
    assert_config_content(&test.read_file(".rescatrc.json")?)?;

    Ok(())
}

#[test]
fn test_init_fails_if_exists() -> Result<()> {
    let test = CliTest::new()?;
    test.write_file(".rescatrc.json", "{}")?;

    let run = test.run(&["init"])?;

    assert_eq!(run.code, Some(2));
    assert!(run.stderr.contains("Error: .rescatrc.json already exists"));
    assert_eq!(test.read_file(".rescatrc.json")?, "{}");

    Ok(())
}

#[test]
fn test_init_config_is_immediately_usable() -> Result<()> {
    let test = CliTest::new()?;
    test.run(&["init"])?;

    test.write_file("Resources/Resources.resx", &crate::resx(&[("Title", "Home")]))?;
    test.write_file("Views/Home.cshtml", "<h1>@Resources.Title</h1>\n")?;

    let run = test.run(&["scan"])?;
    assert_eq!(
        run.code,
        Some(0),
        "Scan should work with initialized config. stderr: {}",
        run.stderr
    );

    Ok(())
}

#[test]
fn test_invalid_config_is_an_error() -> Result<()> {
    let test = CliTest::new()?;
    test.write_file(".rescatrc.json", r#"{ "ignores": ["[invalid"] }"#)?;

    let run = test.run(&["stats"])?;

    assert_eq!(run.code, Some(2));
    assert!(run.stderr.contains("ignores"));

    Ok(())
}

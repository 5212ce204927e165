use anyhow::Result;

use crate::{CliTest, resx};

#[test]
fn test_stats_shows_completion() -> Result<()> {
    let test = CliTest::with_files(&[
        (
            "Resources/Resources.resx",
            &resx(&[("Title", "Home"), ("Save", "Save")]),
        ),
        (
            "Resources/Resources.fr.resx",
            &resx(&[("Title", "Accueil"), ("Save", "")]),
        ),
    ])?;

    let run = test.run(&["stats"])?;

    assert_eq!(run.code, Some(0), "stderr: {}", run.stderr);
    let lines: Vec<&str> = run.stdout.lines().collect();
    assert_eq!(lines[0], "Resources (Resources)");
    assert!(lines[1].contains("Keys  Translated  Complete"));
    assert_eq!(lines[2], "  (invariant)       2           2    100.0%");
    assert_eq!(lines[3], "  fr                2           1     50.0%");

    Ok(())
}

#[test]
fn test_stats_skips_broken_language_file() -> Result<()> {
    let test = CliTest::with_files(&[
        ("Resources/Resources.resx", &resx(&[("Title", "Home")])),
        (
            "Resources/Resources.de.resx",
            "<root>\n  <data name=\"Title\"><value>Start</value>\n",
        ),
    ])?;

    let run = test.run(&["stats"])?;

    assert_eq!(run.code, Some(0));
    assert!(run.stderr.contains("warning: skipped Resources/Resources.de.resx"));
    assert!(run.stdout.contains("(invariant)"));
    assert!(!run.stdout.contains("  de "));

    Ok(())
}

#[test]
fn test_stats_unknown_base() -> Result<()> {
    let test = CliTest::with_files(&[("Resources/Resources.resx", &resx(&[("Title", "Home")]))])?;

    let run = test.run(&["stats", "--base", "Errors"])?;

    assert_eq!(run.code, Some(2));
    assert!(run.stderr.contains("Catalog 'Errors' not found (available: Resources)"));

    Ok(())
}

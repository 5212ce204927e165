use anyhow::Result;
use serde_json::Value;

use crate::{CliTest, resx};

fn project() -> Result<CliTest> {
    CliTest::with_files(&[
        (
            "Resources/Resources.resx",
            &resx(&[("Title", "Home"), ("Unused", "Never shown")]),
        ),
        (
            "Views/Home.cshtml",
            "<h1>@Resources.Title</h1>\n<p>@Resources.Subtitle</p>\n@* @Resources.Footer *@\n",
        ),
    ])
}

#[test]
fn test_scan_reports_missing_and_unused() -> Result<()> {
    let test = project()?;

    let run = test.run(&["scan"])?;

    assert_eq!(run.code, Some(1), "stderr: {}", run.stderr);
    assert!(run.stdout.contains("error: \"Subtitle\"  missing-key"));
    assert!(run.stdout.contains("--> Views/Home.cshtml:2:5"));
    assert!(run.stdout.contains("warning: \"Unused\"  unused-key"));
    assert!(run.stdout.contains("--> Resources/Resources.resx"));
    assert!(run.stdout.contains("2 problems (1 error, 1 warning)"));
    assert!(!run.stdout.contains("Footer"));

    Ok(())
}

#[test]
fn test_scan_clean_project() -> Result<()> {
    let test = CliTest::with_files(&[
        ("Resources/Resources.resx", &resx(&[("Title", "Home")])),
        ("Controllers/HomeController.cs", "ViewData[\"Title\"] = Resources.Title;\n"),
    ])?;

    let run = test.run(&["scan"])?;

    assert_eq!(run.code, Some(0), "stderr: {}", run.stderr);
    assert!(
        run.stdout
            .contains("Scanned 1 source file against \"Resources\" (1 key) - no issues found")
    );

    Ok(())
}

#[test]
fn test_scan_json_format() -> Result<()> {
    let test = project()?;

    let run = test.run(&["scan", "--format", "json"])?;

    assert_eq!(run.code, Some(1));
    let report: Value = serde_json::from_str(&run.stdout)?;
    assert_eq!(report["catalog"], "Resources");
    assert_eq!(report["declaredCount"], 2);
    assert_eq!(report["missing"], serde_json::json!(["Subtitle"]));
    assert_eq!(report["unused"], serde_json::json!(["Unused"]));

    let file = &report["files"][0];
    assert_eq!(file["path"], "Views/Home.cshtml");
    assert_eq!(file["references"].as_array().map(Vec::len), Some(2));
    let reference = &file["references"][0];
    assert_eq!(reference["key"], "Title");
    assert_eq!(reference["line"], 1);
    assert_eq!(reference["pattern"], "StaticMember");
    assert_eq!(reference["confidence"], "High");
    assert_eq!(reference["isDynamic"], false);

    Ok(())
}

#[test]
fn test_scan_dynamic_key_needs_review() -> Result<()> {
    let test = CliTest::with_files(&[
        (
            "Resources/Resources.resx",
            &resx(&[("Status_Open", "Open"), ("Status_Closed", "Closed")]),
        ),
        (
            "Pages/Orders.cs",
            "var label = _localizer[$\"Status_{order.Status}\"];\n// Resources.NotAKey\nvar s = \"_localizer[\\\"NotAKey\\\"]\";\n",
        ),
    ])?;

    let run = test.run(&["scan"])?;

    // Dynamic keys never make keys missing, but the declared keys now look unused
    assert_eq!(run.code, Some(0), "stderr: {}", run.stderr);
    assert!(run.stdout.contains("warning: \"Status_*\"  dynamic-key"));
    assert!(run.stdout.contains("--> Pages/Orders.cs:1:13"));
    assert!(run.stdout.contains("indexer with low confidence"));
    assert!(!run.stdout.contains("NotAKey"));

    Ok(())
}

#[test]
fn test_scan_requires_base_with_several_catalogs() -> Result<()> {
    let test = CliTest::with_files(&[
        ("Resources/Errors.resx", &resx(&[("NotFound", "Not found")])),
        ("Resources/Labels.resx", &resx(&[("Save", "Save")])),
        ("Services/Api.cs", "throw new Exception(Resources.NotFound);\n"),
    ])?;

    let run = test.run(&["scan"])?;
    assert_eq!(run.code, Some(2));
    assert!(run.stderr.contains("Errors, Labels"));
    assert!(run.stderr.contains("--base"));

    let run = test.run(&["scan", "--base", "Errors"])?;
    assert_eq!(run.code, Some(0), "stderr: {}", run.stderr);

    let run = test.run(&["scan", "--base", "Labels"])?;
    assert_eq!(run.code, Some(1));
    assert!(run.stdout.contains("\"NotFound\"  missing-key"));

    Ok(())
}

#[test]
fn test_scan_json_catalog() -> Result<()> {
    let test = CliTest::with_files(&[
        (
            "Resources/Strings.json",
            r#"{ "Greeting": "Hello", "Farewell": "Goodbye" }"#,
        ),
        (
            "src/app.ts",
            "const a = i18n.GetString(\"Greeting\");\nconst b = Translate('Farewell');\n",
        ),
    ])?;

    let run = test.run(&["scan"])?;

    assert_eq!(run.code, Some(0), "stdout: {}\nstderr: {}", run.stdout, run.stderr);
    assert!(run.stdout.contains("against \"Strings\" (2 keys)"));

    Ok(())
}

#[test]
fn test_scan_respects_config_ignores() -> Result<()> {
    let test = project()?;
    test.write_file(".rescatrc.json", r#"{ "ignores": ["**/Legacy/**"] }"#)?;
    test.write_file("Legacy/Old.cs", "var x = Resources.Removed;\n")?;
    test.write_file("Views/Home.cshtml", "<h1>@Resources.Title</h1>\n")?;
    test.write_file("Views/Other.cshtml", "<p>@Resources.Unused</p>\n")?;

    let run = test.run(&["scan"])?;

    assert_eq!(run.code, Some(0), "stdout: {}", run.stdout);
    assert!(!run.stdout.contains("Removed"));

    Ok(())
}

#[test]
fn test_scan_warns_about_unreadable_files() -> Result<()> {
    let test = project()?;
    std::fs::write(test.root().join("Views/Binary.cs"), [0x52, 0xff, 0xfe, 0x00])?;

    let run = test.run(&["scan"])?;
    assert!(run.stderr.contains("1 file(s) could not be fully scanned"));

    let run = test.run(&["scan", "-v"])?;
    assert!(run.stderr.contains("Views/Binary.cs: not valid UTF-8"));

    Ok(())
}

#[test]
fn test_scan_missing_catalog_directory() -> Result<()> {
    let test = CliTest::with_files(&[("Views/Home.cshtml", "@Resources.Title\n")])?;

    let run = test.run(&["scan"])?;

    assert_eq!(run.code, Some(2));
    assert!(run.stderr.contains("Failed to load catalogs"));

    Ok(())
}

#[test]
fn test_scan_ignores_generated_designer_file() -> Result<()> {
    let test = project()?;
    test.write_file(
        "Resources/Resources.Designer.cs",
        "internal static string Unused {\n    get { return ResourceManager.GetString(\"Unused\", resourceCulture); }\n}\n",
    )?;

    let run = test.run(&["scan"])?;

    assert_eq!(run.code, Some(1), "stderr: {}", run.stderr);
    assert!(run.stdout.contains("warning: \"Unused\"  unused-key"));
    assert!(!run.stdout.contains("Designer.cs:"));

    Ok(())
}

#[test]
fn test_scan_razor_apostrophe_before_reference() -> Result<()> {
    let test = CliTest::with_files(&[
        ("Resources/Resources.resx", &resx(&[("Save", "Save")])),
        (
            "Views/Index.cshtml",
            "<p>Don't forget to @Localizer[\"Save\"]</p>\n",
        ),
    ])?;

    let run = test.run(&["scan"])?;

    assert_eq!(run.code, Some(0), "stdout: {}", run.stdout);
    assert!(run.stdout.contains("no issues found"));

    Ok(())
}

use anyhow::Result;

use crate::{CliTest, resx};

fn project() -> Result<CliTest> {
    CliTest::with_files(&[(
        "Resources/Resources.resx",
        &resx(&[("Title", "Home"), ("Save", "Save"), ("Cancel", "Cancel")]),
    )])
}

#[test]
fn test_add_language_copies_keys() -> Result<()> {
    let test = project()?;

    let run = test.run(&["add-language", "fr", "--copy"])?;

    assert_eq!(run.code, Some(0), "stderr: {}", run.stderr);
    assert!(
        run.stdout
            .contains("Added language fr to Resources: Resources/Resources.fr.resx (3 keys)")
    );
    let content = test.read_file("Resources/Resources.fr.resx")?;
    for key in ["Title", "Save", "Cancel"] {
        assert!(content.contains(&format!("name=\"{}\"", key)));
    }
    assert!(!content.contains("Home"));

    Ok(())
}

#[test]
fn test_add_language_without_copy_creates_shell() -> Result<()> {
    let test = project()?;

    let run = test.run(&["add-language", "de-AT"])?;

    assert_eq!(run.code, Some(0), "stderr: {}", run.stderr);
    assert!(run.stdout.contains("(0 keys)"));
    let content = test.read_file("Resources/Resources.de-AT.resx")?;
    assert!(!content.contains("<data"));

    Ok(())
}

#[test]
fn test_add_language_rejects_invalid_culture() -> Result<()> {
    let test = project()?;

    let run = test.run(&["add-language", "fr_FR"])?;

    assert_eq!(run.code, Some(2));
    assert!(run.stderr.contains("Invalid culture code 'fr_FR'"));

    Ok(())
}

#[test]
fn test_add_existing_language_fails() -> Result<()> {
    let test = project()?;
    test.write_file("Resources/Resources.fr.resx", &resx(&[("Title", "Accueil")]))?;

    let run = test.run(&["add-language", "fr", "--copy"])?;

    assert_eq!(run.code, Some(2));
    assert!(run.stderr.contains("Failed to add language 'fr'"));
    assert!(run.stderr.contains("already exists"));
    assert!(test.read_file("Resources/Resources.fr.resx")?.contains("Accueil"));

    Ok(())
}

#[test]
fn test_add_language_to_new_json_catalog() -> Result<()> {
    let test = CliTest::new()?;

    let run = test.run(&[
        "add-language",
        "es",
        "--base",
        "Strings",
        "--backend",
        "json",
        "--catalog-root",
        "i18n",
    ])?;

    assert_eq!(run.code, Some(0), "stderr: {}", run.stderr);
    assert!(test.root().join("i18n/Strings.es.json").exists());

    Ok(())
}

#[test]
fn test_add_language_from_other_culture() -> Result<()> {
    let test = CliTest::with_files(&[
        ("Resources/Menu.resx", &resx(&[("File", "File")])),
        (
            "Resources/Menu.en.resx",
            &resx(&[("File", "File"), ("Edit", "Edit")]),
        ),
    ])?;

    let run = test.run(&["add-language", "it", "--from", "en", "--copy"])?;
    assert_eq!(run.code, Some(0), "stderr: {}", run.stderr);
    assert!(run.stdout.contains("(2 keys)"));

    let run = test.run(&["add-language", "ja", "--from", "ko"])?;
    assert_eq!(run.code, Some(2));
    assert!(run.stderr.contains("Language 'ko' not found in catalog 'Menu'"));

    Ok(())
}

#[test]
fn test_remove_language() -> Result<()> {
    let test = project()?;
    test.write_file("Resources/Resources.fr.resx", &resx(&[("Title", "Accueil")]))?;

    let run = test.run(&["remove-language", "fr"])?;
    assert_eq!(run.code, Some(0), "stderr: {}", run.stderr);
    assert!(
        run.stdout
            .contains("Removed language fr from Resources: Resources/Resources.fr.resx")
    );
    assert!(!test.root().join("Resources/Resources.fr.resx").exists());

    let run = test.run(&["remove-language", "fr"])?;
    assert_eq!(run.code, Some(2));
    assert!(run.stderr.contains("Language 'fr' not found"));

    Ok(())
}

use std::{
    fs,
    path::{Path, PathBuf},
    process::{Command, Output},
};

use anyhow::{Context, Ok, Result};
use insta_cmd::get_cargo_bin;
use tempfile::TempDir;

mod init;
mod language;
mod scan;
mod stats;

const BIN_NAME: &str = "rescat";

pub struct CliTest {
    _temp_dir: TempDir,
    project_dir: PathBuf,
}

impl CliTest {
    pub fn new() -> Result<Self> {
        let temp_dir = TempDir::new()?;
        let project_dir = temp_dir.path().canonicalize()?;
        // Keep config discovery inside the project
        fs::create_dir(project_dir.join(".git"))?;
        Ok(Self {
            _temp_dir: temp_dir,
            project_dir,
        })
    }

    pub fn with_files(files: &[(&str, &str)]) -> Result<Self> {
        let test = Self::new()?;
        for (path, content) in files {
            test.write_file(path, content)?;
        }
        Ok(test)
    }

    pub fn write_file(&self, path: &str, content: &str) -> Result<()> {
        let file_path = self.project_dir.join(path);

        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory:{}", parent.display()))?;
        }

        fs::write(&file_path, content)
            .with_context(|| format!("Failed to write file: {}", file_path.display()))?;

        Ok(())
    }

    pub fn root(&self) -> &Path {
        &self.project_dir
    }

    pub fn command(&self) -> Command {
        let mut cmd = Command::new(get_cargo_bin(BIN_NAME));
        cmd.current_dir(&self.project_dir);
        cmd.env_clear();
        cmd.env("NO_COLOR", "1"); // Disable colors for consistent test output
        cmd
    }

    /// Run `rescat <args>` and capture its output.
    pub fn run(&self, args: &[&str]) -> Result<Run> {
        let output = self.command().args(args).output()?;
        Ok(Run::from(output))
    }

    pub fn read_file(&self, path: &str) -> Result<String> {
        let file_path = self.project_dir.join(path);
        fs::read_to_string(&file_path)
            .with_context(|| format!("Failed to read file: {}", file_path.display()))
    }
}

/// Captured result of one CLI invocation.
pub struct Run {
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl From<Output> for Run {
    fn from(output: Output) -> Self {
        Self {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        }
    }
}

/// A `.resx` file holding `entries` as name/value pairs.
pub fn resx(entries: &[(&str, &str)]) -> String {
    let mut content = String::from("<?xml version=\"1.0\" encoding=\"utf-8\"?>\n<root>\n");
    for (name, value) in entries {
        content.push_str(&format!(
            "  <data name=\"{}\" xml:space=\"preserve\">\n    <value>{}</value>\n  </data>\n",
            name, value
        ));
    }
    content.push_str("</root>\n");
    content
}

#[test]
fn test_help() -> Result<()> {
    let test = CliTest::new()?;

    let run = test.run(&["--help"])?;

    assert_eq!(run.code, Some(0));
    for command in ["scan", "stats", "add-language", "remove-language", "backends", "init"] {
        assert!(run.stdout.contains(command), "help should list {}", command);
    }
    Ok(())
}

#[test]
fn test_no_command_prints_help() -> Result<()> {
    let test = CliTest::new()?;

    let run = test.run(&[])?;

    assert_eq!(run.code, Some(0));
    assert!(run.stdout.contains("Usage"));
    Ok(())
}

#[test]
fn test_backends() -> Result<()> {
    let test = CliTest::new()?;

    let run = test.run(&["backends"])?;

    assert_eq!(run.code, Some(0));
    assert!(run.stdout.contains("xml"));
    assert!(run.stdout.contains("(alias: resx)"));
    assert!(run.stdout.contains("json"));
    Ok(())
}

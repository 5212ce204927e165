use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Ok, Result, bail};
use glob::Pattern;
use serde::{Deserialize, Serialize};

use crate::core::{
    backend::{BackendOptions, factory},
    scanner::{Accessors, SourceSelection, sources::is_glob_pattern},
};

pub const CONFIG_FILE_NAME: &str = ".rescatrc.json";

/// Largest accepted indentation width for rendered catalogs.
const MAX_INDENT: usize = 16;

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    #[serde(default)]
    pub ignores: Vec<String>,
    #[serde(default)]
    pub includes: Vec<String>,
    #[serde(default = "default_source_root")]
    pub source_root: String,
    #[serde(default = "default_catalog_root")]
    pub catalog_root: String,
    #[serde(default = "default_source_extensions")]
    pub source_extensions: Vec<String>,
    /// Backend used when the catalog directory has no recognizable files.
    #[serde(default = "default_backend")]
    pub default_backend: String,
    #[serde(default)]
    pub backend_options: BackendOptions,
    #[serde(default = "default_resource_classes")]
    pub resource_classes: Vec<String>,
    #[serde(default = "default_localizers")]
    pub localizers: Vec<String>,
    #[serde(default = "default_wrapper_methods")]
    pub wrapper_methods: Vec<String>,
    /// Scanner worker threads; 0 uses one per CPU.
    #[serde(default)]
    pub parallelism: usize,
}

fn default_source_root() -> String {
    "./".to_string()
}

fn default_catalog_root() -> String {
    "./Resources".to_string()
}

fn default_source_extensions() -> Vec<String> {
    [
        "cs", "cshtml", "razor", "vb", "ts", "tsx", "js", "jsx", "java", "kt",
    ]
    .map(String::from)
    .to_vec()
}

fn default_backend() -> String {
    "xml".to_string()
}

fn default_resource_classes() -> Vec<String> {
    ["Resources", "Strings", "SharedResources"]
        .map(String::from)
        .to_vec()
}

fn default_localizers() -> Vec<String> {
    ["localizer", "_localizer", "Localizer", "_sharedLocalizer", "L"]
        .map(String::from)
        .to_vec()
}

fn default_wrapper_methods() -> Vec<String> {
    ["GetString", "GetLocalizedString", "Translate"]
        .map(String::from)
        .to_vec()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            ignores: Vec::new(),
            includes: Vec::new(),
            source_root: default_source_root(),
            catalog_root: default_catalog_root(),
            source_extensions: default_source_extensions(),
            default_backend: default_backend(),
            backend_options: BackendOptions::default(),
            resource_classes: default_resource_classes(),
            localizers: default_localizers(),
            wrapper_methods: default_wrapper_methods(),
            parallelism: 0,
        }
    }
}

impl Config {
    /// Validate configuration values.
    ///
    /// Checks glob patterns in `ignores` and `includes`, the default backend
    /// name and the rendering options.
    pub fn validate(&self) -> Result<()> {
        for pattern in &self.ignores {
            Pattern::new(pattern)
                .with_context(|| format!("Invalid glob pattern in 'ignores': \"{}\"", pattern))?;
        }

        // Includes without wildcards are literal paths, so "Areas/[Admin]" is fine.
        for pattern in &self.includes {
            if is_glob_pattern(pattern) {
                Pattern::new(pattern).with_context(|| {
                    format!("Invalid glob pattern in 'includes': \"{}\"", pattern)
                })?;
            }
        }

        if !factory::is_backend_available(&self.default_backend) {
            bail!(
                "Unknown 'defaultBackend': \"{}\" (available: {})",
                self.default_backend,
                factory::available_backends().join(", ")
            );
        }

        if self.source_extensions.is_empty() {
            bail!("'sourceExtensions' must not be empty");
        }

        let options = &self.backend_options;
        if options.json.indent > MAX_INDENT || options.xml.indent > MAX_INDENT {
            bail!(
                "'backendOptions' indent must be between 0 and {}",
                MAX_INDENT
            );
        }

        Ok(())
    }

    pub fn accessors(&self) -> Accessors {
        Accessors::new(
            self.resource_classes.iter().cloned(),
            self.localizers.iter().cloned(),
            self.wrapper_methods.iter().cloned(),
        )
    }

    pub fn source_selection(&self) -> SourceSelection {
        SourceSelection {
            includes: self.includes.clone(),
            ignores: self.ignores.clone(),
            extensions: self
                .source_extensions
                .iter()
                .map(|e| e.trim_start_matches('.').to_string())
                .collect(),
        }
    }
}

pub fn default_config_json() -> Result<String> {
    let config = Config::default();
    serde_json::to_string_pretty(&config).context("Failed to generate default config.")
}

pub fn find_config_file(start_dir: &Path) -> Option<PathBuf> {
    let mut current = start_dir.to_path_buf();

    loop {
        let config_path = current.join(CONFIG_FILE_NAME);
        if config_path.exists() {
            return Some(config_path);
        }
        if current.join(".git").exists() {
            return None;
        }
        if !current.pop() {
            return None;
        }
    }
}

/// Result of loading configuration.
pub struct ConfigLoadResult {
    pub config: Config,
    /// Directory holding the config file; relative roots resolve against it.
    pub base_dir: PathBuf,
    /// True if config was loaded from a file, false if using defaults.
    pub from_file: bool,
}

pub fn load_config(start_dir: &Path) -> Result<ConfigLoadResult> {
    match find_config_file(start_dir) {
        Some(path) => {
            let content = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config file: {:?}", path))?;
            let config: Config = serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {:?}", path))?;
            config.validate()?;
            let base_dir = path
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| start_dir.to_path_buf());
            Ok(ConfigLoadResult {
                config,
                base_dir,
                from_file: true,
            })
        }
        None => Ok(ConfigLoadResult {
            config: Config::default(),
            base_dir: start_dir.to_path_buf(),
            from_file: false,
        }),
    }
}

#[cfg(test)]
mod tests {
    use crate::config::*;
    use std::fs::File;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.ignores.is_empty());
        assert!(config.includes.is_empty());
        assert_eq!(config.catalog_root, "./Resources");
        assert_eq!(config.default_backend, "xml");
        assert!(config.localizers.contains(&"_localizer".to_string()));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_config() {
        let json = r#"{
              "ignores": ["**/Migrations/**"],
              "catalogRoot": "./i18n",
              "defaultBackend": "json",
              "backendOptions": { "json": { "nested": false } },
              "resourceClasses": ["AppText"],
              "parallelism": 4
          }"#;
        let config: Config = serde_json::from_str(json).unwrap();
        assert_eq!(config.ignores, vec!["**/Migrations/**"]);
        assert_eq!(config.catalog_root, "./i18n");
        assert_eq!(config.default_backend, "json");
        assert!(!config.backend_options.json.nested);
        assert_eq!(config.backend_options.json.indent, 2);
        assert_eq!(config.resource_classes, vec!["AppText"]);
        assert_eq!(config.parallelism, 4);
        assert_eq!(config.wrapper_methods, default_wrapper_methods());
    }

    #[test]
    fn test_find_config_file() {
        let dir = tempdir().unwrap();
        let sub_dir = dir.path().join("src").join("Controllers");
        fs::create_dir_all(&sub_dir).unwrap();

        let config_path = dir.path().join(CONFIG_FILE_NAME);
        File::create(&config_path).unwrap();

        let found = find_config_file(&sub_dir);
        assert_eq!(found, Some(config_path));
    }

    #[test]
    fn test_find_config_stops_at_git_root() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join(".git")).unwrap();

        assert!(find_config_file(dir.path()).is_none());
    }

    #[test]
    fn test_load_config_from_file() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join(CONFIG_FILE_NAME),
            r#"{ "ignores": ["**/obj/**"] }"#,
        )
        .unwrap();
        let nested = dir.path().join("web");
        fs::create_dir(&nested).unwrap();

        let result = load_config(&nested).unwrap();
        assert!(result.from_file);
        assert_eq!(result.base_dir, dir.path());
        assert_eq!(result.config.ignores, vec!["**/obj/**"]);
    }

    #[test]
    fn test_load_config_default_when_not_found() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join(".git")).unwrap();

        let result = load_config(dir.path()).unwrap();
        assert!(!result.from_file);
        assert_eq!(result.base_dir, dir.path());
    }

    #[test]
    fn test_validate_invalid_patterns() {
        let config = Config {
            ignores: vec!["[invalid".to_string()],
            ..Default::default()
        };
        assert!(config.validate().unwrap_err().to_string().contains("ignores"));

        let config = Config {
            includes: vec!["src/**/[invalid".to_string()],
            ..Default::default()
        };
        assert!(config.validate().unwrap_err().to_string().contains("includes"));

        let config = Config {
            includes: vec!["Areas/[Admin]".to_string()],
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_backend_and_options() {
        let config = Config {
            default_backend: "yaml".to_string(),
            ..Default::default()
        };
        assert!(config.validate().unwrap_err().to_string().contains("yaml"));

        let mut config = Config::default();
        config.backend_options.xml.indent = 64;
        assert!(config.validate().is_err());

        let config = Config {
            source_extensions: Vec::new(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_config_with_invalid_pattern_fails() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join(CONFIG_FILE_NAME),
            r#"{ "ignores": ["[invalid"] }"#,
        )
        .unwrap();

        assert!(load_config(dir.path()).is_err());
    }

    #[test]
    fn test_source_selection_strips_dots() {
        let config = Config {
            source_extensions: vec![".cs".to_string(), "razor".to_string()],
            ..Default::default()
        };
        assert_eq!(config.source_selection().extensions, vec!["cs", "razor"]);
    }

    #[test]
    fn test_default_config_json_round_trips() {
        let json = default_config_json().unwrap();
        assert!(json.contains("catalogRoot"));
        assert!(json.contains("backendOptions"));
        let config: Config = serde_json::from_str(&json).unwrap();
        assert_eq!(config.source_extensions, default_source_extensions());
    }
}

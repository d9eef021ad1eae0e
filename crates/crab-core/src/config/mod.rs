//! Project configuration model.
//!
//! [`CrabConfig`] is the typed view of the `[tool.crab]` table of a
//! `pyproject.toml` (or the root of a standalone `crab.toml`).  Every field
//! carries a default, so a document that only mentions a few keys still yields
//! a fully-populated record:
//!
//! ```toml
//! [tool.crab]
//! template = "custom"
//!
//! [tool.crab.paths]
//! source = "lib"          # tests / docs keep their defaults
//! ```
//!
//! Table-shaped sections (`paths`, the per-tool `lint` tables) are merged key
//! by key over their defaults; scalar and list fields replace the default
//! outright.
//!
//! Loading is two-staged: the raw document is parsed into a [`toml::Table`]
//! (syntax errors become [`ConfigError::Parse`]), then the namespace is
//! deserialized into the typed record (shape errors become
//! [`ConfigError::Validation`]) and finally checked by [`CrabConfig::validate`].

mod error;

use std::collections::BTreeMap;
use std::path::{Component, Path};

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

pub use error::ConfigError;

/// Dotted key path of the tool namespace inside `pyproject.toml`.
pub const TOOL_NAMESPACE: &str = "tool.crab";

/// File names treated as standalone configuration documents.
pub const STANDALONE_FILE_NAMES: &[&str] = &["crab.toml", ".crab.toml"];

const DEFAULT_TEMPLATE: &str = "basic";
const DEFAULT_VENV_DIRECTORY: &str = ".venv";
const DEFAULT_PACKAGE_INDEX: &str = "https://pypi.org/simple";

// ── Record types ──────────────────────────────────────────────────────────────

/// Fully-populated project settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CrabConfig {
    /// Template set used by `crab init` when `--template` is not given.
    pub template: String,
    /// Name of the environment directory inside the project.
    pub venv_directory: String,
    pub dependencies: DependencyConfig,
    pub lint: LintConfig,
    pub test: TestConfig,
    pub paths: PathsConfig,
}

/// Package sources and named dependency groups.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DependencyConfig {
    /// Package index URLs; the first one is the primary index.
    pub sources: Vec<String>,
    pub groups: Vec<DependencyGroup>,
}

/// A named list of package specifiers.
///
/// Both fields are required: a group without `packages` is a validation error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyGroup {
    pub name: String,
    pub packages: Vec<String>,
}

/// Lint tool selection and per-tool settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawLintConfig")]
pub struct LintConfig {
    pub enabled_tools: Vec<String>,
    /// Per-tool tables, keyed by tool name (`[tool.crab.lint.ruff]`).
    #[serde(flatten)]
    pub tools: BTreeMap<String, LintToolConfig>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LintToolConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub args: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<String>,
}

/// Shape of the `lint` table as written; defaults are merged in `From`.
#[derive(Deserialize)]
struct RawLintConfig {
    enabled_tools: Option<Vec<String>>,
    #[serde(flatten)]
    tools: BTreeMap<String, LintToolConfig>,
}

/// Test runner settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TestConfig {
    pub directory: String,
    pub pytest_args: Vec<String>,
    pub coverage: CoverageConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoverageConfig {
    pub enable: bool,
    /// Minimum coverage percentage, `0..=100`.
    pub threshold: u32,
}

/// Logical role → relative directory.
///
/// The three well-known roles are typed fields; any other role lands in
/// `extra`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    pub source: String,
    pub tests: String,
    pub docs: String,
    #[serde(flatten)]
    pub extra: BTreeMap<String, String>,
}

// ── Defaults ──────────────────────────────────────────────────────────────────

impl Default for CrabConfig {
    fn default() -> Self {
        Self {
            template: DEFAULT_TEMPLATE.into(),
            venv_directory: DEFAULT_VENV_DIRECTORY.into(),
            dependencies: DependencyConfig::default(),
            lint: LintConfig::default(),
            test: TestConfig::default(),
            paths: PathsConfig::default(),
        }
    }
}

impl Default for DependencyConfig {
    fn default() -> Self {
        Self {
            sources: vec![DEFAULT_PACKAGE_INDEX.into()],
            groups: vec![DependencyGroup {
                name: "dev".into(),
                packages: vec!["pytest".into(), "ruff".into()],
            }],
        }
    }
}

impl Default for LintConfig {
    fn default() -> Self {
        Self {
            enabled_tools: vec!["ruff".into(), "mypy".into()],
            tools: default_lint_tools(),
        }
    }
}

fn default_lint_tools() -> BTreeMap<String, LintToolConfig> {
    BTreeMap::from([(
        "ruff".to_string(),
        LintToolConfig {
            args: Some(vec!["--fix".into()]),
            config: Some("ruff.toml".into()),
        },
    )])
}

impl From<RawLintConfig> for LintConfig {
    fn from(raw: RawLintConfig) -> Self {
        let mut tools = default_lint_tools();
        tools.extend(raw.tools);
        Self {
            enabled_tools: raw
                .enabled_tools
                .unwrap_or_else(|| LintConfig::default().enabled_tools),
            tools,
        }
    }
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            directory: "tests".into(),
            pytest_args: vec!["-v".into()],
            coverage: CoverageConfig::default(),
        }
    }
}

impl Default for CoverageConfig {
    fn default() -> Self {
        Self {
            enable: true,
            threshold: 90,
        }
    }
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            source: "src".into(),
            tests: "tests".into(),
            docs: "docs".into(),
            extra: BTreeMap::new(),
        }
    }
}

// ── Loading ───────────────────────────────────────────────────────────────────

impl CrabConfig {
    /// Load and validate the `[tool.crab]` section of a `pyproject.toml`.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::NotFound`] if `path` does not exist.
    /// - [`ConfigError::MissingSection`] if the document has no `[tool.crab]`.
    /// - [`ConfigError::Parse`] if the document is not valid TOML.
    /// - [`ConfigError::Validation`] if a field is malformed.
    #[instrument(skip_all, fields(path = %path.display()))]
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = read_document(path)?;
        Self::from_document_str(&raw).map_err(|e| e.with_path(path))
    }

    /// Load a standalone document whose root table is the namespace itself.
    #[instrument(skip_all, fields(path = %path.display()))]
    pub fn load_standalone(path: &Path) -> Result<Self, ConfigError> {
        let raw = read_document(path)?;
        Self::from_standalone_str(&raw).map_err(|e| e.with_path(path))
    }

    /// Pick [`Self::load_standalone`] for `crab.toml` / `.crab.toml`, and
    /// [`Self::load`] for anything else.
    pub fn discover(path: &Path) -> Result<Self, ConfigError> {
        let standalone = path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| STANDALONE_FILE_NAMES.contains(&n));

        if standalone {
            Self::load_standalone(path)
        } else {
            Self::load(path)
        }
    }

    /// Parse a full `pyproject.toml` document.
    pub fn from_document_str(raw: &str) -> Result<Self, ConfigError> {
        let document = parse_table(raw)?;

        let section = document
            .get("tool")
            .and_then(|tool| tool.get("crab"))
            .cloned()
            .ok_or(ConfigError::MissingSection {
                namespace: TOOL_NAMESPACE,
                path: None,
            })?;

        Self::from_value(section)
    }

    /// Parse a standalone document (no namespace nesting).
    pub fn from_standalone_str(raw: &str) -> Result<Self, ConfigError> {
        let document = parse_table(raw)?;
        Self::from_value(toml::Value::Table(document))
    }

    fn from_value(section: toml::Value) -> Result<Self, ConfigError> {
        if !section.is_table() {
            return Err(ConfigError::validation(
                TOOL_NAMESPACE,
                format!("expected a table, found {}", section.type_str()),
            ));
        }

        let config: Self = section
            .try_into()
            .map_err(|e: toml::de::Error| {
                ConfigError::validation(TOOL_NAMESPACE, e.message().trim().to_string())
            })?;

        config.validate()?;
        debug!(template = %config.template, "configuration loaded");
        Ok(config)
    }

    /// Check value constraints that the type system does not capture.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.template.trim().is_empty() {
            return Err(ConfigError::validation("template", "must not be empty"));
        }

        check_relative("venv_directory", &self.venv_directory)?;
        check_relative("test.directory", &self.test.directory)?;

        for (role, dir) in self.paths.iter() {
            check_relative(&format!("paths.{role}"), dir)?;
        }

        if self.test.coverage.threshold > 100 {
            return Err(ConfigError::validation(
                "test.coverage.threshold",
                format!("{} is not a percentage (0-100)", self.test.coverage.threshold),
            ));
        }

        let mut seen = std::collections::HashSet::new();
        for group in &self.dependencies.groups {
            if group.name.trim().is_empty() {
                return Err(ConfigError::validation(
                    "dependencies.groups",
                    "group name must not be empty",
                ));
            }
            if !seen.insert(group.name.as_str()) {
                return Err(ConfigError::validation(
                    "dependencies.groups",
                    format!("duplicate group '{}'", group.name),
                ));
            }
        }

        for source in &self.dependencies.sources {
            if !(source.starts_with("https://")
                || source.starts_with("http://")
                || source.starts_with("file://"))
            {
                return Err(ConfigError::validation(
                    "dependencies.sources",
                    format!("'{source}' is not a URL"),
                ));
            }
        }

        Ok(())
    }

    // ── Accessors ────────────────────────────────────────────────────────────

    /// Directory configured for a logical role (`source`, `tests`, `docs`, …).
    pub fn path_for(&self, role: &str) -> Option<&str> {
        self.paths.get(role)
    }

    /// Look up a dependency group by name.
    pub fn group(&self, name: &str) -> Option<&DependencyGroup> {
        self.dependencies.groups.iter().find(|g| g.name == name)
    }

    /// Every package of every group, in declaration order, without duplicates.
    pub fn all_group_packages(&self) -> Vec<&str> {
        let mut out: Vec<&str> = Vec::new();
        for pkg in self
            .dependencies
            .groups
            .iter()
            .flat_map(|g| g.packages.iter())
        {
            if !out.contains(&pkg.as_str()) {
                out.push(pkg);
            }
        }
        out
    }

    /// Settings for a lint tool, if it has a table.
    pub fn lint_tool(&self, name: &str) -> Option<&LintToolConfig> {
        self.lint.tools.get(name)
    }

    /// Primary package index, if any.
    pub fn primary_source(&self) -> Option<&str> {
        self.dependencies.sources.first().map(String::as_str)
    }
}

impl PathsConfig {
    pub fn get(&self, role: &str) -> Option<&str> {
        match role {
            "source" => Some(&self.source),
            "tests" => Some(&self.tests),
            "docs" => Some(&self.docs),
            other => self.extra.get(other).map(String::as_str),
        }
    }

    /// All roles, well-known ones first.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        [
            ("source", self.source.as_str()),
            ("tests", self.tests.as_str()),
            ("docs", self.docs.as_str()),
        ]
        .into_iter()
        .chain(self.extra.iter().map(|(k, v)| (k.as_str(), v.as_str())))
    }
}

// ── helpers ───────────────────────────────────────────────────────────────────

fn read_document(path: &Path) -> Result<String, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::NotFound {
            path: path.to_path_buf(),
        });
    }

    std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

fn parse_table(raw: &str) -> Result<toml::Table, ConfigError> {
    toml::from_str::<toml::Table>(raw).map_err(|e| ConfigError::Parse {
        path: None,
        reason: e.message().trim().to_string(),
    })
}

fn check_relative(field: &str, value: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::validation(field, "must not be empty"));
    }

    let path = Path::new(value);
    if path.is_absolute()
        || path
            .components()
            .any(|c| matches!(c, Component::ParentDir | Component::RootDir | Component::Prefix(_)))
    {
        return Err(ConfigError::validation(
            field,
            format!("'{value}' must be a relative path inside the project"),
        ));
    }

    Ok(())
}

// ── tests ─────────────────────────────────────────────────────────────────────

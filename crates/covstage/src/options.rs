//! Coverage Option Resolution
//!
//! Turns a partial, user-supplied [`RawCoverageConfig`] into a fully
//! populated [`ResolvedCoverageConfig`].
//!
//! Resolution is a layered-defaults build: a fixed [`CoverageDefaults`]
//! record is overlaid field by field with whatever the user supplied. Each
//! field has one explicit merge rule:
//!
//! | Field | Rule |
//! |-------|------|
//! | `reporter` | replace, then normalize to a non-empty sequence |
//! | `reportsDirectory` | replace, then resolve against the project root |
//! | `include` / `exclude` | replace wholesale (no concatenation) |
//! | everything else | replace |
//!
//! The temporary data directory is taken from an explicit override (usually
//! the `NODE_V8_COVERAGE` environment variable, see
//! [`temp_directory_override`]) or nested under the reports directory.

use crate::result::{CovError, CovResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Component, Path, PathBuf};
use std::str::FromStr;

/// Environment variable that overrides the temporary coverage-data directory
pub const TEMP_DIRECTORY_ENV: &str = "NODE_V8_COVERAGE";

/// Default reports directory, relative to the project root
pub const DEFAULT_REPORTS_DIRECTORY: &str = "./coverage";

/// Name of the temporary directory nested under the reports directory
pub const TEMP_DIRECTORY_NAME: &str = "tmp";

/// Glob patterns excluded from coverage unless the user replaces the list
pub const DEFAULT_EXCLUDES: &[&str] = &[
    "coverage/**",
    "packages/*/test{,s}/**",
    "**/*.d.ts",
    "test{,s}/**",
    "test{,-*}.{js,cjs,mjs,ts,tsx,jsx}",
    "**/*{.,-}test.{js,cjs,mjs,ts,tsx,jsx}",
    "**/__tests__/**",
    "**/{karma,rollup,webpack,vite,vitest,jest,ava,babel,nyc}.config.{js,cjs,mjs,ts}",
    "**/.{eslint,mocha}rc.{js,cjs}",
];

/// Report format understood by the reporting engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Reporter {
    /// Clover XML
    Clover,
    /// Cobertura XML
    Cobertura,
    /// Single-page HTML application
    HtmlSpa,
    /// Static HTML pages
    Html,
    /// JSON totals only
    JsonSummary,
    /// Full JSON
    Json,
    /// LCOV tracefile plus HTML
    Lcov,
    /// LCOV tracefile only
    Lcovonly,
    /// No output
    None,
    /// TeamCity service messages
    Teamcity,
    /// LCOV written to stdout
    TextLcov,
    /// Totals table on stdout
    TextSummary,
    /// Per-file table on stdout
    Text,
}

impl Reporter {
    /// Every supported reporter, in documentation order
    pub const ALL: [Self; 13] = [
        Self::Clover,
        Self::Cobertura,
        Self::HtmlSpa,
        Self::Html,
        Self::JsonSummary,
        Self::Json,
        Self::Lcov,
        Self::Lcovonly,
        Self::None,
        Self::Teamcity,
        Self::TextLcov,
        Self::TextSummary,
        Self::Text,
    ];

    /// Name as written in configuration files and on the command line
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Clover => "clover",
            Self::Cobertura => "cobertura",
            Self::HtmlSpa => "html-spa",
            Self::Html => "html",
            Self::JsonSummary => "json-summary",
            Self::Json => "json",
            Self::Lcov => "lcov",
            Self::Lcovonly => "lcovonly",
            Self::None => "none",
            Self::Teamcity => "teamcity",
            Self::TextLcov => "text-lcov",
            Self::TextSummary => "text-summary",
            Self::Text => "text",
        }
    }
}

impl fmt::Display for Reporter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Reporter {
    type Err = CovError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|r| r.as_str() == s)
            .ok_or_else(|| CovError::UnknownReporter {
                name: s.to_string(),
            })
    }
}

/// A value that may be written either bare or as a list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Arrayable<T> {
    /// A single bare value
    One(T),
    /// A list of values
    Many(Vec<T>),
}

impl<T> Arrayable<T> {
    /// Normalize into a list, wrapping a bare value
    #[must_use]
    pub fn into_vec(self) -> Vec<T> {
        match self {
            Self::One(value) => vec![value],
            Self::Many(values) => values,
        }
    }
}

impl<T> From<T> for Arrayable<T> {
    fn from(value: T) -> Self {
        Self::One(value)
    }
}

/// User-facing coverage options; every field may be absent
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawCoverageConfig {
    /// Collect coverage at all
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    /// Where reports are written, relative to the project root or absolute
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reports_directory: Option<PathBuf>,
    /// Delete previous reports before a run
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clean: Option<bool>,
    /// Delete previous reports before a watch-mode rerun
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clean_on_rerun: Option<bool>,
    /// Report files outside the project root
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allow_external: Option<bool>,
    /// Report formats to emit
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reporter: Option<Arrayable<Reporter>>,
    /// Exclude anything under `node_modules`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exclude_node_modules: Option<bool>,
    /// Globs to include
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include: Option<Vec<String>>,
    /// Globs to exclude; replaces the default list entirely
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exclude: Option<Vec<String>>,
    /// Hide fully covered files from reports
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skip_full: Option<bool>,
}

impl RawCoverageConfig {
    /// Create an empty configuration
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a YAML document
    pub fn from_yaml_str(source: &str) -> CovResult<Self> {
        Ok(serde_yaml_ng::from_str(source)?)
    }

    /// Parse a JSON document
    pub fn from_json_str(source: &str) -> CovResult<Self> {
        Ok(serde_json::from_str(source)?)
    }

    /// Load from a file; `.json` files are parsed as JSON, everything else as YAML
    pub fn load(path: &Path) -> CovResult<Self> {
        let source = std::fs::read_to_string(path).map_err(|e| CovError::io(path, e))?;
        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        if is_json {
            Self::from_json_str(&source)
        } else {
            Self::from_yaml_str(&source)
        }
    }

    /// Layer `other` on top of `self`; fields present in `other` win
    #[must_use]
    pub fn overlay(self, other: Self) -> Self {
        Self {
            enabled: other.enabled.or(self.enabled),
            reports_directory: other.reports_directory.or(self.reports_directory),
            clean: other.clean.or(self.clean),
            clean_on_rerun: other.clean_on_rerun.or(self.clean_on_rerun),
            allow_external: other.allow_external.or(self.allow_external),
            reporter: other.reporter.or(self.reporter),
            exclude_node_modules: other.exclude_node_modules.or(self.exclude_node_modules),
            include: other.include.or(self.include),
            exclude: other.exclude.or(self.exclude),
            skip_full: other.skip_full.or(self.skip_full),
        }
    }

    /// Set enabled
    #[must_use]
    pub const fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = Some(enabled);
        self
    }

    /// Set reports directory
    #[must_use]
    pub fn with_reports_directory(mut self, dir: impl Into<PathBuf>) -> Self {
        self.reports_directory = Some(dir.into());
        self
    }

    /// Set reporter(s)
    #[must_use]
    pub fn with_reporter(mut self, reporter: impl Into<Arrayable<Reporter>>) -> Self {
        self.reporter = Some(reporter.into());
        self
    }

    /// Set clean
    #[must_use]
    pub const fn with_clean(mut self, clean: bool) -> Self {
        self.clean = Some(clean);
        self
    }

    /// Set clean on rerun
    #[must_use]
    pub const fn with_clean_on_rerun(mut self, clean: bool) -> Self {
        self.clean_on_rerun = Some(clean);
        self
    }
}

/// The fixed default record every resolution starts from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoverageDefaults {
    /// Default for `enabled`
    pub enabled: bool,
    /// Default for `clean`
    pub clean: bool,
    /// Default for `cleanOnRerun`
    pub clean_on_rerun: bool,
    /// Default for `reportsDirectory` (relative to root)
    pub reports_directory: PathBuf,
    /// Default for `excludeNodeModules`
    pub exclude_node_modules: bool,
    /// Default for `exclude`
    pub exclude: Vec<String>,
    /// Default for `reporter`
    pub reporter: Vec<Reporter>,
    /// Default for `allowExternal`
    pub allow_external: bool,
    /// Default for `include`
    pub include: Option<Vec<String>>,
    /// Default for `skipFull`
    pub skip_full: bool,
}

impl Default for CoverageDefaults {
    fn default() -> Self {
        Self {
            enabled: false,
            clean: true,
            clean_on_rerun: false,
            reports_directory: PathBuf::from(DEFAULT_REPORTS_DIRECTORY),
            exclude_node_modules: true,
            exclude: DEFAULT_EXCLUDES.iter().map(|s| (*s).to_string()).collect(),
            reporter: vec![Reporter::Text],
            allow_external: false,
            include: None,
            skip_full: false,
        }
    }
}

impl CoverageDefaults {
    /// Overlay `raw` on these defaults and resolve paths against `root`
    #[must_use]
    pub fn resolve(
        &self,
        raw: RawCoverageConfig,
        root: &Path,
        temp_override: Option<&Path>,
    ) -> ResolvedCoverageConfig {
        let reporter = raw
            .reporter
            .map(Arrayable::into_vec)
            .filter(|list| !list.is_empty())
            .unwrap_or_else(|| self.reporter.clone());

        let reports_directory = absolute_path(
            root,
            raw.reports_directory
                .as_deref()
                .unwrap_or(self.reports_directory.as_path()),
        );

        let temp_directory = match temp_override {
            Some(dir) if !dir.as_os_str().is_empty() => absolute_path(root, dir),
            _ => reports_directory.join(TEMP_DIRECTORY_NAME),
        };

        ResolvedCoverageConfig {
            root: root.to_path_buf(),
            enabled: raw.enabled.unwrap_or(self.enabled),
            clean: raw.clean.unwrap_or(self.clean),
            clean_on_rerun: raw.clean_on_rerun.unwrap_or(self.clean_on_rerun),
            reports_directory,
            temp_directory,
            exclude_node_modules: raw.exclude_node_modules.unwrap_or(self.exclude_node_modules),
            exclude: raw.exclude.unwrap_or_else(|| self.exclude.clone()),
            include: raw.include.or_else(|| self.include.clone()),
            reporter,
            allow_external: raw.allow_external.unwrap_or(self.allow_external),
            skip_full: raw.skip_full.unwrap_or(self.skip_full),
        }
    }
}

/// Fully populated coverage options; immutable once built
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedCoverageConfig {
    /// Project root the options were resolved against
    pub root: PathBuf,
    /// Collect coverage at all
    pub enabled: bool,
    /// Delete previous reports before a run
    pub clean: bool,
    /// Delete previous reports before a watch-mode rerun
    pub clean_on_rerun: bool,
    /// Absolute reports directory
    pub reports_directory: PathBuf,
    /// Absolute directory for raw per-process coverage dumps
    pub temp_directory: PathBuf,
    /// Exclude anything under `node_modules`
    pub exclude_node_modules: bool,
    /// Globs to exclude
    pub exclude: Vec<String>,
    /// Globs to include; `None` means everything not excluded
    pub include: Option<Vec<String>>,
    /// Report formats, never empty
    pub reporter: Vec<Reporter>,
    /// Report files outside the project root
    pub allow_external: bool,
    /// Hide fully covered files from reports
    pub skip_full: bool,
}

/// Resolve user options against the built-in defaults
///
/// `root` must be absolute; it is not checked. `temp_override` wins over the
/// computed temp directory when present and non-empty.
#[must_use]
pub fn resolve_coverage_options(
    raw: RawCoverageConfig,
    root: &Path,
    temp_override: Option<&Path>,
) -> ResolvedCoverageConfig {
    CoverageDefaults::default().resolve(raw, root, temp_override)
}

/// Read [`TEMP_DIRECTORY_ENV`] from the process environment
#[must_use]
pub fn temp_directory_override() -> Option<PathBuf> {
    std::env::var_os(TEMP_DIRECTORY_ENV)
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
}

/// Join `path` onto `base` and normalize `.`/`..` lexically
///
/// No filesystem access; symlinks are not resolved. `..` at the root is
/// dropped.
#[must_use]
pub fn absolute_path(base: &Path, path: &Path) -> PathBuf {
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    };

    let mut normalized = PathBuf::new();
    for component in joined.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other.as_os_str()),
        }
    }
    normalized
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn resolve(raw: RawCoverageConfig) -> ResolvedCoverageConfig {
        resolve_coverage_options(raw, Path::new("/proj"), None)
    }

    mod reporter_tests {
        use super::*;

        #[test]
        fn test_reporter_round_trips_through_name() {
            for reporter in Reporter::ALL {
                assert_eq!(reporter.as_str().parse::<Reporter>().unwrap(), reporter);
            }
        }

        #[test]
        fn test_unknown_reporter_rejected() {
            let err = "xml".parse::<Reporter>().unwrap_err();
            assert!(matches!(err, CovError::UnknownReporter { name } if name == "xml"));
        }

        #[test]
        fn test_reporter_serde_names() {
            let json = serde_json::to_string(&Reporter::HtmlSpa).unwrap();
            assert_eq!(json, "\"html-spa\"");
            let parsed: Reporter = serde_json::from_str("\"text-summary\"").unwrap();
            assert_eq!(parsed, Reporter::TextSummary);
        }
    }

    mod defaults_tests {
        use super::*;

        #[test]
        fn test_empty_config_gets_defaults() {
            let resolved = resolve(RawCoverageConfig::new());
            assert!(!resolved.enabled);
            assert!(resolved.clean);
            assert!(!resolved.clean_on_rerun);
            assert!(resolved.exclude_node_modules);
            assert!(!resolved.allow_external);
            assert!(!resolved.skip_full);
            assert_eq!(resolved.include, None);
            assert_eq!(resolved.exclude.len(), DEFAULT_EXCLUDES.len());
            assert_eq!(resolved.reporter, vec![Reporter::Text]);
        }

        #[test]
        fn test_default_directories() {
            let resolved = resolve(RawCoverageConfig::new());
            assert_eq!(resolved.reports_directory, PathBuf::from("/proj/coverage"));
            assert_eq!(resolved.temp_directory, PathBuf::from("/proj/coverage/tmp"));
            assert_eq!(resolved.root, PathBuf::from("/proj"));
        }
    }

    mod merge_tests {
        use super::*;

        #[test]
        fn test_scalar_reporter_wrapped() {
            let resolved = resolve(RawCoverageConfig::new().with_reporter(Reporter::Json));
            assert_eq!(resolved.reporter, vec![Reporter::Json]);
        }

        #[test]
        fn test_reporter_list_passes_through() {
            let list = vec![Reporter::Html, Reporter::Lcov, Reporter::Text];
            let raw = RawCoverageConfig::new().with_reporter(Arrayable::Many(list.clone()));
            let resolved = resolve(raw);
            assert_eq!(resolved.reporter, list);
        }

        #[test]
        fn test_empty_reporter_list_falls_back_to_default() {
            let raw = RawCoverageConfig::new().with_reporter(Arrayable::Many(Vec::new()));
            let resolved = resolve(raw);
            assert_eq!(resolved.reporter, vec![Reporter::Text]);
        }

        #[test]
        fn test_exclude_replaces_defaults() {
            let raw = RawCoverageConfig {
                exclude: Some(vec!["dist/**".to_string()]),
                ..RawCoverageConfig::default()
            };
            assert_eq!(resolve(raw).exclude, vec!["dist/**".to_string()]);
        }

        #[test]
        fn test_relative_reports_directory() {
            let raw = RawCoverageConfig::new().with_reports_directory("../out/./cov");
            let resolved = resolve(raw);
            assert_eq!(resolved.reports_directory, PathBuf::from("/out/cov"));
            assert_eq!(resolved.temp_directory, PathBuf::from("/out/cov/tmp"));
        }

        #[test]
        fn test_absolute_reports_directory_kept() {
            let raw = RawCoverageConfig::new().with_reports_directory("/var/reports");
            assert_eq!(
                resolve(raw).reports_directory,
                PathBuf::from("/var/reports")
            );
        }

        #[test]
        fn test_flags_overlay_defaults() {
            let raw = RawCoverageConfig {
                enabled: Some(true),
                clean: Some(false),
                clean_on_rerun: Some(true),
                allow_external: Some(true),
                exclude_node_modules: Some(false),
                skip_full: Some(true),
                include: Some(vec!["src/**".to_string()]),
                ..RawCoverageConfig::default()
            };
            let resolved = resolve(raw);
            assert!(resolved.enabled);
            assert!(!resolved.clean);
            assert!(resolved.clean_on_rerun);
            assert!(resolved.allow_external);
            assert!(!resolved.exclude_node_modules);
            assert!(resolved.skip_full);
            assert_eq!(resolved.include, Some(vec!["src/**".to_string()]));
        }
    }

    mod temp_directory_tests {
        use super::*;

        #[test]
        fn test_override_wins() {
            let raw = RawCoverageConfig::new().with_reports_directory("elsewhere");
            let override_dir = Some(Path::new("/tmp/cov-data"));
            let resolved = resolve_coverage_options(raw, Path::new("/proj"), override_dir);
            assert_eq!(resolved.temp_directory, PathBuf::from("/tmp/cov-data"));
            assert_eq!(
                resolved.reports_directory,
                PathBuf::from("/proj/elsewhere")
            );
        }

        #[test]
        fn test_empty_override_ignored() {
            let resolved = resolve_coverage_options(
                RawCoverageConfig::new(),
                Path::new("/proj"),
                Some(Path::new("")),
            );
            assert_eq!(resolved.temp_directory, PathBuf::from("/proj/coverage/tmp"));
        }
    }

    mod overlay_tests {
        use super::*;

        #[test]
        fn test_overlay_only_replaces_present_fields() {
            let file = RawCoverageConfig::new()
                .with_enabled(false)
                .with_reports_directory("reports")
                .with_reporter(Reporter::Html);
            let flags = RawCoverageConfig::new().with_enabled(true);

            let merged = file.overlay(flags);
            assert_eq!(merged.enabled, Some(true));
            assert_eq!(merged.reports_directory, Some(PathBuf::from("reports")));
            assert_eq!(merged.reporter, Some(Arrayable::One(Reporter::Html)));
        }

        #[test]
        fn test_overlay_with_empty_is_identity() {
            let file = RawCoverageConfig::new().with_clean(false);
            assert_eq!(file.clone().overlay(RawCoverageConfig::new()), file);
        }
    }

    mod parsing_tests {
        use super::*;

        #[test]
        fn test_yaml_and_json_agree() {
            let yaml = "enabled: true\nreportsDirectory: out\nreporter: lcov\ncleanOnRerun: true";
            let json = r#"{"enabled":true,"reportsDirectory":"out",
                "reporter":"lcov","cleanOnRerun":true}"#;
            let from_yaml = RawCoverageConfig::from_yaml_str(yaml).unwrap();
            let from_json = RawCoverageConfig::from_json_str(json).unwrap();
            assert_eq!(from_yaml, from_json);
            assert_eq!(from_yaml.reporter, Some(Arrayable::One(Reporter::Lcov)));
        }

        #[test]
        fn test_reporter_list_in_yaml() {
            let raw = RawCoverageConfig::from_yaml_str("reporter: [text, html]\n").unwrap();
            assert_eq!(
                raw.reporter,
                Some(Arrayable::Many(vec![Reporter::Text, Reporter::Html]))
            );
        }

        #[test]
        fn test_unknown_reporter_in_file_is_error() {
            assert!(RawCoverageConfig::from_json_str(r#"{"reporter":"xml"}"#).is_err());
        }

        #[test]
        fn test_load_by_extension() {
            let dir = tempfile::tempdir().unwrap();
            let json_path = dir.path().join("coverage.json");
            std::fs::write(&json_path, r#"{"skipFull":true}"#).unwrap();
            let yaml_path = dir.path().join("coverage.yaml");
            std::fs::write(&yaml_path, "skipFull: true\n").unwrap();

            let from_json = RawCoverageConfig::load(&json_path).unwrap();
            let from_yaml = RawCoverageConfig::load(&yaml_path).unwrap();
            assert_eq!(from_json.skip_full, Some(true));
            assert_eq!(from_yaml, from_json);
        }

        #[test]
        fn test_load_missing_file_reports_path() {
            let missing = Path::new("/nonexistent/covstage.yaml");
            let err = RawCoverageConfig::load(missing).unwrap_err();
            assert!(err.to_string().contains("/nonexistent/covstage.yaml"));
        }
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        fn any_reporter() -> impl Strategy<Value = Reporter> {
            (0..Reporter::ALL.len()).prop_map(|i| Reporter::ALL[i])
        }

        fn any_raw() -> impl Strategy<Value = RawCoverageConfig> {
            (
                proptest::option::of(any::<bool>()),
                proptest::option::of("[a-z]{1,8}(/[a-z]{1,8}){0,2}"),
                proptest::option::of(proptest::collection::vec(any_reporter(), 0..4)),
                proptest::option::of(any::<bool>()),
            )
                .prop_map(|(enabled, dir, reporter, clean)| RawCoverageConfig {
                    enabled,
                    reports_directory: dir.map(PathBuf::from),
                    reporter: reporter.map(Arrayable::Many),
                    clean,
                    ..RawCoverageConfig::default()
                })
        }

        proptest! {
            #[test]
            fn prop_reporter_never_empty(raw in any_raw()) {
                prop_assert!(!resolve(raw).reporter.is_empty());
            }

            #[test]
            fn prop_directories_absolute(raw in any_raw()) {
                let resolved = resolve(raw);
                prop_assert!(resolved.reports_directory.is_absolute());
                prop_assert!(resolved.temp_directory.is_absolute());
                prop_assert!(resolved.temp_directory.starts_with(&resolved.reports_directory));
            }

            #[test]
            fn prop_resolution_deterministic(raw in any_raw()) {
                prop_assert_eq!(resolve(raw.clone()), resolve(raw));
            }
        }
    }
}

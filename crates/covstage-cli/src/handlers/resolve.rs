//! Resolve command handler

use crate::commands::{ConfigFormat, ResolveArgs};
use crate::config::CliConfig;
use crate::error::{CliError, CliResult};
use covstage::ResolvedCoverageConfig;

/// Execute the resolve command
pub fn execute_resolve(config: &CliConfig, args: &ResolveArgs) -> CliResult<()> {
    let resolved = config.resolve_coverage(&args.flags)?;
    println!("{}", render_resolved(&resolved, args.format)?);
    Ok(())
}

/// Serialize a resolved configuration
pub fn render_resolved(
    resolved: &ResolvedCoverageConfig,
    format: ConfigFormat,
) -> CliResult<String> {
    match format {
        ConfigFormat::Json => serde_json::to_string_pretty(resolved)
            .map_err(|e| CliError::serialization(e.to_string())),
        ConfigFormat::Yaml => serde_yaml_ng::to_string(resolved)
            .map(|s| s.trim_end().to_string())
            .map_err(|e| CliError::serialization(e.to_string())),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use covstage::{resolve_coverage_options, RawCoverageConfig};
    use std::path::Path;

    fn resolved() -> ResolvedCoverageConfig {
        resolve_coverage_options(RawCoverageConfig::new(), Path::new("/proj"), None)
    }

    #[test]
    fn test_render_json_uses_camel_case() {
        let json = render_resolved(&resolved(), ConfigFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["reportsDirectory"], "/proj/coverage");
        assert_eq!(value["tempDirectory"], "/proj/coverage/tmp");
        assert_eq!(value["reporter"], serde_json::json!(["text"]));
        assert_eq!(value["include"], serde_json::Value::Null);
    }

    #[test]
    fn test_render_yaml_round_trips() {
        let yaml = render_resolved(&resolved(), ConfigFormat::Yaml).unwrap();
        let back: ResolvedCoverageConfig = serde_yaml_ng::from_str(&yaml).unwrap();
        assert_eq!(back, resolved());
    }
}

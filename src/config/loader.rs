//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::{InstanceConfig, PbkitConfig};
use super::secret::secret_string;
use crate::domain::errors::PbError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::Path;

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (${VAR} syntax)
/// 3. Parses the TOML into PbkitConfig
/// 4. Applies environment variable overrides (PBKIT_* prefix)
/// 5. Validates the configuration
///
/// # Errors
///
/// Returns an error if the file cannot be read, TOML parsing fails, a
/// referenced environment variable is unset, or validation fails.
///
/// # Examples
///
/// ```no_run
/// use pbkit::config::loader::load_config;
///
/// let config = load_config("pbkit.toml").expect("Failed to load config");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<PbkitConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(PbError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        PbError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    load_config_from_str(&contents)
}

/// Loads configuration from TOML text, with the same steps as [`load_config`]
pub fn load_config_from_str(contents: &str) -> Result<PbkitConfig> {
    let contents = substitute_env_vars(contents)?;

    let mut config: PbkitConfig = toml::from_str(&contents)
        .map_err(|e| PbError::Configuration(format!("Failed to parse TOML: {}", e)))?;

    apply_env_overrides(&mut config);

    config.validate().map_err(|e| {
        PbError::Configuration(format!("Configuration validation failed: {}", e))
    })?;

    Ok(config)
}

/// Substitutes environment variables in the format ${VAR_NAME}
///
/// Comment lines are left as-is.
///
/// # Errors
///
/// Returns an error listing every referenced variable that is not set
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
        .map_err(|e| PbError::Other(format!("invalid substitution pattern: {e}")))?;
    let mut result = String::new();
    let mut missing_vars = Vec::new();

    for line in input.lines() {
        if line.trim_start().starts_with('#') {
            result.push_str(line);
            result.push('\n');
            continue;
        }

        let mut processed_line = line.to_string();
        for cap in re.captures_iter(line) {
            let var_name = &cap[1];
            match std::env::var(var_name) {
                Ok(value) => {
                    let placeholder = format!("${{{}}}", var_name);
                    processed_line = processed_line.replace(&placeholder, &value);
                }
                Err(_) => {
                    if !missing_vars.contains(&var_name.to_string()) {
                        missing_vars.push(var_name.to_string());
                    }
                }
            }
        }
        result.push_str(&processed_line);
        result.push('\n');
    }

    if !missing_vars.is_empty() {
        return Err(PbError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(result)
}

fn apply_instance_overrides(instance: &mut InstanceConfig, prefix: &str) {
    if let Ok(val) = std::env::var(format!("{prefix}_URL")) {
        instance.url = val;
    }
    if let Ok(val) = std::env::var(format!("{prefix}_TOKEN")) {
        instance.token = Some(secret_string(val));
    }
    if let Ok(val) = std::env::var(format!("{prefix}_TIMEOUT_SECONDS")) {
        if let Ok(timeout) = val.parse() {
            instance.timeout_seconds = timeout;
        }
    }
}

/// Applies environment variable overrides using PBKIT_* prefix
///
/// Environment variables follow the pattern: PBKIT_<SECTION>_<KEY>
/// For example: PBKIT_SOURCE_URL, PBKIT_MIGRATION_BATCH_SIZE
fn apply_env_overrides(config: &mut PbkitConfig) {
    if let Ok(val) = std::env::var("PBKIT_APPLICATION_LOG_LEVEL") {
        config.application.log_level = val;
    }

    apply_instance_overrides(&mut config.source, "PBKIT_SOURCE");

    // A destination URL in the environment is enough to create the section
    if config.destination.is_none() {
        if let Ok(url) = std::env::var("PBKIT_DESTINATION_URL") {
            config.destination = Some(InstanceConfig::new(url));
        }
    }
    if let Some(ref mut destination) = config.destination {
        apply_instance_overrides(destination, "PBKIT_DESTINATION");
    }

    if let Ok(val) = std::env::var("PBKIT_MIGRATION_COLLECTION") {
        config.migration.collection = val;
    }
    if let Ok(val) = std::env::var("PBKIT_MIGRATION_SKIP_EXISTING") {
        config.migration.skip_existing = val.parse().unwrap_or(false);
    }
    if let Ok(val) = std::env::var("PBKIT_MIGRATION_BATCH_SIZE") {
        if let Ok(size) = val.parse() {
            config.migration.batch_size = size;
        }
    }

    if let Ok(val) = std::env::var("PBKIT_LOGGING_LOCAL_ENABLED") {
        config.logging.local_enabled = val.parse().unwrap_or(false);
    }
    if let Ok(val) = std::env::var("PBKIT_LOGGING_LOCAL_PATH") {
        config.logging.local_path = val;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_substitute_env_vars() {
        std::env::set_var("PBKIT_LOADER_TEST_VAR", "test_value");
        let input = "token = \"${PBKIT_LOADER_TEST_VAR}\"";
        let result = substitute_env_vars(input).unwrap();
        assert_eq!(result, "token = \"test_value\"\n");
        std::env::remove_var("PBKIT_LOADER_TEST_VAR");
    }

    #[test]
    fn test_substitute_env_vars_missing() {
        std::env::remove_var("PBKIT_LOADER_MISSING_VAR");
        let input = "token = \"${PBKIT_LOADER_MISSING_VAR}\"";
        let result = substitute_env_vars(input);
        assert!(result.is_err());
    }

    #[test]
    fn test_substitute_skips_comments() {
        let input = "# token = \"${PBKIT_LOADER_NEVER_SET}\"";
        assert!(substitute_env_vars(input).is_ok());
    }

    #[test]
    fn test_load_config_missing_file() {
        let result = load_config("nonexistent.toml");
        assert!(matches!(result, Err(PbError::Configuration(_))));
    }

    #[test]
    fn test_load_config_valid() {
        let toml_content = r#"
[source]
url = "https://source.example.com"
token = "source-token"

[destination]
url = "https://dest.example.com"
token = "dest-token"

[migration]
collection = "invoices"
skip_existing = true
batch_size = 25
"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(toml_content.as_bytes()).unwrap();
        temp_file.flush().unwrap();

        let config = load_config(temp_file.path()).unwrap();
        assert_eq!(config.source.url, "https://source.example.com");
        assert_eq!(
            config.source.token.as_ref().unwrap().expose_secret(),
            "source-token"
        );
        assert_eq!(config.migration.collection, "invoices");
        assert!(config.migration.skip_existing);
        assert_eq!(config.migration.batch_size, 25);
    }

    #[test]
    fn test_load_config_rejects_negative_batch() {
        let toml_content = r#"
[source]
url = "https://source.example.com"

[migration]
batch_size = -5
"#;
        let err = load_config_from_str(toml_content).unwrap_err();
        assert!(err.to_string().contains("batch_size"));
    }
}

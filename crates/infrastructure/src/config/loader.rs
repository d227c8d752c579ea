//! Settings file loader.

use std::path::Path;

use iffy_domain::RunnerSettings;

use super::ConfigError;

/// Supported settings file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Json,
    Yaml,
}

impl Format {
    fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        match extension.as_str() {
            "json" => Ok(Self::Json),
            "yaml" | "yml" => Ok(Self::Yaml),
            _ => Err(ConfigError::UnsupportedFormat(path.display().to_string())),
        }
    }
}

/// Reads settings from a `.json`, `.yaml` or `.yml` file.
///
/// Missing fields take their default values.
///
/// # Errors
///
/// Returns an error if the file cannot be read, has an unknown extension or
/// does not parse.
pub fn load_settings(path: impl AsRef<Path>) -> Result<RunnerSettings, ConfigError> {
    let path = path.as_ref();
    let format = Format::from_path(path)?;
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::debug!(path = %path.display(), ?format, "loading runner settings");
    parse(&content, format)
}

/// Parses settings from YAML text. JSON is valid YAML, so both are accepted.
///
/// # Errors
///
/// Returns an error if the text does not parse.
pub fn parse_settings(content: &str) -> Result<RunnerSettings, ConfigError> {
    parse(content, Format::Yaml)
}

fn parse(content: &str, format: Format) -> Result<RunnerSettings, ConfigError> {
    if content.trim().is_empty() {
        return Ok(RunnerSettings::default());
    }
    Ok(match format {
        Format::Json => serde_json::from_str(content)?,
        Format::Yaml => serde_yaml::from_str(content)?,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use std::fs;

    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    use super::*;

    fn write(dir: &TempDir, name: &str, content: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_load_yaml() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            "iffy.yaml",
            "default_headers:\n  x-suite: smoke\nlog_bodies: true\n",
        );

        let settings = load_settings(&path).unwrap();

        assert!(settings.log_bodies);
        assert_eq!(
            settings.default_headers.get("x-suite").map(String::as_str),
            Some("smoke")
        );
        assert_eq!(settings.body_preview_limit, 100);
    }

    #[test]
    fn test_load_json() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            "iffy.json",
            r#"{"default_content_type": "application/json", "body_preview_limit": 20}"#,
        );

        let settings = load_settings(&path).unwrap();

        assert_eq!(
            settings.default_content_type.as_deref(),
            Some("application/json")
        );
        assert_eq!(settings.body_preview_limit, 20);
    }

    #[test]
    fn test_empty_file_is_default() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "iffy.yml", "");
        assert_eq!(load_settings(&path).unwrap(), RunnerSettings::default());
    }

    #[test]
    fn test_unknown_extension() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "iffy.toml", "log_bodies = true");
        assert!(matches!(
            load_settings(&path),
            Err(ConfigError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_missing_file() {
        let dir = TempDir::new().unwrap();
        assert!(matches!(
            load_settings(dir.path().join("absent.yaml")),
            Err(ConfigError::Io { .. })
        ));
    }

    #[test]
    fn test_invalid_content() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "iffy.json", "{not json");
        assert!(matches!(load_settings(&path), Err(ConfigError::Json(_))));
        assert!(matches!(
            parse_settings("log_bodies: [1"),
            Err(ConfigError::Yaml(_))
        ));
    }
}

//! Environment overrides for runner settings.

use iffy_domain::RunnerSettings;

use super::ConfigError;

/// Enables body logging: `1`, `true`, `yes` or `on`.
pub const LOG_BODIES_VAR: &str = "IFFY_LOG_BODIES";
/// Maximum characters of a body shown in logs.
pub const BODY_PREVIEW_LIMIT_VAR: &str = "IFFY_BODY_PREVIEW_LIMIT";
/// Content type used for non-empty bodies that declare none.
pub const DEFAULT_CONTENT_TYPE_VAR: &str = "IFFY_DEFAULT_CONTENT_TYPE";

/// Layers environment values over `settings`.
///
/// `lookup` returns the value of a variable, if set. Pass
/// `|name| std::env::var(name).ok()` to read the process environment.
///
/// # Errors
///
/// Returns an error if a variable holds a value of the wrong shape.
pub fn apply_env_overrides<F>(
    mut settings: RunnerSettings,
    lookup: F,
) -> Result<RunnerSettings, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(value) = lookup(LOG_BODIES_VAR) {
        settings.log_bodies = parse_flag(LOG_BODIES_VAR, &value)?;
    }
    if let Some(value) = lookup(BODY_PREVIEW_LIMIT_VAR) {
        settings.body_preview_limit =
            value.trim().parse().map_err(|_| ConfigError::InvalidEnv {
                name: BODY_PREVIEW_LIMIT_VAR,
                value: value.clone(),
            })?;
    }
    if let Some(value) = lookup(DEFAULT_CONTENT_TYPE_VAR) {
        let value = value.trim();
        settings.default_content_type = (!value.is_empty()).then(|| value.to_string());
    }
    Ok(settings)
}

/// Returns default settings with the process environment applied.
///
/// # Errors
///
/// Returns an error if a variable holds a value of the wrong shape.
pub fn settings_from_env() -> Result<RunnerSettings, ConfigError> {
    apply_env_overrides(RunnerSettings::default(), |name| std::env::var(name).ok())
}

fn parse_flag(name: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        _ => Err(ConfigError::InvalidEnv {
            name,
            value: value.to_string(),
        }),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use std::collections::HashMap;

    use pretty_assertions::assert_eq;

    use super::*;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |name: &str| vars.get(name).cloned()
    }

    #[test]
    fn test_no_variables_keeps_settings() {
        let settings = RunnerSettings::default().with_default_content_type("text/plain");
        let result = apply_env_overrides(settings.clone(), env(&[])).unwrap();
        assert_eq!(result, settings);
    }

    #[test]
    fn test_overrides_apply() {
        let result = apply_env_overrides(
            RunnerSettings::default(),
            env(&[
                (LOG_BODIES_VAR, "yes"),
                (BODY_PREVIEW_LIMIT_VAR, " 40 "),
                (DEFAULT_CONTENT_TYPE_VAR, "application/json"),
            ]),
        )
        .unwrap();

        assert!(result.log_bodies);
        assert_eq!(result.body_preview_limit, 40);
        assert_eq!(
            result.default_content_type.as_deref(),
            Some("application/json")
        );
    }

    #[test]
    fn test_empty_content_type_clears_default() {
        let settings = RunnerSettings::default().with_default_content_type("text/plain");
        let result =
            apply_env_overrides(settings, env(&[(DEFAULT_CONTENT_TYPE_VAR, "")])).unwrap();
        assert_eq!(result.default_content_type, None);
    }

    #[test]
    fn test_invalid_values_are_errors() {
        let err = apply_env_overrides(RunnerSettings::default(), env(&[(LOG_BODIES_VAR, "maybe")]))
            .unwrap_err();
        assert_eq!(err.to_string(), "invalid value for IFFY_LOG_BODIES: 'maybe'");

        assert!(matches!(
            apply_env_overrides(
                RunnerSettings::default(),
                env(&[(BODY_PREVIEW_LIMIT_VAR, "-3")])
            ),
            Err(ConfigError::InvalidEnv { .. })
        ));
    }
}

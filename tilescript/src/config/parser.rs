//! INI parsing logic for converting `Ini` → `HostSettings`.
//!
//! This is the single place where INI key names are mapped to struct fields.

use std::str::FromStr;

use ini::Ini;

use super::file::ConfigFileError;
use super::settings::HostSettings;

/// Parse an `Ini` object into `HostSettings`.
///
/// Starts from `HostSettings::default()` and overlays any values found in the INI.
pub(super) fn parse_ini(ini: &Ini) -> Result<HostSettings, ConfigFileError> {
    let mut settings = HostSettings::default();

    // [source] section
    if let Some(section) = ini.section(Some("source")) {
        if let Some(v) = section.get("default_max_zoom") {
            settings.source.default_max_zoom =
                parse_number(v, "source", "default_max_zoom", "must be an integer 0-255")?;
        }
    }

    // [script] section
    if let Some(section) = ini.section(Some("script")) {
        if let Some(v) = section.get("max_operations") {
            settings.script.max_operations =
                parse_number(v, "script", "max_operations", "must be a positive integer")?;
        }
        if let Some(v) = section.get("max_call_levels") {
            settings.script.max_call_levels =
                parse_number(v, "script", "max_call_levels", "must be a positive integer")?;
        }
    }

    // [download] section
    if let Some(section) = ini.section(Some("download")) {
        if let Some(v) = section.get("timeout") {
            settings.download.timeout =
                parse_number(v, "download", "timeout", "must be a positive integer (seconds)")?;
            if settings.download.timeout == 0 {
                return Err(invalid(v, "download", "timeout", "must be greater than zero"));
            }
        }
        if let Some(v) = section.get("retries") {
            settings.download.retries =
                parse_number(v, "download", "retries", "must be a non-negative integer")?;
        }
        if let Some(v) = section.get("retry_backoff_ms") {
            settings.download.retry_backoff_ms = parse_number(
                v,
                "download",
                "retry_backoff_ms",
                "must be a non-negative integer (milliseconds)",
            )?;
        }
        if let Some(v) = section.get("user_agent") {
            let v = v.trim();
            if !v.is_empty() {
                settings.download.user_agent = v.to_string();
            }
        }
    }

    Ok(settings)
}

fn parse_number<T: FromStr>(
    value: &str,
    section: &str,
    key: &str,
    reason: &str,
) -> Result<T, ConfigFileError> {
    value
        .trim()
        .parse()
        .map_err(|_| invalid(value, section, key, reason))
}

fn invalid(value: &str, section: &str, key: &str, reason: &str) -> ConfigFileError {
    ConfigFileError::InvalidValue {
        section: section.to_string(),
        key: key.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::settings::DEFAULT_MAX_ZOOM;

    #[test]
    fn test_empty_ini_gives_defaults() {
        let ini = Ini::load_from_str("").unwrap();
        let settings = parse_ini(&ini).unwrap();
        assert_eq!(settings, HostSettings::default());
        assert_eq!(settings.source.default_max_zoom, DEFAULT_MAX_ZOOM);
    }

    #[test]
    fn test_overlays_values() {
        let ini = Ini::load_from_str(
            "[source]\ndefault_max_zoom = 19\n\
             [script]\nmax_operations = 5000\nmax_call_levels = 8\n\
             [download]\ntimeout = 5\nretries = 0\nretry_backoff_ms = 10\nuser_agent = test/1.0\n",
        )
        .unwrap();
        let settings = parse_ini(&ini).unwrap();

        assert_eq!(settings.source.default_max_zoom, 19);
        assert_eq!(settings.script.max_operations, 5000);
        assert_eq!(settings.script.max_call_levels, 8);
        assert_eq!(settings.download.timeout, 5);
        assert_eq!(settings.download.retries, 0);
        assert_eq!(settings.download.retry_backoff_ms, 10);
        assert_eq!(settings.download.user_agent, "test/1.0");
    }

    #[test]
    fn test_invalid_zoom_rejected() {
        let ini = Ini::load_from_str("[source]\ndefault_max_zoom = 300\n").unwrap();
        match parse_ini(&ini) {
            Err(ConfigFileError::InvalidValue { section, key, .. }) => {
                assert_eq!(section, "source");
                assert_eq!(key, "default_max_zoom");
            }
            other => panic!("Expected InvalidValue, got {:?}", other),
        }
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let ini = Ini::load_from_str("[download]\ntimeout = 0\n").unwrap();
        assert!(matches!(
            parse_ini(&ini),
            Err(ConfigFileError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_blank_user_agent_keeps_default() {
        let ini = Ini::load_from_str("[download]\nuser_agent =\n").unwrap();
        let settings = parse_ini(&ini).unwrap();
        assert_eq!(
            settings.download.user_agent,
            HostSettings::default().download.user_agent
        );
    }
}

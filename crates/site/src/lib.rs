//! Browser entry point that boots the checklist runtime for a JavaScript application.
//!
//! The page calls [`boot`] with the application's `init` function. `init` receives
//! `{ data, time }` and must return an object exposing `ports.outPort.subscribe`; an optional
//! `ports.tick.send` receives clock ticks. Export/import are exposed as separate wasm exports the
//! application may call directly.

use checklist_runtime::BootConfig;
use leptos::logging;

#[cfg(target_arch = "wasm32")]
mod js_app;

#[cfg(target_arch = "wasm32")]
pub use js_app::{boot, export_checklists, import_checklists, JsChecklistApp};

/// Builds the boot configuration from the page-supplied JSON override.
///
/// A missing override yields the defaults. An invalid one is logged and also yields the defaults.
pub fn boot_config_from_override(raw: Option<&str>) -> BootConfig {
    let Some(raw) = raw.filter(|raw| !raw.trim().is_empty()) else {
        return BootConfig::default();
    };
    match BootConfig::from_json(raw) {
        Ok(config) => config,
        Err(err) => {
            logging::warn!("ignoring boot config override: {err}");
            BootConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn absent_or_blank_override_uses_defaults() {
        assert_eq!(boot_config_from_override(None), BootConfig::default());
        assert_eq!(boot_config_from_override(Some("  ")), BootConfig::default());
    }

    #[test]
    fn valid_override_is_applied() {
        let config = boot_config_from_override(Some(r#"{"clock_interval_ms":250}"#));
        assert_eq!(config.clock_interval_ms, 250);
        assert_eq!(config.data_key, "data");
    }

    #[test]
    fn invalid_override_falls_back_to_defaults() {
        assert_eq!(
            boot_config_from_override(Some(r#"{"data_key":"checklists"}"#)),
            BootConfig::default()
        );
        assert_eq!(boot_config_from_override(Some("{")), BootConfig::default());
    }
}

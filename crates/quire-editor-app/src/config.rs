//! Build-time editor configuration.

use std::sync::LazyLock;

use quire_editor_browser::EditorConfig;

/// Editor options, read from the `QUIRE_EDITOR_CONFIG` JSON string baked in
/// at compile time. Missing or invalid JSON falls back to the defaults.
pub static CONFIG: LazyLock<EditorConfig> =
    LazyLock::new(|| load(option_env!("QUIRE_EDITOR_CONFIG")));

fn load(json: Option<&str>) -> EditorConfig {
    let Some(json) = json else {
        return EditorConfig::default();
    };
    match EditorConfig::from_json(json) {
        Ok(config) => config,
        Err(e) => {
            tracing::warn!("invalid QUIRE_EDITOR_CONFIG, using defaults: {e}");
            EditorConfig::default()
        }
    }
}

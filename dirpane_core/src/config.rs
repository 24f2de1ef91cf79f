//! Panel settings schema.
//!
//! Corresponds to `dirpane.toml`. A snapshot is handed to every panel through
//! a [`SettingsManager`]; panels never look settings up globally.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::command::PanelAction;
use crate::error::{PanelError, PanelResult};

/// Top-level settings snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Integrated terminal behaviour.
    pub terminal: TerminalSettings,
    /// Directory listing options.
    pub listing: ListingSettings,
    /// Key → action name bindings.
    pub keybindings: KeybindingsConfig,
    /// Visual theme.
    pub theme: Theme,
}

impl Settings {
    /// Parse settings from TOML text. Missing fields keep their defaults.
    pub fn from_toml_str(text: &str) -> PanelResult<Self> {
        toml::from_str(text).map_err(|e| PanelError::ConfigError(e.to_string()))
    }

    /// Load settings from a TOML file.
    pub fn load(path: &Path) -> PanelResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
            .map_err(|e| PanelError::ConfigError(format!("{}: {e}", path.display())))
    }
}

/// Integrated terminal settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerminalSettings {
    /// Whether the terminal starts open when nothing was persisted.
    pub start_open: bool,
    /// Shell program; `$SHELL` or the platform default when unset.
    pub shell: Option<String>,
    /// Extra arguments passed to the shell.
    pub shell_args: Vec<String>,
    /// Whether the shell follows the panel when it navigates.
    pub follow_panel_navigation: bool,
    /// Share of the panel height given to the terminal (0.0–1.0).
    pub height_ratio: f32,
}

impl Default for TerminalSettings {
    fn default() -> Self {
        Self {
            start_open: false,
            shell: None,
            shell_args: Vec::new(),
            follow_panel_navigation: true,
            height_ratio: 0.4,
        }
    }
}

/// Directory listing settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListingSettings {
    /// Whether dotfiles are listed.
    pub show_hidden: bool,
    /// Whether directories sort before files.
    pub directories_first: bool,
}

impl Default for ListingSettings {
    fn default() -> Self {
        Self { show_hidden: false, directories_first: true }
    }
}

/// Keybindings: key spec → handler name.
///
/// A `[keybindings]` table replaces the default bindings as a whole.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KeybindingsConfig {
    pub bindings: HashMap<String, String>,
}

impl Default for KeybindingsConfig {
    fn default() -> Self {
        let bindings = [
            ("Control-`", "toggleIntegratedTerminal"),
            ("Backspace", "navigateToParent"),
            ("F5", "refresh"),
            ("Control-h", "toggleHiddenFiles"),
        ];
        Self {
            bindings: bindings.iter().map(|(k, a)| ((*k).into(), (*a).into())).collect(),
        }
    }
}

impl KeybindingsConfig {
    /// Convert keybindings config into a key → action map.
    ///
    /// Bindings naming an unknown action are skipped with a warning.
    pub fn to_bindings_map(&self) -> HashMap<String, PanelAction> {
        let mut m = HashMap::new();
        for (key, name) in &self.bindings {
            match PanelAction::from_name(name) {
                Ok(action) => {
                    m.insert(key.clone(), action);
                },
                Err(e) => log::warn!("Ignoring binding for {key:?}: {e}"),
            }
        }
        m
    }
}

/// Theme colours as `#rrggbb` hex strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Theme {
    pub foreground: String,
    pub background: String,
    /// Header colour of the selected panel.
    pub selected: String,
    pub directory: String,
    pub error: String,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            foreground: "#d8d8d8".into(),
            background: "#181818".into(),
            selected: "#7cafc2".into(),
            directory: "#a1b56c".into(),
            error: "#ab4642".into(),
        }
    }
}

/// Parse a `#rrggbb` colour into its components.
pub fn parse_hex_color(color: &str) -> PanelResult<(u8, u8, u8)> {
    let invalid = || PanelError::InvalidColor(color.to_owned());
    let hex = color.strip_prefix('#').ok_or_else(invalid)?;
    if hex.len() != 6 || !hex.is_ascii() {
        return Err(invalid());
    }
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| invalid());
    Ok((channel(0)?, channel(2)?, channel(4)?))
}

/// Read-only access to the settings snapshot.
pub trait SettingsManager {
    fn settings(&self) -> &Settings;
}

/// A settings manager over a fixed snapshot.
#[derive(Debug, Clone, Default)]
pub struct StaticSettings {
    settings: Settings,
}

impl StaticSettings {
    pub fn new(settings: Settings) -> Self {
        Self { settings }
    }
}

impl SettingsManager for StaticSettings {
    fn settings(&self) -> &Settings {
        &self.settings
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_settings() {
        let settings = Settings::default();
        assert!(!settings.terminal.start_open);
        assert!(settings.terminal.follow_panel_navigation);
        assert!(settings.listing.directories_first);
        assert!(!settings.listing.show_hidden);
    }

    #[test]
    fn keybindings_to_map() {
        let map = KeybindingsConfig::default().to_bindings_map();
        assert_eq!(map.get("Control-`"), Some(&PanelAction::ToggleIntegratedTerminal));
        assert_eq!(map.get("F5"), Some(&PanelAction::Refresh));
        assert_eq!(map.len(), 4);
    }

    #[test]
    fn unknown_binding_is_skipped() {
        let mut cfg = KeybindingsConfig::default();
        cfg.bindings.insert("Control-x".into(), "selfDestruct".into());
        let map = cfg.to_bindings_map();
        assert!(!map.contains_key("Control-x"));
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let text = r##"
            [terminal]
            start_open = true
            shell = "zsh"

            [theme]
            selected = "#ff0000"
        "##;
        let settings = Settings::from_toml_str(text).unwrap();
        assert_eq!(settings.keybindings, KeybindingsConfig::default());
        assert!(settings.terminal.start_open);
        assert_eq!(settings.terminal.shell.as_deref(), Some("zsh"));
        assert!(settings.terminal.follow_panel_navigation);
        assert_eq!(settings.theme.selected, "#ff0000");
        assert_eq!(settings.theme.foreground, Theme::default().foreground);
    }

    #[test]
    fn keybindings_table_replaces_defaults() {
        let text = r#"
            [keybindings]
            "Control-t" = "toggleIntegratedTerminal"
        "#;
        let settings = Settings::from_toml_str(text).unwrap();
        let map = settings.keybindings.to_bindings_map();
        assert_eq!(map.len(), 1);
        assert_eq!(map.get("Control-t"), Some(&PanelAction::ToggleIntegratedTerminal));
    }

    #[test]
    fn malformed_toml_is_config_error() {
        let err = Settings::from_toml_str("[terminal\nstart_open = ").unwrap_err();
        assert!(matches!(err, PanelError::ConfigError(_)));
    }

    #[test]
    fn hex_colors() {
        assert_eq!(parse_hex_color("#7cafc2").unwrap(), (0x7c, 0xaf, 0xc2));
        assert!(parse_hex_color("7cafc2").is_err());
        assert!(parse_hex_color("#7caf").is_err());
        assert!(parse_hex_color("#zzzzzz").is_err());
    }

    #[test]
    fn static_settings_exposes_snapshot() {
        let mut settings = Settings::default();
        settings.terminal.start_open = true;
        let manager = StaticSettings::new(settings.clone());
        assert_eq!(manager.settings(), &settings);
    }
}

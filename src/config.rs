use serde::Deserialize;
use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::calendar::{locale, Locale};
use crate::error::{Error, ErrorKind, Result};
use crate::host::ATTENDANCE_DAY_VIEW;
use crate::widget::{ElementId, Page};

const CONFIG_PATH_ENV_VAR: &str = "SIDECAL_CONFIG_FILE";

pub(crate) fn find_configfile_locations() -> io::Result<Vec<PathBuf>> {
    let home = dirs::home_dir().ok_or_else(|| {
        io::Error::new(io::ErrorKind::Other, "Unable to find home directory")
    })?;

    let home_config = home.join(".sidecal.toml");

    let config_xdg = if let Ok(dir) = env::var("XDG_CONFIG_HOME") {
        PathBuf::from(dir).join("sidecal").join("config.toml")
    } else {
        dirs::config_dir()
            .unwrap_or_else(|| home.join(".config"))
            .join("sidecal")
            .join("config.toml")
    };

    let mut locations = vec![config_xdg, home_config];

    if let Ok(path) = env::var(CONFIG_PATH_ENV_VAR) {
        locations.insert(0, PathBuf::from(path));
    }

    Ok(locations)
}

/// Which of the calendar's elements the screen provides.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Layout {
    pub sidebar: bool,
    pub overlay: bool,
}

impl Default for Layout {
    fn default() -> Self {
        Layout {
            sidebar: true,
            overlay: true,
        }
    }
}

impl Page for Layout {
    fn has_element(&self, id: ElementId) -> bool {
        match id {
            ElementId::Calendar => self.sidebar,
            ElementId::CalendarTitle | ElementId::CalendarWidget | ElementId::CalendarOverlay => {
                self.sidebar && self.overlay
            }
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub locale: String,
    pub tick_rate_ms: u64,
    pub attendance_view: String,
    pub layout: Layout,
}

impl Default for Config {
    fn default() -> Config {
        Config {
            locale: crate::calendar::DEFAULT_LOCALE.to_owned(),
            tick_rate_ms: 500,
            attendance_view: ATTENDANCE_DAY_VIEW.to_owned(),
            layout: Layout::default(),
        }
    }
}

impl Config {
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        config.locale()?;
        Ok(config)
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_toml(&content).map_err(|e| {
            let msg = format!(
                "{} (in '{}')",
                e.message.as_deref().unwrap_or_default(),
                path.display()
            );
            e.with_msg(&msg)
        })
    }

    pub fn tick_rate(&self) -> Duration {
        Duration::from_millis(self.tick_rate_ms)
    }

    pub fn locale(&self) -> Result<&'static Locale> {
        locale(&self.locale).ok_or_else(|| {
            Error::new(
                ErrorKind::ConfigParse,
                &format!("unknown locale '{}'", self.locale),
            )
        })
    }
}

/// Loads `path` if given. Otherwise the first existing file of the default
/// locations, falling back to the built-in defaults.
pub fn load_suitable_config(path: Option<&Path>) -> Result<Config> {
    if let Some(path) = path {
        return Config::from_path(path);
    }

    let locations = find_configfile_locations().unwrap_or_else(|e| {
        log::warn!("{}", e);
        Vec::new()
    });

    match locations.iter().find(|p| p.is_file()) {
        Some(found) => {
            log::info!("Using config file '{}'", found.display());
            Config::from_path(found)
        }
        None => {
            log::info!("No config file found, using defaults");
            Ok(Config::default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let config = Config::from_toml("").unwrap();
        assert_eq!(config.locale, "en");
        assert_eq!(config.tick_rate(), Duration::from_millis(500));
        assert_eq!(config.attendance_view, ATTENDANCE_DAY_VIEW);
        assert!(config.layout.sidebar);
        assert!(config.layout.overlay);
    }

    #[test]
    fn reads_all_keys() {
        let config = Config::from_toml(
            r#"
            locale = "pl"
            tick_rate_ms = 250
            attendance_view = "attendance_day.html"

            [layout]
            overlay = false
            "#,
        )
        .unwrap();
        assert_eq!(config.locale().unwrap().code, "pl");
        assert_eq!(config.tick_rate(), Duration::from_millis(250));
        assert_eq!(config.attendance_view, "attendance_day.html");
        assert!(config.layout.sidebar);
        assert!(!config.layout.overlay);
    }

    #[test]
    fn rejects_unknown_locale() {
        let err = Config::from_toml("locale = \"tlh\"").unwrap_err();
        assert!(matches!(err.kind, ErrorKind::ConfigParse));
    }

    #[test]
    fn rejects_malformed_toml() {
        let err = Config::from_toml("locale = ").unwrap_err();
        assert!(matches!(err.kind, ErrorKind::ConfigParse));
    }

    #[test]
    fn layout_decides_which_elements_exist() {
        let layout = Layout {
            sidebar: true,
            overlay: false,
        };
        assert!(layout.has_element(ElementId::Calendar));
        assert!(!layout.has_element(ElementId::CalendarOverlay));

        let layout = Layout {
            sidebar: false,
            overlay: true,
        };
        assert!(!layout.has_element(ElementId::Calendar));
        assert!(!layout.has_element(ElementId::CalendarTitle));
    }

    #[test]
    fn explicit_missing_path_is_an_error() {
        let err = load_suitable_config(Some(Path::new("/nonexistent/sidecal.toml"))).unwrap_err();
        assert!(matches!(err.kind, ErrorKind::IOError(_)));
    }
}

//! Configuration loading.
//!
//! `defaults/regexpy.default.toml` is embedded in the binary. A user file can
//! be layered on top through [`Loader`] before the result is resolved into an
//! immutable [`Configuration`].

use std::path::{Path, PathBuf};

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, File, FileFormat, ValueKind};
use serde::Deserialize;

use crate::colour::Colour;
use crate::flags::OptionFlags;
use crate::session::Validity;

const DEFAULT_TOML: &str = include_str!("../defaults/regexpy.default.toml");

/// Colours used for pattern validity and match highlighting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub regex_valid: Colour,
    pub regex_invalid: Colour,
    pub match_foreground: Colour,
    pub match_background: Colour,
    pub group_foreground: Colour,
    pub group_background: Colour,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            regex_valid: Colour::DARK_GREEN,
            regex_invalid: Colour::RED,
            match_foreground: Colour::BLACK,
            match_background: Colour::YELLOW,
            group_foreground: Colour::WHITE,
            group_background: Colour::RED,
        }
    }
}

impl Palette {
    /// Colour for the pattern text; `None` leaves the editor's own colour.
    pub fn validity_colour(&self, validity: Validity) -> Option<Colour> {
        match validity {
            Validity::Empty => None,
            Validity::Valid => Some(self.regex_valid),
            Validity::Invalid => Some(self.regex_invalid),
        }
    }
}

/// Everything read from configuration, resolved once at start-up.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Configuration {
    pub palette: Palette,
    /// Option flags to start with.
    pub flags: OptionFlags,
}

#[derive(Debug, Deserialize)]
struct RawConfiguration {
    colours: RawColours,
    flags: OptionFlags,
}

#[derive(Debug, Deserialize)]
struct RawColours {
    regex_valid: String,
    regex_invalid: String,
    match_foreground: String,
    match_background: String,
    group_foreground: String,
    group_background: String,
}

impl RawColours {
    /// Unparseable entries fall back to the built-in colour.
    fn resolve(&self) -> Palette {
        let defaults = Palette::default();
        let pick = |name: &str, value: &str, fallback: Colour| match value.parse() {
            Ok(colour) => colour,
            Err(err) => {
                tracing::warn!(key = name, %err, fallback = %fallback, "ignoring colour");
                fallback
            }
        };
        Palette {
            regex_valid: pick("regex_valid", &self.regex_valid, defaults.regex_valid),
            regex_invalid: pick("regex_invalid", &self.regex_invalid, defaults.regex_invalid),
            match_foreground: pick(
                "match_foreground",
                &self.match_foreground,
                defaults.match_foreground,
            ),
            match_background: pick(
                "match_background",
                &self.match_background,
                defaults.match_background,
            ),
            group_foreground: pick(
                "group_foreground",
                &self.group_foreground,
                defaults.group_foreground,
            ),
            group_background: pick(
                "group_background",
                &self.group_background,
                defaults.group_background,
            ),
        }
    }
}

/// Helper for layering user overrides over the built-in defaults.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    /// Start a loader seeded with the embedded defaults.
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));
        Self { builder }
    }

    /// Layer a configuration file. Missing files trigger an error.
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(true);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Layer an optional configuration file (ignored if the file is absent).
    pub fn with_optional_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(false);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Apply a single key/value override (useful for CLI settings).
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    pub fn build(self) -> Result<Configuration, ConfigError> {
        let raw: RawConfiguration = self.builder.build()?.try_deserialize()?;
        Ok(Configuration {
            palette: raw.colours.resolve(),
            flags: raw.flags,
        })
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience helper for callers that only need the defaults.
pub fn load_defaults() -> Result<Configuration, ConfigError> {
    Loader::new().build()
}

/// `$XDG_CONFIG_HOME/regexpy/regexpy.toml`, or `~/.config/regexpy/regexpy.toml`.
pub fn user_config_path() -> Option<PathBuf> {
    let base = std::env::var_os("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .or_else(|| std::env::var_os("HOME").map(|home| PathBuf::from(home).join(".config")))?;
    Some(base.join("regexpy").join("regexpy.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_default_config() {
        let config = load_defaults().expect("defaults to deserialize");
        assert_eq!(config, Configuration::default());
    }

    #[test]
    fn supports_overrides() {
        let config = Loader::new()
            .set_override("colours.match_background", "#00ffff")
            .expect("override to apply")
            .set_override("flags.ignore_case", true)
            .expect("override to apply")
            .build()
            .expect("config to build");
        assert_eq!(config.palette.match_background, Colour::rgb(0, 0xff, 0xff));
        assert!(config.flags.ignore_case);
        assert!(!config.flags.verbose);
    }

    #[test]
    fn invalid_colour_falls_back() {
        let config = Loader::new()
            .set_override("colours.group_background", "not-a-colour")
            .expect("override to apply")
            .build()
            .expect("config to build");
        assert_eq!(config.palette.group_background, Colour::RED);
    }

    #[test]
    fn layers_user_file() {
        let dir = std::env::temp_dir().join(format!("regexpy-config-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("regexpy.toml");
        std::fs::write(&path, "[colours]\nmatch_foreground = \"blue\"\n[flags]\ndot_all = true\n")
            .unwrap();
        let config = Loader::new().with_file(&path).build().expect("config to build");
        assert_eq!(config.palette.match_foreground, Colour::rgb(0, 0, 0xff));
        assert!(config.flags.dot_all);
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn missing_optional_file_is_ignored() {
        let config = Loader::new()
            .with_optional_file("/nonexistent/regexpy.toml")
            .build()
            .expect("config to build");
        assert_eq!(config, Configuration::default());
    }

    #[test]
    fn validity_colours() {
        let palette = Palette::default();
        assert_eq!(palette.validity_colour(Validity::Empty), None);
        assert_eq!(palette.validity_colour(Validity::Valid), Some(Colour::DARK_GREEN));
        assert_eq!(palette.validity_colour(Validity::Invalid), Some(Colour::RED));
    }
}

use std::{collections::BTreeSet, path::Path, time::Duration};

use serde::{Deserialize, Serialize};

use crate::domain::{builtin::TERMINATION_ID, Category};

/// Configuration for procedure navigation.
///
/// This struct holds the timings of the navigation transition and the initial
/// state of each presentation container.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Versions", into = "Versions")]
pub struct Config {
    /// How long a procedure stays highlighted after being navigated to.
    highlight: Duration,

    /// Extra delay before scrolling when the target's category group had to
    /// be expanded first, so the revealed content can lay out.
    reveal_delay: Duration,

    /// The procedure expanded when the emergency container opens.
    ///
    /// Defaults to the flight termination procedure.
    emergency_default: String,

    /// Category groups collapsed when the browsing container opens.
    collapsed_categories: BTreeSet<Category>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            highlight: Duration::from_millis(default_highlight_ms()),
            reveal_delay: Duration::from_millis(default_reveal_delay_ms()),
            emergency_default: default_emergency(),
            collapsed_categories: default_collapsed(),
        }
    }
}

impl Config {
    /// Loads the configuration from a TOML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or if the TOML content is
    /// invalid.
    pub fn load(path: &Path) -> Result<Self, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file: {e}"))?;
        toml::from_str(&content).map_err(|e| format!("Failed to parse config file: {e}"))
    }

    /// Saves the configuration to a TOML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be serialized to TOML or if
    /// the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), String> {
        let content =
            toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize config: {e}"))?;
        std::fs::write(path, content).map_err(|e| format!("Failed to write config file: {e}"))
    }

    /// Returns the highlight duration.
    #[must_use]
    pub const fn highlight(&self) -> Duration {
        self.highlight
    }

    /// Returns the reveal delay.
    #[must_use]
    pub const fn reveal_delay(&self) -> Duration {
        self.reveal_delay
    }

    /// Returns the identifier of the procedure the emergency container opens
    /// on.
    #[must_use]
    pub fn emergency_default(&self) -> &str {
        &self.emergency_default
    }

    /// Returns the categories collapsed when the browsing container opens.
    #[must_use]
    pub const fn collapsed_categories(&self) -> &BTreeSet<Category> {
        &self.collapsed_categories
    }

    /// Sets the highlight duration.
    pub const fn set_highlight(&mut self, highlight: Duration) {
        self.highlight = highlight;
    }

    /// Sets the reveal delay.
    pub const fn set_reveal_delay(&mut self, delay: Duration) {
        self.reveal_delay = delay;
    }
}

const fn default_highlight_ms() -> u64 {
    2000
}

const fn default_reveal_delay_ms() -> u64 {
    100
}

fn default_emergency() -> String {
    TERMINATION_ID.to_string()
}

fn default_collapsed() -> BTreeSet<Category> {
    BTreeSet::from([Category::Emergency, Category::Erp])
}

/// The serialized versions of the configuration.
/// This allows for future changes to the configuration format and to the domain
/// type without breaking compatibility.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "_version")]
enum Versions {
    #[serde(rename = "1")]
    V1 {
        /// Highlight duration in milliseconds.
        #[serde(default = "default_highlight_ms")]
        highlight_ms: u64,

        /// Reveal delay in milliseconds.
        #[serde(default = "default_reveal_delay_ms")]
        reveal_delay_ms: u64,

        #[serde(default = "default_emergency")]
        emergency_default: String,

        #[serde(default = "default_collapsed")]
        collapsed_categories: BTreeSet<Category>,
    },
}

impl From<Versions> for Config {
    fn from(versions: Versions) -> Self {
        match versions {
            Versions::V1 {
                highlight_ms,
                reveal_delay_ms,
                emergency_default,
                collapsed_categories,
            } => Self {
                highlight: Duration::from_millis(highlight_ms),
                reveal_delay: Duration::from_millis(reveal_delay_ms),
                emergency_default,
                collapsed_categories,
            },
        }
    }
}

impl From<Config> for Versions {
    fn from(config: Config) -> Self {
        Self::V1 {
            highlight_ms: u64::try_from(config.highlight.as_millis()).unwrap_or(u64::MAX),
            reveal_delay_ms: u64::try_from(config.reveal_delay.as_millis()).unwrap_or(u64::MAX),
            emergency_default: config.emergency_default,
            collapsed_categories: config.collapsed_categories,
        }
    }
}

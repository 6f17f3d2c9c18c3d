//! Persisted popup settings
//!
//! Theme plus the two behavior toggles, stored in the durable store
//! under the original key names. Reads fall back to the install
//! defaults when a key is absent.

use serde::{Deserialize, Serialize};

use storageflow_store::{keys, Database};

use crate::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Auto,
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Auto => "auto",
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }
}

impl std::fmt::Display for Theme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "auto" => Ok(Theme::Auto),
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            _ => Err(format!("Unknown theme: {}", s)),
        }
    }
}

pub struct Settings {
    store: Database,
}

impl Settings {
    pub fn new(store: Database) -> Self {
        Self { store }
    }

    pub fn theme(&self) -> Result<Theme> {
        let stored: Option<String> = self.store.get_json(keys::THEME)?;
        Ok(stored
            .and_then(|s| s.parse().ok())
            .unwrap_or(Theme::Auto))
    }

    pub fn set_theme(&self, theme: Theme) -> Result<()> {
        self.store.set_json(keys::THEME, &theme.as_str())?;
        Ok(())
    }

    pub fn confirm_delete(&self) -> Result<bool> {
        Ok(self.store.get_json(keys::CONFIRM_DELETE)?.unwrap_or(true))
    }

    pub fn set_confirm_delete(&self, enabled: bool) -> Result<()> {
        self.store.set_json(keys::CONFIRM_DELETE, &enabled)?;
        Ok(())
    }

    pub fn auto_backup(&self) -> Result<bool> {
        Ok(self.store.get_json(keys::AUTO_BACKUP)?.unwrap_or(false))
    }

    pub fn set_auto_backup(&self, enabled: bool) -> Result<()> {
        self.store.set_json(keys::AUTO_BACKUP, &enabled)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_when_unset() {
        let settings = Settings::new(Database::open_in_memory().unwrap());
        assert_eq!(settings.theme().unwrap(), Theme::Auto);
        assert!(settings.confirm_delete().unwrap());
        assert!(!settings.auto_backup().unwrap());
    }

    #[test]
    fn test_roundtrip() {
        let settings = Settings::new(Database::open_in_memory().unwrap());

        settings.set_theme(Theme::Dark).unwrap();
        settings.set_confirm_delete(false).unwrap();
        settings.set_auto_backup(true).unwrap();

        assert_eq!(settings.theme().unwrap(), Theme::Dark);
        assert!(!settings.confirm_delete().unwrap());
        assert!(settings.auto_backup().unwrap());
    }

    #[test]
    fn test_unknown_stored_theme_falls_back() {
        let db = Database::open_in_memory().unwrap();
        db.set_json(keys::THEME, &"hotdog-stand").unwrap();

        let settings = Settings::new(db);
        assert_eq!(settings.theme().unwrap(), Theme::Auto);
    }
}

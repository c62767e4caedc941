use std::sync::Arc;

use tracing::{info, warn};

use super::preferences::PreferenceStore;
use crate::platform::Platform;

/// Storage key for the persisted dark-mode flag
pub const DARK_THEME_KEY: &str = "darkTheme";

/// Light/dark visual mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ThemeMode {
    #[default]
    Light,
    Dark,
}

impl ThemeMode {
    pub fn is_dark(self) -> bool {
        self == ThemeMode::Dark
    }

    /// The iced theme applied to the whole window
    pub fn iced_theme(self) -> iced::Theme {
        match self {
            ThemeMode::Light => iced::Theme::Light,
            ThemeMode::Dark => iced::Theme::Dark,
        }
    }
}

/// Owns the current theme and its persisted preference
pub struct ThemeController {
    mode: ThemeMode,
    platform: Platform,
    store: Arc<dyn PreferenceStore>,
}

impl ThemeController {
    /// Starts in light mode; call `init` to apply the saved preference
    pub fn new(platform: Platform, store: Arc<dyn PreferenceStore>) -> Self {
        Self {
            mode: ThemeMode::Light,
            platform,
            store,
        }
    }

    /// Seed the mode from the stored flag, or from the OS preference when
    /// nothing is stored. Does nothing outside an interactive session.
    pub fn init(&mut self) {
        if !self.platform.interactive {
            return;
        }

        match self.store.get(DARK_THEME_KEY).as_deref() {
            Some("true") => self.mode = ThemeMode::Dark,
            Some(_) => self.mode = ThemeMode::Light,
            None if self.platform.prefers_dark => self.mode = ThemeMode::Dark,
            None => {}
        }
        info!("🎨 Theme initialized: {:?}", self.mode);
    }

    /// Flip light/dark and persist the new flag
    pub fn toggle(&mut self) -> ThemeMode {
        self.mode = match self.mode {
            ThemeMode::Light => ThemeMode::Dark,
            ThemeMode::Dark => ThemeMode::Light,
        };

        if self.platform.interactive {
            let value = if self.mode.is_dark() { "true" } else { "false" };
            if let Err(err) = self.store.set(DARK_THEME_KEY, value) {
                warn!("⚠️  Could not save theme preference: {}", err);
            }
        }

        self.mode
    }

    pub fn mode(&self) -> ThemeMode {
        self.mode
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::preferences::MemoryStore;

    fn desktop(prefers_dark: bool) -> Platform {
        Platform {
            interactive: true,
            prefers_dark,
        }
    }

    #[test]
    fn test_default_is_light() {
        let controller = ThemeController::new(desktop(false), Arc::new(MemoryStore::new()));
        assert_eq!(controller.mode(), ThemeMode::Light);
    }

    #[test]
    fn test_os_preference_used_when_nothing_stored() {
        let store = Arc::new(MemoryStore::new());
        let mut controller = ThemeController::new(desktop(true), store.clone());

        controller.init();
        assert_eq!(controller.mode(), ThemeMode::Dark);

        assert_eq!(controller.toggle(), ThemeMode::Light);
        assert_eq!(store.get(DARK_THEME_KEY).as_deref(), Some("false"));
    }

    #[test]
    fn test_stored_flag_overrides_os_preference() {
        let store = Arc::new(MemoryStore::new());
        store.set(DARK_THEME_KEY, "false").unwrap();

        let mut controller = ThemeController::new(desktop(true), store);
        controller.init();
        assert_eq!(controller.mode(), ThemeMode::Light);
    }

    #[test]
    fn test_stored_dark_flag_applies() {
        let store = Arc::new(MemoryStore::new());
        store.set(DARK_THEME_KEY, "true").unwrap();

        let mut controller = ThemeController::new(desktop(false), store);
        controller.init();
        assert_eq!(controller.mode(), ThemeMode::Dark);
        assert_eq!(controller.mode().iced_theme(), iced::Theme::Dark);
    }

    #[test]
    fn test_toggle_persists_true() {
        let store = Arc::new(MemoryStore::new());
        let mut controller = ThemeController::new(desktop(false), store.clone());
        controller.init();

        assert_eq!(controller.toggle(), ThemeMode::Dark);
        assert_eq!(store.get(DARK_THEME_KEY).as_deref(), Some("true"));
    }

    #[test]
    fn test_headless_never_reads_or_writes() {
        let store = Arc::new(MemoryStore::new());
        store.set(DARK_THEME_KEY, "true").unwrap();

        let mut controller = ThemeController::new(Platform::headless(), store.clone());
        controller.init();
        assert_eq!(controller.mode(), ThemeMode::Light);

        controller.toggle();
        assert_eq!(store.get(DARK_THEME_KEY).as_deref(), Some("true"));
    }
}

/// Execution-context capabilities, decided once at startup
///
/// Everything that behaves differently between an interactive desktop
/// session and a non-interactive run reads this value instead of probing
/// the environment itself.

/// What the current execution context can do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Platform {
    /// Whether images can be rendered and a visual theme applied
    pub interactive: bool,
    /// OS-level dark color scheme preference
    pub prefers_dark: bool,
}

impl Platform {
    /// Detect the desktop session the binary is running in
    pub fn detect() -> Self {
        let prefers_dark = std::env::var("GTK_THEME")
            .ok()
            .and_then(|name| scheme_from_theme_name(&name))
            .unwrap_or(false);

        Platform {
            interactive: true,
            prefers_dark,
        }
    }

    /// A non-interactive context: no images, no theming, no persistence
    #[cfg(test)]
    pub fn headless() -> Self {
        Platform {
            interactive: false,
            prefers_dark: false,
        }
    }

    /// Whether image resources can be loaded and shown
    pub fn renders_images(&self) -> bool {
        self.interactive
    }
}

/// Map a desktop theme name such as "Adwaita:dark" to a dark/light flag
fn scheme_from_theme_name(theme_name: &str) -> Option<bool> {
    let normalized = theme_name.trim().to_ascii_lowercase();
    if normalized.is_empty() {
        return None;
    }
    Some(normalized.contains("dark"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_theme_name_detection() {
        assert_eq!(scheme_from_theme_name("Adwaita:dark"), Some(true));
        assert_eq!(scheme_from_theme_name("Breeze-Dark"), Some(true));
        assert_eq!(scheme_from_theme_name("Adwaita"), Some(false));
        assert_eq!(scheme_from_theme_name("  "), None);
    }

    #[test]
    fn test_headless_cannot_render() {
        assert!(!Platform::headless().renders_images());
    }
}

//! Dark-mode preference: one stringified boolean under a fixed key.
//!
//! Read once at startup, written on every toggle. Anything other than the
//! literal `"true"` reads as light mode.

use eframe::egui;

pub const DARK_MODE_KEY: &str = "dark_mode";

/// Parse a stored flag value.
pub fn parse_flag(value: &str) -> bool {
    value.trim() == "true"
}

/// Read the dark-mode preference. Missing storage or key means light mode.
pub fn read_dark_mode(storage: Option<&dyn eframe::Storage>) -> bool {
    storage
        .and_then(|s| s.get_string(DARK_MODE_KEY))
        .map(|v| parse_flag(&v))
        .unwrap_or(false)
}

/// Persist the dark-mode preference.
pub fn write_dark_mode(storage: &mut dyn eframe::Storage, enabled: bool) {
    storage.set_string(DARK_MODE_KEY, enabled.to_string());
}

/// Visuals for the current preference. The dark theme leans toward the
/// page's matrix-rain palette; the light theme stays close to stock egui.
pub fn visuals(dark: bool) -> egui::Visuals {
    if dark {
        let mut vis = egui::Visuals::dark();
        vis.panel_fill = egui::Color32::from_rgb(10, 14, 12);
        vis.window_fill = egui::Color32::from_rgb(14, 18, 16);
        vis.extreme_bg_color = egui::Color32::from_rgb(8, 10, 9);
        vis
    } else {
        let mut vis = egui::Visuals::light();
        vis.panel_fill = egui::Color32::from_rgb(248, 248, 244);
        vis
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[derive(Default)]
    struct MemStorage {
        map: HashMap<String, String>,
    }

    impl eframe::Storage for MemStorage {
        fn get_string(&self, key: &str) -> Option<String> {
            self.map.get(key).cloned()
        }

        fn set_string(&mut self, key: &str, value: String) {
            self.map.insert(key.to_string(), value);
        }

        fn flush(&mut self) {}
    }

    #[test]
    fn defaults_to_light() {
        assert!(!read_dark_mode(None));
        let storage = MemStorage::default();
        assert!(!read_dark_mode(Some(&storage)));
    }

    #[test]
    fn round_trips_through_storage() {
        let mut storage = MemStorage::default();

        write_dark_mode(&mut storage, true);
        assert!(read_dark_mode(Some(&storage)));

        write_dark_mode(&mut storage, false);
        assert!(!read_dark_mode(Some(&storage)));
    }

    #[test]
    fn stores_the_stringified_boolean() {
        let mut storage = MemStorage::default();
        write_dark_mode(&mut storage, true);
        assert_eq!(storage.map.get(DARK_MODE_KEY).map(String::as_str), Some("true"));
    }

    #[test]
    fn garbage_values_read_as_light() {
        assert!(parse_flag("true"));
        assert!(parse_flag(" true "));
        assert!(!parse_flag("false"));
        assert!(!parse_flag("TRUE"));
        assert!(!parse_flag("1"));
        assert!(!parse_flag(""));
    }

    #[test]
    fn visuals_follow_the_flag() {
        assert!(visuals(true).dark_mode);
        assert!(!visuals(false).dark_mode);
    }
}

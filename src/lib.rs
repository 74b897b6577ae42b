pub mod content;
pub mod prefs;
pub mod rain;
pub mod scene;

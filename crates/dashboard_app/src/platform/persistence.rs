use dashboard_core::{Theme, THEME_KEY};
use dashboard_engine::PreferenceStore;
use dashboard_logging::{dashboard_error, dashboard_info, dashboard_warn};

/// Reads the saved theme; unreadable or unknown values fall back to light.
pub(crate) fn load_theme(store: &PreferenceStore) -> Theme {
    match store.get(THEME_KEY) {
        Ok(value) => {
            let theme = Theme::from_stored(value.as_deref());
            dashboard_info!("theme {} loaded from {:?}", theme, store.path());
            theme
        }
        Err(err) => {
            dashboard_warn!("Failed to read preferences from {:?}: {}", store.path(), err);
            Theme::default()
        }
    }
}

pub(crate) fn save_theme(store: &PreferenceStore, theme: Theme) {
    if let Err(err) = store.set(THEME_KEY, theme.as_str()) {
        dashboard_error!("Failed to save theme to {:?}: {}", store.path(), err);
    }
}

use dashboard_core::{update, AppState, Effect, Msg, Theme};

#[test]
fn stored_theme_falls_back_to_light() {
    assert_eq!(Theme::from_stored(None), Theme::Light);
    assert_eq!(Theme::from_stored(Some("dark")), Theme::Dark);
    assert_eq!(Theme::from_stored(Some("solarized")), Theme::Light);
}

#[test]
fn toggle_flips_and_persists() {
    let (state, effects) = update(AppState::new(), Msg::ThemeLoaded(Theme::Dark));
    assert!(effects.is_empty());
    assert_eq!(state.theme(), Theme::Dark);

    let (state, effects) = update(state, Msg::ThemeToggled);
    assert_eq!(state.view().theme, Theme::Light);
    assert_eq!(effects, vec![Effect::PersistTheme(Theme::Light)]);
}

#[test]
fn theme_is_independent_of_polling() {
    let (state, _) = update(
        AppState::new(),
        Msg::StartClicked {
            kind: dashboard_core::JobKind::Olx,
        },
    );
    let (state, effects) = update(state, Msg::ThemeToggled);

    assert_eq!(effects, vec![Effect::PersistTheme(Theme::Dark)]);
    assert!(!state.can_start());
}

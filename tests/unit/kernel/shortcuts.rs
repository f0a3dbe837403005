use super::*;
use crate::core::parse_key_chord;

fn key(chord: &str) -> KeyEvent {
    parse_key_chord(chord).unwrap()
}

#[test]
fn default_table_covers_every_action_once() {
    let table = default_shortcuts();
    assert_eq!(table.len(), ShortcutAction::ALL.len());
    for action in ShortcutAction::ALL {
        assert_eq!(table.iter().filter(|s| s.action == action).count(), 1);
        assert_eq!(ShortcutAction::from_name(action.name()), Some(action));
    }
}

#[test]
fn matching_ignores_key_case_but_not_modifiers() {
    let registry = ShortcutRegistry::default();
    let save = registry.shortcut_for(ShortcutAction::Save).unwrap();

    assert!(save.matches(&key("ctrl+s")));
    assert!(save.matches(&key("ctrl+S")));
    assert!(!save.matches(&key("ctrl+shift+s")));
    assert!(!save.matches(&key("ctrl+alt+s")));
    assert!(!save.matches(&key("s")));
}

#[test]
fn format_orders_modifiers_and_uppercases_single_chars() {
    let registry = ShortcutRegistry::default();
    let fmt = |action| registry.shortcut_for(action).unwrap().format();

    assert_eq!(fmt(ShortcutAction::SaveAll), "Ctrl+Shift+S");
    assert_eq!(fmt(ShortcutAction::FormatDocument), "Shift+Alt+F");
    assert_eq!(fmt(ShortcutAction::ToggleFullScreen), "F11");
    assert_eq!(fmt(ShortcutAction::ToggleTerminal), "Ctrl+`");

    let space = Shortcut {
        key: " ",
        modifiers: Modifiers {
            meta: true,
            ..Modifiers::NONE
        },
        ..registry.shortcut_for(ShortcutAction::Save).unwrap().clone()
    };
    assert_eq!(space.format(), "Meta+Space");
}

#[test]
fn resolve_requires_a_registered_handler() {
    let mut registry = ShortcutRegistry::default();
    assert_eq!(registry.resolve(&key("ctrl+s"), false), None);

    assert!(registry.register_handler(ShortcutAction::Save));
    assert!(!registry.register_handler(ShortcutAction::Save));
    let hit = registry.resolve(&key("ctrl+s"), false).unwrap();
    assert_eq!(hit.action, ShortcutAction::Save);
    assert!(hit.prevent_default);

    assert!(registry.unregister_handler(ShortcutAction::Save));
    assert_eq!(registry.resolve(&key("ctrl+s"), false), None);
}

#[test]
fn text_input_only_allows_global_shortcuts() {
    let registry = ShortcutRegistry::with_all_handlers();

    assert_eq!(
        registry.resolve(&key("ctrl+z"), false).map(|h| h.action),
        Some(ShortcutAction::Undo)
    );
    assert_eq!(registry.resolve(&key("ctrl+z"), true), None);
    assert_eq!(
        registry.resolve(&key("ctrl+p"), true).map(|h| h.action),
        Some(ShortcutAction::QuickOpen)
    );
}

#[test]
fn clipboard_shortcuts_do_not_prevent_default() {
    let registry = ShortcutRegistry::with_all_handlers();
    for chord in ["ctrl+x", "ctrl+c", "ctrl+v"] {
        assert!(!registry.resolve(&key(chord), false).unwrap().prevent_default);
    }
}

#[test]
fn first_matching_shortcut_with_handler_wins() {
    let mut shortcuts = default_shortcuts().to_vec();
    let mut duplicate = shortcuts[0].clone();
    duplicate.action = ShortcutAction::ChangeTheme;
    shortcuts.insert(0, duplicate);

    let mut registry = ShortcutRegistry::new(shortcuts);
    registry.register_handler(ShortcutAction::Save);
    assert_eq!(
        registry.resolve(&key("ctrl+s"), false).map(|h| h.action),
        Some(ShortcutAction::Save)
    );

    registry.register_handler(ShortcutAction::ChangeTheme);
    assert_eq!(
        registry.resolve(&key("ctrl+s"), false).map(|h| h.action),
        Some(ShortcutAction::ChangeTheme)
    );
}

#[test]
fn filter_matches_description_or_chord() {
    let registry = ShortcutRegistry::default();
    let describe = |s: &Shortcut| s.description.to_string();

    let found = registry.filter("minimap", describe);
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].action, ShortcutAction::ToggleMinimap);

    let found = registry.filter("ctrl+shift+", describe);
    assert!(found.iter().all(|s| s.modifiers == Modifiers::CTRL_SHIFT));
    assert_eq!(found.len(), 5);

    assert_eq!(registry.filter("  ", describe).len(), 30);
}

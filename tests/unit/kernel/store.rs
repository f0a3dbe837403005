use super::*;
use crate::core::{parse_key_chord, KeyEvent};
use crate::kernel::services::ports::{
    CommandResult, EditorSettings, Locale, ShellKind, ShellSession, Theme, WordWrap,
};
use crate::models::{default_project, NodeId};
use compact_str::CompactString;

fn new_store() -> Store {
    let tree = default_project().unwrap();
    Store::new(AppState::new(tree, EditorSettings::default()))
}

fn file(store: &Store, path: &str) -> NodeId {
    store.state().tree.find_by_path(path).unwrap()
}

fn press(store: &mut Store, chord: &str) -> DispatchResult {
    store.dispatch(Action::KeyPressed {
        event: parse_key_chord(chord).unwrap(),
        in_text_input: false,
    })
}

fn session(n: u32) -> ShellSession {
    ShellSession {
        id: compact_str::format_compact!("terminal-{}", n),
        kind: ShellKind::Bash,
        cwd: "/home/user".to_string(),
        process_id: 1234,
    }
}

#[test]
fn revision_bumps_only_on_state_change() {
    let mut store = new_store();
    let mut rx = store.subscribe();
    let index = file(&store, "index.html");

    assert!(store.dispatch(Action::SelectFile(index)).state_changed);
    assert_eq!(store.revision(), 1);
    assert!(rx.has_changed().unwrap());
    assert_eq!(*rx.borrow_and_update(), 1);

    assert!(!store.dispatch(Action::SelectFile(index)).state_changed);
    assert_eq!(store.revision(), 1);
    assert!(!rx.has_changed().unwrap());
}

#[test]
fn selecting_folder_or_unknown_id_is_noop() {
    let mut store = new_store();
    let src = file(&store, "src");
    assert!(!store.dispatch(Action::SelectFile(src)).state_changed);
    assert!(store.state().tabs.open_files().is_empty());
}

#[test]
fn closing_active_tab_falls_back_to_last() {
    let mut store = new_store();
    let a = file(&store, "index.html");
    let b = file(&store, "styles.css");
    let c = file(&store, "main.js");
    for id in [a, b, c] {
        store.dispatch(Action::SelectFile(id));
    }
    store.dispatch(Action::SelectFile(a));
    store.dispatch(Action::CloseTab(a));
    assert_eq!(store.state().tabs.active(), Some(c));

    store.dispatch(Action::CloseAllTabs);
    assert_eq!(store.state().tabs.active(), None);
}

#[test]
fn edits_mark_dirty_and_save_marks_clean() {
    let mut store = new_store();
    let main = file(&store, "main.js");
    store.dispatch(Action::SelectFile(main));

    store.dispatch(Action::EditorContentChanged {
        file: main,
        content: "let x = 1;".to_string(),
    });
    let node = store.state().tree.resolve(main).unwrap();
    assert!(node.is_dirty());
    assert_eq!(node.content(), "let x = 1;");

    let result = press(&mut store, "ctrl+s");
    assert!(result.state_changed);
    assert!(result.prevent_default);
    assert!(!store.state().tree.resolve(main).unwrap().is_dirty());
}

#[test]
fn save_all_cleans_open_files_only() {
    let mut store = new_store();
    let untitled = file(&store, "untitled-1.js");
    let main = file(&store, "main.js");
    store.dispatch(Action::EditorContentChanged {
        file: main,
        content: "changed".to_string(),
    });
    store.dispatch(Action::SelectFile(untitled));

    press(&mut store, "ctrl+shift+s");
    assert!(!store.state().tree.resolve(untitled).unwrap().is_dirty());
    assert!(store.state().tree.resolve(main).unwrap().is_dirty());
}

#[test]
fn content_change_for_unknown_file_is_ignored() {
    let mut store = new_store();
    let src = file(&store, "src");
    let result = store.dispatch(Action::EditorContentChanged {
        file: src,
        content: "x".to_string(),
    });
    assert!(!result.state_changed);
}

#[test]
fn new_file_shortcut_creates_next_untitled() {
    let mut store = new_store();
    press(&mut store, "ctrl+n");
    press(&mut store, "ctrl+n");

    let second = file(&store, "untitled-2.js");
    let third = file(&store, "untitled-3.js");
    let node = store.state().tree.resolve(third).unwrap();
    assert!(node.is_dirty());
    assert_eq!(node.content(), "");
    assert_eq!(node.language(), Some(LanguageId::JavaScript));
    assert_eq!(store.state().tabs.open_files(), &[second, third]);
    assert_eq!(store.state().tabs.active(), Some(third));
    assert!(store.state().tree.validate().is_ok());
}

#[test]
fn new_item_draft_creates_under_parent() {
    let mut store = new_store();
    let src = file(&store, "src");
    assert!(!store.state().tree.is_expanded(src));

    store.dispatch(Action::ExplorerBeginNewItem {
        kind: NewItemKind::File,
        parent: src,
    });
    store.dispatch(Action::ExplorerSetNewItemName("  lib.ts ".to_string()));
    assert!(store.dispatch(Action::ExplorerCommitNewItem).state_changed);

    let created = file(&store, "src/lib.ts");
    let node = store.state().tree.resolve(created).unwrap();
    assert_eq!(node.language(), Some(LanguageId::TypeScript));
    assert!(store.state().tree.is_expanded(src));
    assert_eq!(store.state().tabs.active(), Some(created));
    assert!(store.state().ui.new_item.is_none());
}

#[test]
fn new_item_under_file_uses_its_folder() {
    let mut store = new_store();
    let app = file(&store, "src/app.js");
    store.dispatch(Action::ExplorerBeginNewItem {
        kind: NewItemKind::Folder,
        parent: app,
    });
    store.dispatch(Action::ExplorerSetNewItemName("components".to_string()));
    store.dispatch(Action::ExplorerCommitNewItem);

    let folder = file(&store, "src/components");
    assert!(store.state().tree.is_folder(folder));
    assert!(store.state().tabs.open_files().is_empty());
}

#[test]
fn blank_new_item_name_cancels() {
    let mut store = new_store();
    let root = store.state().tree.root();
    let before = store.state().tree.len();
    store.dispatch(Action::ExplorerBeginNewItem {
        kind: NewItemKind::File,
        parent: root,
    });
    store.dispatch(Action::ExplorerSetNewItemName("   ".to_string()));
    store.dispatch(Action::ExplorerCommitNewItem);

    assert_eq!(store.state().tree.len(), before);
    assert!(store.state().ui.new_item.is_none());
}

#[test]
fn search_open_match_selects_and_reveals() {
    let mut store = new_store();
    store.dispatch(Action::SearchSetQuery("function".to_string()));
    let first = store.state().search.files[0].result.clone();
    let line = first.matches[0].line;

    let result = store.dispatch(Action::SearchOpenMatch {
        file: first.file_id,
        line,
    });
    assert_eq!(
        result.effects,
        vec![Effect::RevealLine {
            file: first.file_id,
            line
        }]
    );
    assert_eq!(store.state().tabs.active(), Some(first.file_id));
}

#[test]
fn editing_refreshes_search_results() {
    let mut store = new_store();
    store.dispatch(Action::SearchSetQuery("zebra".to_string()));
    assert_eq!(store.state().search.total_matches, 0);

    let main = file(&store, "main.js");
    store.dispatch(Action::EditorContentChanged {
        file: main,
        content: "zebra\nZebra".to_string(),
    });
    assert_eq!(store.state().search.total_matches, 2);
}

#[test]
fn invalid_regex_reports_failure() {
    let mut store = new_store();
    store.dispatch(Action::SearchToggleRegex);
    store.dispatch(Action::SearchSetQuery("[unclosed".to_string()));
    assert!(store.state().search.is_failed());
    assert!(store.state().search.files.is_empty());
}

#[test]
fn find_in_files_shows_search_sidebar() {
    let mut store = new_store();
    press(&mut store, "ctrl+b");
    assert!(!store.state().settings.sidebar_visible);

    let result = press(&mut store, "ctrl+shift+f");
    assert!(store.state().settings.sidebar_visible);
    assert_eq!(store.state().ui.sidebar_tab, SidebarTab::Search);
    assert_eq!(
        result.effects,
        vec![Effect::PersistSettings(SettingsPatch {
            sidebar_visible: Some(true),
            ..SettingsPatch::default()
        })]
    );
}

#[test]
fn zoom_is_clamped_and_persisted() {
    let mut store = new_store();
    for _ in 0..40 {
        press(&mut store, "ctrl+=");
    }
    assert_eq!(store.state().settings.font_size, 30);
    assert!(press(&mut store, "ctrl+=").effects.is_empty());

    for _ in 0..40 {
        press(&mut store, "ctrl+-");
    }
    assert_eq!(store.state().settings.font_size, 8);

    let result = press(&mut store, "ctrl+0");
    assert_eq!(store.state().settings.font_size, 14);
    assert_eq!(
        result.effects,
        vec![Effect::PersistSettings(SettingsPatch {
            font_size: Some(14),
            ..SettingsPatch::default()
        })]
    );

    store.dispatch(Action::SetFontSize(100));
    assert_eq!(store.state().settings.font_size, 30);
}

#[test]
fn theme_cycles_and_view_toggles() {
    let mut store = new_store();
    press(&mut store, "ctrl+k");
    assert_eq!(store.state().settings.theme, Theme::HighContrast);
    press(&mut store, "ctrl+k");
    assert_eq!(store.state().settings.theme, Theme::Light);
    press(&mut store, "ctrl+k");
    assert_eq!(store.state().settings.theme, Theme::Dark);

    press(&mut store, "alt+z");
    assert_eq!(store.state().settings.word_wrap, WordWrap::Off);
    press(&mut store, "ctrl+shift+m");
    assert!(!store.state().settings.minimap_enabled);
}

#[test]
fn panel_sizes_are_clamped() {
    let mut store = new_store();
    store.dispatch(Action::SetSidebarWidth(10));
    store.dispatch(Action::SetTerminalHeight(10_000));
    assert_eq!(store.state().settings.sidebar_width, 100);
    assert_eq!(store.state().settings.terminal_height, 800);
}

#[test]
fn locale_change_switches_translations() {
    let mut store = new_store();
    assert_eq!(store.state().i18n.t("common.save"), "Save");
    store.dispatch(Action::SetLocale(Locale::ZhCn));
    assert_eq!(store.state().i18n.t("common.save"), "保存");
}

#[test]
fn editor_commands_are_forwarded() {
    let mut store = new_store();
    let result = press(&mut store, "ctrl+z");
    assert_eq!(result.effects, vec![Effect::Editor(EditorCommand::Undo)]);
    assert!(!result.state_changed);

    let result = press(&mut store, "ctrl+c");
    assert_eq!(result.effects, vec![Effect::Editor(EditorCommand::Copy)]);
    assert!(!result.prevent_default);
}

#[test]
fn text_input_blocks_non_global_shortcuts() {
    let mut store = new_store();
    let undo = store.dispatch(Action::KeyPressed {
        event: KeyEvent::ctrl("z"),
        in_text_input: true,
    });
    assert!(undo.effects.is_empty());

    let quick_open = store.dispatch(Action::KeyPressed {
        event: KeyEvent::ctrl("p"),
        in_text_input: true,
    });
    assert!(quick_open.state_changed);
    assert_eq!(store.state().ui.dialog, Some(Dialog::QuickOpen));
}

#[test]
fn unregistered_handler_does_nothing() {
    let mut store = new_store();
    store.shortcuts_mut().unregister_handler(ShortcutAction::ChangeTheme);
    assert_eq!(press(&mut store, "ctrl+k"), DispatchResult::default());
    assert_eq!(
        store.dispatch(Action::Shortcut(ShortcutAction::ChangeTheme)),
        DispatchResult::default()
    );
}

#[test]
fn quick_open_accept_selects_file() {
    let mut store = new_store();
    press(&mut store, "ctrl+p");
    store.dispatch(Action::QuickOpenSetQuery("UTIL".to_string()));
    store.dispatch(Action::QuickOpenAccept);

    assert_eq!(store.state().tabs.active(), Some(file(&store, "src/utils.js")));
    assert_eq!(store.state().ui.dialog, None);
}

#[test]
fn only_one_dialog_at_a_time() {
    let mut store = new_store();
    press(&mut store, "ctrl+p");
    press(&mut store, "ctrl+g");
    assert_eq!(store.state().ui.dialog, Some(Dialog::GoToLine));
    assert!(store.dispatch(Action::CloseDialog).state_changed);
    assert!(!store.dispatch(Action::CloseDialog).state_changed);
}

#[test]
fn go_to_line_validates_and_clamps() {
    let mut store = new_store();
    let main = file(&store, "main.js");
    store.dispatch(Action::EditorContentChanged {
        file: main,
        content: "a\nb\nc".to_string(),
    });
    store.dispatch(Action::SelectFile(main));
    press(&mut store, "ctrl+g");

    for bad in ["0", "-3", "abc", ""] {
        let result = store.dispatch(Action::GoToLineSubmit(bad.to_string()));
        assert!(result.effects.is_empty());
        assert_eq!(store.state().ui.dialog, Some(Dialog::GoToLine));
    }

    let result = store.dispatch(Action::GoToLineSubmit(" 99 ".to_string()));
    assert_eq!(
        result.effects,
        vec![Effect::RevealLine { file: main, line: 3 }]
    );
    assert_eq!(store.state().ui.dialog, None);
}

#[test]
fn editor_props_follow_active_file_and_settings() {
    let mut store = new_store();
    assert_eq!(store.state().editor_props(), None);

    let py = file(&store, "script.py");
    store.dispatch(Action::SelectFile(py));
    store.dispatch(Action::SetTheme(Theme::Light));

    let props = store.state().editor_props().unwrap();
    assert_eq!(props.file, py);
    assert_eq!(props.language, LanguageId::Python);
    assert_eq!(props.theme, Theme::Light);
    assert_eq!(props.font_size, 14);
    assert!(props.minimap);
}

#[test]
fn toggling_terminal_opens_first_session() {
    let mut store = new_store();
    assert!(store.startup_effects().is_empty());

    let result = press(&mut store, "ctrl+`");
    assert!(store.state().settings.terminal_visible);
    assert!(result.effects.contains(&Effect::OpenShellSession));

    store.dispatch(Action::TerminalSessionOpened(session(1)));
    press(&mut store, "ctrl+`");
    let result = press(&mut store, "ctrl+`");
    assert!(!result.effects.contains(&Effect::OpenShellSession));
}

#[test]
fn terminal_submit_round_trip() {
    let mut store = new_store();
    store.dispatch(Action::TerminalSessionOpened(session(1)));
    store.dispatch(Action::TerminalSetInput("whoami".to_string()));

    let result = store.dispatch(Action::TerminalSubmit);
    let request = match result.effects.as_slice() {
        [Effect::RunShellCommand {
            request,
            session_id,
            command,
        }] => {
            assert_eq!(session_id, &CompactString::from("terminal-1"));
            assert_eq!(command, "whoami");
            *request
        }
        other => panic!("unexpected effects: {other:?}"),
    };
    assert!(store.dispatch(Action::TerminalSubmit).effects.is_empty());

    store.dispatch(Action::TerminalCommandFinished {
        request,
        result: Ok(CommandResult::ok("user")),
        prompt: None,
    });
    let tab = store.state().terminal.active_tab().unwrap();
    assert_eq!(tab.entries[0].output, "user");
    assert!(!store.state().terminal.is_executing());
}

#[test]
fn closing_last_terminal_tab_hides_panel() {
    let mut store = new_store();
    store.dispatch(Action::ToggleTerminal);
    store.dispatch(Action::TerminalSessionOpened(session(1)));
    store.dispatch(Action::TerminalSessionOpened(session(2)));

    let result = store.dispatch(Action::TerminalCloseTab(0));
    assert_eq!(result.effects, vec![Effect::CloseShellSession("terminal-1".into())]);
    assert_eq!(store.state().terminal.active, 0);

    store.dispatch(Action::TerminalCloseTab(0));
    assert!(!store.state().settings.terminal_visible);
    assert_eq!(store.state().terminal.tabs.len(), 1);
}

#[test]
fn shell_clear_event_wipes_transcript() {
    let mut store = new_store();
    store.dispatch(Action::TerminalSessionOpened(session(1)));
    store.dispatch(Action::TerminalSetInput("ls".to_string()));
    store.dispatch(Action::TerminalSubmit);
    assert!(store
        .dispatch(Action::TerminalCleared("terminal-1".into()))
        .state_changed);
    assert!(store.state().terminal.tabs[0].entries.is_empty());
}

#[test]
fn tree_invariants_hold_after_mixed_mutations() {
    let mut store = new_store();
    let root = store.state().tree.root();
    let src = file(&store, "src");
    for (kind, parent, name) in [
        (NewItemKind::Folder, src, "nested"),
        (NewItemKind::File, src, "x.js"),
        (NewItemKind::File, root, "x.js"),
    ] {
        store.dispatch(Action::ExplorerBeginNewItem { kind, parent });
        store.dispatch(Action::ExplorerSetNewItemName(name.to_string()));
        store.dispatch(Action::ExplorerCommitNewItem);
    }
    press(&mut store, "ctrl+n");
    assert!(store.state().tree.validate().is_ok());
}

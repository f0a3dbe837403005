use tokio::sync::watch;

use crate::kernel::effect::EditorCommand;
use crate::kernel::language::LanguageId;
use crate::kernel::services::ports::settings::{DEFAULT_FONT_SIZE, MAX_FONT_SIZE, MIN_FONT_SIZE};
use crate::kernel::services::ports::SettingsPatch;
use crate::kernel::shortcuts::{ShortcutAction, ShortcutRegistry};

use super::{Action, AppState, Dialog, Effect, NewItemDraft, NewItemKind, SidebarTab};

#[derive(Debug, Default, PartialEq, Eq)]
pub struct DispatchResult {
    pub effects: Vec<Effect>,
    pub state_changed: bool,
    /// 命中的快捷键要求阻止浏览器默认行为
    pub prevent_default: bool,
}

impl DispatchResult {
    fn unchanged() -> Self {
        Self::default()
    }

    fn changed(state_changed: bool) -> Self {
        Self {
            state_changed,
            ..Self::default()
        }
    }

    fn with_effect(state_changed: bool, effect: Effect) -> Self {
        Self {
            effects: vec![effect],
            state_changed,
            prevent_default: false,
        }
    }

    fn merge(mut self, other: DispatchResult) -> Self {
        self.effects.extend(other.effects);
        self.state_changed |= other.state_changed;
        self.prevent_default |= other.prevent_default;
        self
    }
}

/// 单线程状态容器：所有变更经由 `dispatch`，状态变化时递增修订号并通知订阅者
pub struct Store {
    state: AppState,
    shortcuts: ShortcutRegistry,
    revision: u64,
    revision_tx: watch::Sender<u64>,
}

impl Store {
    pub fn new(state: AppState) -> Self {
        Self::with_shortcuts(state, ShortcutRegistry::with_all_handlers())
    }

    pub fn with_shortcuts(state: AppState, shortcuts: ShortcutRegistry) -> Self {
        let (revision_tx, _) = watch::channel(0);
        Self {
            state,
            shortcuts,
            revision: 0,
            revision_tx,
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn shortcuts(&self) -> &ShortcutRegistry {
        &self.shortcuts
    }

    pub fn shortcuts_mut(&mut self) -> &mut ShortcutRegistry {
        &mut self.shortcuts
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.revision_tx.subscribe()
    }

    /// 启动时需要执行的副作用（终端面板可见时先开一个会话）
    pub fn startup_effects(&self) -> Vec<Effect> {
        if self.state.settings.terminal_visible && self.state.terminal.tabs.is_empty() {
            vec![Effect::OpenShellSession]
        } else {
            Vec::new()
        }
    }

    pub fn dispatch(&mut self, action: Action) -> DispatchResult {
        let result = self.reduce(action);
        if result.state_changed {
            self.revision += 1;
            self.revision_tx.send_replace(self.revision);
        }
        result
    }

    fn reduce(&mut self, action: Action) -> DispatchResult {
        match action {
            Action::KeyPressed {
                event,
                in_text_input,
            } => match self.shortcuts.resolve(&event, in_text_input) {
                Some(hit) => {
                    let mut result = self.run_shortcut(hit.action);
                    result.prevent_default = hit.prevent_default;
                    result
                }
                None => DispatchResult::unchanged(),
            },
            Action::Shortcut(action) => {
                if !self.shortcuts.has_handler(action) {
                    tracing::debug!(action = action.name(), "no handler for shortcut");
                    return DispatchResult::unchanged();
                }
                self.run_shortcut(action)
            }

            Action::SelectFile(id) => {
                DispatchResult::changed(self.state.tabs.select(&self.state.tree, id))
            }
            Action::CloseTab(id) => DispatchResult::changed(self.state.tabs.close(id)),
            Action::ReorderTabs { from, to } => {
                DispatchResult::changed(self.state.tabs.reorder(from, to))
            }
            Action::CloseOtherTabs(id) => DispatchResult::changed(self.state.tabs.close_others(id)),
            Action::CloseTabsToRight(id) => {
                DispatchResult::changed(self.state.tabs.close_to_right(id))
            }
            Action::CloseSavedTabs => {
                DispatchResult::changed(self.state.tabs.close_saved(&self.state.tree))
            }
            Action::CloseAllTabs => DispatchResult::changed(self.state.tabs.close_all()),
            Action::EditorContentChanged { file, content } => {
                if !self.state.tree.mark_dirty(file, content) {
                    tracing::debug!(file = ?file, "content change for unknown file ignored");
                    return DispatchResult::unchanged();
                }
                self.state.search.refresh(&self.state.tree);
                DispatchResult::changed(true)
            }
            Action::SaveFile(id) => DispatchResult::changed(self.state.tree.mark_clean(id)),
            Action::SaveActive => match self.state.tabs.active() {
                Some(id) => DispatchResult::changed(self.state.tree.mark_clean(id)),
                None => DispatchResult::unchanged(),
            },
            Action::SaveAll => {
                let mut changed = false;
                for &id in self.state.tabs.open_files() {
                    changed |= self.state.tree.mark_clean(id);
                }
                DispatchResult::changed(changed)
            }
            Action::NewUntitledFile => self.new_untitled_file(),

            Action::ExplorerToggleFolder(id) => {
                DispatchResult::changed(self.state.tree.toggle_expanded(id))
            }
            Action::ExplorerSetFilter(filter) => {
                if self.state.ui.explorer_filter == filter {
                    return DispatchResult::unchanged();
                }
                self.state.ui.explorer_filter = filter;
                DispatchResult::changed(true)
            }
            Action::ExplorerBeginNewItem { kind, parent } => {
                let parent = match self.state.tree.resolve(parent) {
                    Some(node) if node.is_folder() => parent,
                    Some(node) => node.parent().unwrap_or(self.state.tree.root()),
                    None => {
                        tracing::debug!(parent = ?parent, "new item under unknown node ignored");
                        return DispatchResult::unchanged();
                    }
                };
                self.state.ui.new_item = Some(NewItemDraft {
                    kind,
                    parent,
                    name: String::new(),
                });
                DispatchResult::changed(true)
            }
            Action::ExplorerSetNewItemName(name) => match self.state.ui.new_item.as_mut() {
                Some(draft) if draft.name != name => {
                    draft.name = name;
                    DispatchResult::changed(true)
                }
                _ => DispatchResult::unchanged(),
            },
            Action::ExplorerCommitNewItem => self.commit_new_item(),
            Action::ExplorerCancelNewItem => {
                DispatchResult::changed(self.state.ui.new_item.take().is_some())
            }

            Action::SearchSetQuery(query) => {
                DispatchResult::changed(self.state.search.set_query(&self.state.tree, query))
            }
            Action::SearchToggleCaseSensitive => {
                self.state.search.toggle_case_sensitive(&self.state.tree);
                DispatchResult::changed(true)
            }
            Action::SearchToggleWholeWord => {
                self.state.search.toggle_whole_word(&self.state.tree);
                DispatchResult::changed(true)
            }
            Action::SearchToggleRegex => {
                self.state.search.toggle_regex(&self.state.tree);
                DispatchResult::changed(true)
            }
            Action::SearchToggleFileExpanded(id) => {
                DispatchResult::changed(self.state.search.toggle_file_expanded(id))
            }
            Action::SearchOpenMatch { file, line } => {
                if !self.state.tree.is_file(file) {
                    return DispatchResult::unchanged();
                }
                let changed = self.state.tabs.select(&self.state.tree, file);
                DispatchResult::with_effect(changed, Effect::RevealLine { file, line })
            }

            Action::ToggleSidebar => self.update_settings(SettingsPatch {
                sidebar_visible: Some(!self.state.settings.sidebar_visible),
                ..SettingsPatch::default()
            }),
            Action::SetSidebarTab(tab) => {
                let tab_changed = self.state.ui.sidebar_tab != tab;
                self.state.ui.sidebar_tab = tab;
                let shown = self.update_settings(SettingsPatch {
                    sidebar_visible: Some(true),
                    ..SettingsPatch::default()
                });
                DispatchResult::changed(tab_changed).merge(shown)
            }
            Action::ToggleTerminal => self.set_terminal_visible(!self.state.settings.terminal_visible),
            Action::SetSidebarWidth(width) => self.update_settings(SettingsPatch {
                sidebar_width: Some(width),
                ..SettingsPatch::default()
            }),
            Action::SetTerminalHeight(height) => self.update_settings(SettingsPatch {
                terminal_height: Some(height),
                ..SettingsPatch::default()
            }),
            Action::SetTheme(theme) => self.update_settings(SettingsPatch {
                theme: Some(theme),
                ..SettingsPatch::default()
            }),
            Action::SetFontSize(size) => self.update_settings(SettingsPatch {
                font_size: Some(size),
                ..SettingsPatch::default()
            }),
            Action::SetLocale(locale) => self.update_settings(SettingsPatch {
                locale: Some(locale),
                ..SettingsPatch::default()
            }),
            Action::ToggleWordWrap => self.update_settings(SettingsPatch {
                word_wrap: Some(self.state.settings.word_wrap.toggled()),
                ..SettingsPatch::default()
            }),
            Action::ToggleMinimap => self.update_settings(SettingsPatch {
                minimap_enabled: Some(!self.state.settings.minimap_enabled),
                ..SettingsPatch::default()
            }),
            Action::ApplySettings(patch) => self.update_settings(patch),

            Action::OpenDialog(dialog) => {
                match dialog {
                    Dialog::QuickOpen => self.state.quick_open.reset(),
                    Dialog::Shortcuts => self.state.ui.shortcuts_query.clear(),
                    Dialog::GoToLine => {}
                }
                self.state.ui.dialog = Some(dialog);
                DispatchResult::changed(true)
            }
            Action::CloseDialog => DispatchResult::changed(self.state.ui.dialog.take().is_some()),
            Action::QuickOpenSetQuery(query) => {
                DispatchResult::changed(self.state.quick_open.set_query(query))
            }
            Action::QuickOpenMoveSelection(delta) => DispatchResult::changed(
                self.state.quick_open.move_selection(&self.state.tree, delta),
            ),
            Action::QuickOpenAccept => {
                let Some(file) = self.state.quick_open.selected_file(&self.state.tree) else {
                    return DispatchResult::unchanged();
                };
                self.state.tabs.select(&self.state.tree, file);
                self.state.ui.dialog = None;
                DispatchResult::changed(true)
            }
            Action::GoToLineSubmit(input) => self.go_to_line(&input),
            Action::ShortcutsSetQuery(query) => {
                if self.state.ui.shortcuts_query == query {
                    return DispatchResult::unchanged();
                }
                self.state.ui.shortcuts_query = query;
                DispatchResult::changed(true)
            }

            Action::TerminalNew => {
                let shown = self.update_settings(SettingsPatch {
                    terminal_visible: Some(true),
                    ..SettingsPatch::default()
                });
                shown.merge(DispatchResult::with_effect(false, Effect::OpenShellSession))
            }
            Action::TerminalSessionOpened(session) => {
                self.state.terminal.add_session(&session);
                DispatchResult::changed(true)
            }
            Action::TerminalSelectTab(index) => {
                DispatchResult::changed(self.state.terminal.select_tab(index))
            }
            Action::TerminalCloseTab(index) => {
                if index >= self.state.terminal.tabs.len() {
                    return DispatchResult::unchanged();
                }
                if self.state.terminal.tabs.len() == 1 {
                    return self.set_terminal_visible(false);
                }
                match self.state.terminal.close_tab(index) {
                    Some(id) => DispatchResult::with_effect(true, Effect::CloseShellSession(id)),
                    None => DispatchResult::unchanged(),
                }
            }
            Action::TerminalSetInput(input) => {
                DispatchResult::changed(self.state.terminal.set_input(input))
            }
            Action::TerminalHistoryUp => DispatchResult::changed(self.state.terminal.history_up()),
            Action::TerminalHistoryDown => {
                DispatchResult::changed(self.state.terminal.history_down())
            }
            Action::TerminalSubmit => match self.state.terminal.submit() {
                Some(submitted) => DispatchResult::with_effect(
                    true,
                    Effect::RunShellCommand {
                        request: submitted.request,
                        session_id: submitted.session_id,
                        command: submitted.command,
                    },
                ),
                None => DispatchResult::unchanged(),
            },
            Action::TerminalInterrupt => DispatchResult::changed(self.state.terminal.interrupt()),
            Action::TerminalClearScreen => {
                DispatchResult::changed(self.state.terminal.clear_active())
            }
            Action::TerminalCommandFinished {
                request,
                result,
                prompt,
            } => DispatchResult::changed(self.state.terminal.finish(request, result, prompt)),
            Action::TerminalCleared(session_id) => {
                DispatchResult::changed(self.state.terminal.clear_session(&session_id))
            }
        }
    }

    fn run_shortcut(&mut self, action: ShortcutAction) -> DispatchResult {
        use ShortcutAction as A;

        tracing::debug!(action = action.name(), "shortcut");
        let editor = |command| DispatchResult::with_effect(false, Effect::Editor(command));
        let font_size = self.state.settings.font_size;

        match action {
            A::Save => self.reduce(Action::SaveActive),
            A::SaveAll => self.reduce(Action::SaveAll),
            A::NewFile => self.reduce(Action::NewUntitledFile),
            A::OpenFile | A::QuickOpen => self.reduce(Action::OpenDialog(Dialog::QuickOpen)),
            A::GoToLine => self.reduce(Action::OpenDialog(Dialog::GoToLine)),
            A::FindInFiles => self.reduce(Action::SetSidebarTab(SidebarTab::Search)),
            A::ToggleSidebar => self.reduce(Action::ToggleSidebar),
            A::ToggleTerminal => self.reduce(Action::ToggleTerminal),
            A::ZoomIn => self.reduce(Action::SetFontSize((font_size + 1).min(MAX_FONT_SIZE))),
            A::ZoomOut => self.reduce(Action::SetFontSize(
                font_size.saturating_sub(1).max(MIN_FONT_SIZE),
            )),
            A::ResetZoom => self.reduce(Action::SetFontSize(DEFAULT_FONT_SIZE)),
            A::ToggleWordWrap => self.reduce(Action::ToggleWordWrap),
            A::ToggleMinimap => self.reduce(Action::ToggleMinimap),
            A::ChangeTheme => self.reduce(Action::SetTheme(self.state.settings.theme.next())),
            A::ToggleFullScreen => {
                self.state.ui.full_screen = !self.state.ui.full_screen;
                DispatchResult::with_effect(true, Effect::SetFullScreen(self.state.ui.full_screen))
            }
            A::Find => editor(EditorCommand::Find),
            A::Replace => editor(EditorCommand::Replace),
            A::Undo => editor(EditorCommand::Undo),
            A::Redo => editor(EditorCommand::Redo),
            A::Cut => editor(EditorCommand::Cut),
            A::Copy => editor(EditorCommand::Copy),
            A::Paste => editor(EditorCommand::Paste),
            A::SelectAll => editor(EditorCommand::SelectAll),
            A::FormatDocument => editor(EditorCommand::FormatDocument),
            A::CommentLine => editor(EditorCommand::CommentLine),
            A::FoldCode => editor(EditorCommand::FoldCode),
            A::UnfoldCode => editor(EditorCommand::UnfoldCode),
            A::IndentLine => editor(EditorCommand::IndentLine),
            A::OutdentLine => editor(EditorCommand::OutdentLine),
        }
    }

    /// 字号与尺寸先夹到范围内；没有实际变化时不产生持久化副作用
    fn update_settings(&mut self, patch: SettingsPatch) -> DispatchResult {
        let patch = patch.normalized();
        let before = self.state.settings.clone();
        patch.apply_to(&mut self.state.settings);
        if self.state.settings == before {
            return DispatchResult::unchanged();
        }
        if before.locale != self.state.settings.locale {
            self.state.i18n.set_locale(self.state.settings.locale);
        }
        DispatchResult::with_effect(true, Effect::PersistSettings(patch))
    }

    fn set_terminal_visible(&mut self, visible: bool) -> DispatchResult {
        let result = self.update_settings(SettingsPatch {
            terminal_visible: Some(visible),
            ..SettingsPatch::default()
        });
        if visible && result.state_changed && self.state.terminal.tabs.is_empty() {
            return result.merge(DispatchResult::with_effect(false, Effect::OpenShellSession));
        }
        result
    }

    fn new_untitled_file(&mut self) -> DispatchResult {
        let root = self.state.tree.root();
        let taken: Vec<&str> = self
            .state
            .tree
            .resolve(root)
            .map(|r| {
                r.children()
                    .iter()
                    .filter_map(|&c| self.state.tree.resolve(c).map(|n| n.name()))
                    .collect()
            })
            .unwrap_or_default();
        let name = (1..)
            .map(|n| format!("untitled-{}.js", n))
            .find(|candidate| !taken.contains(&candidate.as_str()))
            .unwrap_or_else(|| "untitled.js".to_string());

        match self
            .state
            .tree
            .create_file(root, &name, LanguageId::JavaScript)
        {
            Ok(id) => {
                self.state.tabs.select(&self.state.tree, id);
                tracing::info!(name = %name, "created file");
                DispatchResult::changed(true)
            }
            Err(e) => {
                tracing::debug!(error = %e, "failed to create untitled file");
                DispatchResult::unchanged()
            }
        }
    }

    /// 空白名字视为取消
    fn commit_new_item(&mut self) -> DispatchResult {
        let Some(draft) = self.state.ui.new_item.take() else {
            return DispatchResult::unchanged();
        };
        let name = draft.name.trim();
        if name.is_empty() {
            return DispatchResult::changed(true);
        }

        let created = match draft.kind {
            NewItemKind::File => {
                let language = LanguageId::from_file_name(name);
                self.state.tree.create_file(draft.parent, name, language)
            }
            NewItemKind::Folder => self.state.tree.create_folder(draft.parent, name),
        };
        match created {
            Ok(id) => {
                self.state.tree.set_expanded(draft.parent, true);
                if draft.kind == NewItemKind::File {
                    self.state.tabs.select(&self.state.tree, id);
                }
                tracing::info!(path = %self.state.tree.display_path(id), "created node");
            }
            Err(e) => tracing::debug!(error = %e, "failed to create node"),
        }
        DispatchResult::changed(true)
    }

    /// 非法或小于 1 的行号被忽略（对话框保持打开）；超出时定位到最后一行
    fn go_to_line(&mut self, input: &str) -> DispatchResult {
        let Ok(requested) = input.trim().parse::<i64>() else {
            return DispatchResult::unchanged();
        };
        if requested < 1 {
            return DispatchResult::unchanged();
        }
        let (Some(file), Some(line_count)) =
            (self.state.tabs.active(), self.state.active_line_count())
        else {
            return DispatchResult::unchanged();
        };
        let line = usize::try_from(requested).unwrap_or(usize::MAX).min(line_count);
        self.state.ui.dialog = None;
        DispatchResult::with_effect(true, Effect::RevealLine { file, line })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/kernel/store.rs"]
mod tests;

use super::Workbench;
use crate::core::KeyEvent;
use crate::kernel::services::adapters::SettingsService;
use crate::kernel::{Action, Effect};

impl Workbench {
    /// 分发 action 并执行其副作用；返回状态是否变化
    pub fn dispatch(&mut self, action: Action) -> bool {
        let result = self.store.dispatch(action);
        for effect in result.effects {
            self.run_effect(effect);
        }
        result.state_changed
    }

    /// 返回 true 表示命中快捷键且需要阻止默认行为
    pub fn handle_key(&mut self, event: KeyEvent, in_text_input: bool) -> bool {
        let result = self.store.dispatch(Action::KeyPressed {
            event,
            in_text_input,
        });
        let prevent_default = result.prevent_default;
        for effect in result.effects {
            self.run_effect(effect);
        }
        prevent_default
    }

    pub(super) fn run_effect(&mut self, effect: Effect) {
        match effect {
            Effect::PersistSettings(patch) => {
                let Some(settings) = self.services.get_mut::<SettingsService>() else {
                    tracing::error!("SettingsService not registered");
                    return;
                };
                if let Err(e) = settings.update_settings(&patch) {
                    tracing::warn!(error = %e, "failed to persist settings");
                }
            }
            Effect::OpenShellSession => {
                let Some(shell) = self.shell() else {
                    return;
                };
                let session = shell.create_session(None);
                tracing::info!(session = %session.id, kind = %session.kind, "terminal session opened");
                self.dispatch(Action::TerminalSessionOpened(session));
            }
            Effect::CloseShellSession(id) => {
                if let Some(shell) = self.shell() {
                    if !shell.close_session(&id) {
                        tracing::debug!(session = %id, "close for unknown terminal session");
                    }
                }
            }
            Effect::RunShellCommand {
                request,
                session_id,
                command,
            } => {
                let Some(shell) = self.shell() else {
                    return;
                };
                let ctx = self.services.context();
                let reply = ctx.clone();
                ctx.spawn_future(async move {
                    let result = shell.execute(&session_id, &command).await;
                    let prompt = shell.prompt(&session_id);
                    reply.dispatch(Action::TerminalCommandFinished {
                        request,
                        result,
                        prompt,
                    });
                });
            }
            Effect::RevealLine { file, line } => {
                tracing::debug!(file = ?file, line, "reveal line");
                self.revealed = Some((file, line));
            }
            Effect::Editor(command) => {
                tracing::debug!(command = ?command, "editor command");
                self.editor_commands.push(command);
            }
            Effect::SetFullScreen(on) => {
                tracing::info!(full_screen = on, "full screen toggled");
            }
        }
    }
}

//! 终端面板：每个标签对应一个模拟 shell 会话，命令结果异步回填

use compact_str::CompactString;

use crate::kernel::services::ports::{CommandResult, ShellError, ShellKind, ShellSession};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TerminalEntry {
    pub command: String,
    pub output: String,
    pub error: Option<String>,
    pub pending: bool,
}

impl TerminalEntry {
    fn interrupt() -> Self {
        Self {
            output: "^C".to_string(),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TerminalTab {
    pub session_id: CompactString,
    pub kind: ShellKind,
    pub name: &'static str,
    pub prompt: String,
    pub entries: Vec<TerminalEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingCommand {
    pub request: u64,
    pub session_id: CompactString,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmittedCommand {
    pub request: u64,
    pub session_id: CompactString,
    pub command: String,
}

#[derive(Debug, Clone, Default)]
pub struct TerminalState {
    pub tabs: Vec<TerminalTab>,
    pub active: usize,
    pub input: String,
    pub input_history: Vec<String>,
    /// 0 = 最近一条；`None` 表示未在浏览历史
    pub history_index: Option<usize>,
    pub executing: Option<PendingCommand>,
    next_request: u64,
}

impl TerminalState {
    pub fn active_tab(&self) -> Option<&TerminalTab> {
        self.tabs.get(self.active)
    }

    pub fn is_executing(&self) -> bool {
        self.executing.is_some()
    }

    /// 新会话成为活动标签；输入与输入历史清空
    pub fn add_session(&mut self, session: &ShellSession) {
        self.tabs.push(TerminalTab {
            session_id: session.id.clone(),
            kind: session.kind,
            name: session.kind.tab_name(),
            prompt: session.prompt(),
            entries: Vec::new(),
        });
        self.active = self.tabs.len() - 1;
        self.input.clear();
        self.input_history.clear();
        self.history_index = None;
    }

    pub fn select_tab(&mut self, index: usize) -> bool {
        if index >= self.tabs.len() || index == self.active {
            return false;
        }
        self.active = index;
        true
    }

    /// 移除标签并返回其会话 id；关闭位置不在活动标签之后时活动索引前移一位
    pub fn close_tab(&mut self, index: usize) -> Option<CompactString> {
        if index >= self.tabs.len() {
            return None;
        }
        let tab = self.tabs.remove(index);
        if index <= self.active {
            self.active = self.active.saturating_sub(1);
        }
        if self
            .executing
            .as_ref()
            .is_some_and(|p| p.session_id == tab.session_id)
        {
            self.executing = None;
        }
        Some(tab.session_id)
    }

    pub fn set_input(&mut self, input: String) -> bool {
        if self.input == input {
            return false;
        }
        self.input = input;
        true
    }

    pub fn history_up(&mut self) -> bool {
        if self.input_history.is_empty() {
            return false;
        }
        let last = self.input_history.len() - 1;
        let next = match self.history_index {
            None => 0,
            Some(i) => (i + 1).min(last),
        };
        self.history_index = Some(next);
        self.input = self.input_history[last - next].clone();
        true
    }

    /// 走到最新一条之后清空输入行
    pub fn history_down(&mut self) -> bool {
        match self.history_index {
            None => false,
            Some(0) => {
                self.history_index = None;
                self.input.clear();
                true
            }
            Some(i) => {
                let next = i - 1;
                self.history_index = Some(next);
                let last = self.input_history.len() - 1;
                self.input = self.input_history[last - next].clone();
                true
            }
        }
    }

    /// 执行中或输入为空时拒绝提交
    pub fn submit(&mut self) -> Option<SubmittedCommand> {
        if self.executing.is_some() || self.input.trim().is_empty() {
            return None;
        }
        let session_id = self.tabs.get(self.active)?.session_id.clone();
        let command = std::mem::take(&mut self.input);

        self.next_request += 1;
        let request = self.next_request;
        self.input_history.push(command.clone());
        self.history_index = None;
        if let Some(tab) = self.tabs.get_mut(self.active) {
            tab.entries.push(TerminalEntry {
                command: command.clone(),
                pending: true,
                ..TerminalEntry::default()
            });
        }
        self.executing = Some(PendingCommand {
            request,
            session_id: session_id.clone(),
        });

        Some(SubmittedCommand {
            request,
            session_id,
            command,
        })
    }

    /// 过期的结果（已中断或标签已关闭）被丢弃
    pub fn finish(
        &mut self,
        request: u64,
        result: Result<CommandResult, ShellError>,
        prompt: Option<String>,
    ) -> bool {
        if !self.executing.as_ref().is_some_and(|p| p.request == request) {
            tracing::debug!(request, "dropping stale shell result");
            return false;
        }
        let Some(pending) = self.executing.take() else {
            return false;
        };

        let Some(tab) = self
            .tabs
            .iter_mut()
            .find(|t| t.session_id == pending.session_id)
        else {
            return true;
        };
        if let Some(prompt) = prompt {
            tab.prompt = prompt;
        }
        if let Some(entry) = tab.entries.iter_mut().rev().find(|e| e.pending) {
            entry.pending = false;
            match result {
                Ok(result) => {
                    entry.output = result.output;
                    entry.error = result.error;
                }
                Err(e) => entry.error = Some(e.to_string()),
            }
        }
        true
    }

    /// Ctrl+C：中断执行或丢弃当前输入
    pub fn interrupt(&mut self) -> bool {
        if let Some(pending) = self.executing.take() {
            if let Some(tab) = self
                .tabs
                .iter_mut()
                .find(|t| t.session_id == pending.session_id)
            {
                for entry in tab.entries.iter_mut().filter(|e| e.pending) {
                    entry.pending = false;
                }
                tab.entries.push(TerminalEntry::interrupt());
            }
            return true;
        }
        if self.input.is_empty() {
            return false;
        }
        self.input.clear();
        if let Some(tab) = self.tabs.get_mut(self.active) {
            tab.entries.push(TerminalEntry::interrupt());
        }
        true
    }

    pub fn clear_session(&mut self, session_id: &str) -> bool {
        match self.tabs.iter_mut().find(|t| t.session_id == session_id) {
            Some(tab) if !tab.entries.is_empty() => {
                tab.entries.clear();
                true
            }
            _ => false,
        }
    }

    pub fn clear_active(&mut self) -> bool {
        let Some(id) = self.active_tab().map(|t| t.session_id.clone()) else {
            return false;
        };
        self.clear_session(&id)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/kernel/terminal.rs"]
mod tests;

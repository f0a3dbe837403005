use compact_str::CompactString;

use crate::kernel::services::ports::SettingsPatch;
use crate::models::NodeId;

/// 转交给编辑器组件执行的命令
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorCommand {
    Find,
    Replace,
    Undo,
    Redo,
    Cut,
    Copy,
    Paste,
    SelectAll,
    FormatDocument,
    CommentLine,
    FoldCode,
    UnfoldCode,
    IndentLine,
    OutdentLine,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    PersistSettings(SettingsPatch),
    OpenShellSession,
    CloseShellSession(CompactString),
    RunShellCommand {
        request: u64,
        session_id: CompactString,
        command: String,
    },
    /// `line` 从 1 开始
    RevealLine {
        file: NodeId,
        line: usize,
    },
    Editor(EditorCommand),
    SetFullScreen(bool),
}

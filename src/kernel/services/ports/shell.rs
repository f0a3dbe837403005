//! 模拟 shell 的数据契约：会话、执行结果、事件

use std::fmt;

use compact_str::CompactString;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShellKind {
    PowerShell,
    Cmd,
    Bash,
    Zsh,
    Unknown,
}

impl ShellKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::PowerShell => "powershell",
            Self::Cmd => "cmd",
            Self::Bash => "bash",
            Self::Zsh => "zsh",
            Self::Unknown => "unknown",
        }
    }

    /// 终端标签上显示的名字
    pub fn tab_name(self) -> &'static str {
        match self {
            Self::PowerShell => "pwsh",
            other => other.as_str(),
        }
    }

    pub fn is_windows(self) -> bool {
        matches!(self, Self::PowerShell | Self::Cmd)
    }

    pub fn shell_path(self) -> &'static str {
        match self {
            Self::PowerShell => r"C:\Windows\System32\WindowsPowerShell\v1.0\powershell.exe",
            Self::Cmd => r"C:\Windows\System32\cmd.exe",
            Self::Bash => "/bin/bash",
            Self::Zsh => "/bin/zsh",
            Self::Unknown => "/bin/sh",
        }
    }

    pub fn default_cwd(self) -> &'static str {
        if self.is_windows() {
            r"C:\Users\user"
        } else {
            "/home/user"
        }
    }
}

impl fmt::Display for ShellKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperatingSystem {
    Windows,
    MacOs,
    Linux,
    Unknown,
}

impl OperatingSystem {
    /// 依据 user-agent 子串判断，按 win / mac / linux 顺序匹配
    pub fn detect(user_agent: &str) -> Self {
        let ua = user_agent.to_ascii_lowercase();
        if ua.contains("win") {
            Self::Windows
        } else if ua.contains("mac") {
            Self::MacOs
        } else if ua.contains("linux") {
            Self::Linux
        } else {
            Self::Unknown
        }
    }

    pub fn current() -> Self {
        if cfg!(target_os = "windows") {
            Self::Windows
        } else if cfg!(target_os = "macos") {
            Self::MacOs
        } else if cfg!(target_os = "linux") {
            Self::Linux
        } else {
            Self::Unknown
        }
    }

    pub fn default_shell(self) -> ShellKind {
        match self {
            Self::Windows => ShellKind::PowerShell,
            Self::MacOs => ShellKind::Zsh,
            Self::Linux | Self::Unknown => ShellKind::Bash,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellSession {
    pub id: CompactString,
    pub kind: ShellKind,
    pub cwd: String,
    pub process_id: u32,
}

impl ShellSession {
    pub fn prompt(&self) -> String {
        match self.kind {
            ShellKind::PowerShell => format!("PS {}> ", self.cwd),
            ShellKind::Cmd => format!("{}> ", self.cwd),
            ShellKind::Bash | ShellKind::Zsh => format!("user@host:{}$ ", self.cwd),
            ShellKind::Unknown => "$ ".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CommandResult {
    pub output: String,
    pub error: Option<String>,
    pub exit_code: i32,
}

impl CommandResult {
    pub fn ok(output: impl Into<String>) -> Self {
        Self {
            output: output.into(),
            error: None,
            exit_code: 0,
        }
    }

    pub fn failed(error: impl Into<String>, exit_code: i32) -> Self {
        Self {
            output: String::new(),
            error: Some(error.into()),
            exit_code,
        }
    }

    pub fn is_success(&self) -> bool {
        self.exit_code == 0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellEvent {
    SessionCreated(ShellSession),
    SessionClosed(CompactString),
    Cleared(CompactString),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellError {
    SessionNotFound(CompactString),
}

impl fmt::Display for ShellError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShellError::SessionNotFound(id) => write!(f, "Terminal session {} not found", id),
        }
    }
}

impl std::error::Error for ShellError {}

pub type Result<T> = std::result::Result<T, ShellError>;

//! 模拟终端：不启动真实进程，按 shell 风格查表生成输出。
//!
//! 会话表放在 `Arc<Mutex<..>>` 里，克隆出的句柄可以移入 tokio 任务执行命令。

use std::hash::Hasher;
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use compact_str::{format_compact, CompactString};
use rustc_hash::{FxHashMap, FxHasher};

use crate::core::Service;
use crate::kernel::services::ports::shell::{
    CommandResult, OperatingSystem, Result, ShellError, ShellEvent, ShellKind, ShellSession,
};

const COMMON_COMMANDS: &[&str] = &[
    "echo", "cd", "pwd", "ls", "dir", "cat", "type", "mkdir", "rmdir", "touch", "rm", "cp", "mv",
    "grep", "find", "whoami", "date", "time", "git",
];

const GIT_STATUS: &str = "\
 src/app.js       |  12 ++++--
 src/utils.js     |   6 +
 index.html       |   4 +-
 styles.css       |  10 +++---
4 files changed, 24 insertions(+), 8 deletions(-)";

const POWERSHELL_HOST: &str = "\
Name             : ConsoleHost
Version          : 7.3.4
InstanceId       : 2d3f5712-5a97-4e3e-a42d-cf3c59c17a34
UI               : System.Management.Automation.Internal.Host.InternalHostUserInterface
CurrentCulture   : en-US
CurrentUICulture : en-US
PrivateData      : Microsoft.PowerShell.ConsoleHost+ConsoleColorProxy
DebuggerEnabled  : True
IsRunspacePushed : False
Runspace         : System.Management.Automation.Runspaces.LocalRunspace";

const POWERSHELL_PROCESSES: &str = "\
Handles  NPM(K)    PM(K)      WS(K)     CPU(s)     Id  SI ProcessName
-------  ------    -----      -----     ------     --  -- -----------
    435      32    94384      52496       5.70   1234   1 chrome
    128      14    12484      13792       0.13   2345   1 code
    208      25    32816      38908       0.86   3456   1 explorer
     89       9     1848       5456       0.02   4567   1 powershell
    112      12     9284      14320       0.08   5678   1 WindowsTerminal";

const CMD_VERSION: &str = "Microsoft Windows [Version 10.0.19045.3693]";

const CMD_PROCESSES: &str = "\
Image Name                     PID Session Name        Session#    Mem Usage
========================= ======== ================ =========== ============
System Idle Process              0 Services                   0          8 K
System                           4 Services                   0      1,480 K
chrome.exe                    1234 Console                    1     94,384 K
code.exe                      2345 Console                    1     12,484 K
explorer.exe                  3456 Console                    1     32,816 K
cmd.exe                       4567 Console                    1      1,848 K";

const UNAME: &str = "Linux devbox 6.5.0-generic #1 SMP PREEMPT_DYNAMIC x86_64 GNU/Linux";

const UNIX_PROCESSES: &str = "\
USER       PID  %CPU %MEM    VSZ   RSS TTY      STAT START   TIME COMMAND
user      1234   3.0  2.5 543216 94384 ?        Sl   10:12   5:42 /usr/bin/chrome
user      2345   0.5  0.7 234567 12484 ?        Sl   10:15   0:08 /usr/bin/code
user      4567   0.1  0.1  21456  1848 pts/0    Ss   11:30   0:01 bash
user      5678   0.3  0.5 123456  9284 pts/1    Sl+  11:35   0:05 /usr/bin/terminal";

const UNIX_LISTING: &[&str] = &[
    "total 32",
    "drwxr-xr-x  2 user  staff  4096 Nov 15 10:24 .",
    "drwxr-xr-x  6 user  staff  4096 Nov 15 10:20 ..",
    "-rw-r--r--  1 user  staff  2048 Nov 15 10:22 README.md",
    "-rw-r--r--  1 user  staff  8192 Nov 15 10:23 package.json",
    "drwxr-xr-x  4 user  staff  4096 Nov 15 10:24 src",
    "drwxr-xr-x  3 user  staff  4096 Nov 15 10:23 public",
    "-rw-r--r--  1 user  staff  1024 Nov 15 10:22 tsconfig.json",
];

const WINDOWS_LISTING: &[&str] = &[
    "Mode                 LastWriteTime         Length Name",
    "----                 -------------         ------ ----",
    "d----          11/15/2023    10:24                src",
    "d----          11/15/2023    10:23                public",
    "-a---          11/15/2023    10:22           2048 README.md",
    "-a---          11/15/2023    10:23           8192 package.json",
];

/// 模拟执行延迟：`base + hash(command) % max_jitter`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShellConfig {
    pub base_delay: Duration,
    pub max_jitter: Duration,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            base_delay: Duration::from_millis(100),
            max_jitter: Duration::from_millis(300),
        }
    }
}

impl ShellConfig {
    pub fn immediate() -> Self {
        Self {
            base_delay: Duration::ZERO,
            max_jitter: Duration::ZERO,
        }
    }

    pub fn delay_for(&self, command: &str) -> Duration {
        let jitter_ms = self.max_jitter.as_millis() as u64;
        if jitter_ms == 0 {
            return self.base_delay;
        }
        let mut hasher = FxHasher::default();
        hasher.write(command.as_bytes());
        self.base_delay + Duration::from_millis(hasher.finish() % jitter_ms)
    }
}

#[derive(Default)]
struct ShellInner {
    sessions: FxHashMap<CompactString, ShellSession>,
    next_session: u64,
    listeners: Vec<Sender<ShellEvent>>,
}

impl ShellInner {
    fn emit(&mut self, event: ShellEvent) {
        self.listeners.retain(|tx| tx.send(event.clone()).is_ok());
    }
}

#[derive(Clone)]
pub struct SimulatedShell {
    kind: ShellKind,
    config: ShellConfig,
    inner: Arc<Mutex<ShellInner>>,
}

impl SimulatedShell {
    pub fn new(kind: ShellKind, config: ShellConfig) -> Self {
        Self {
            kind,
            config,
            inner: Arc::new(Mutex::new(ShellInner::default())),
        }
    }

    pub fn for_os(os: OperatingSystem, config: ShellConfig) -> Self {
        Self::new(os.default_shell(), config)
    }

    pub fn kind(&self) -> ShellKind {
        self.kind
    }

    pub fn config(&self) -> ShellConfig {
        self.config
    }

    fn lock(&self) -> MutexGuard<'_, ShellInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn subscribe(&self) -> Receiver<ShellEvent> {
        let (tx, rx) = mpsc::channel();
        self.lock().listeners.push(tx);
        rx
    }

    /// `cwd` 为空时使用该 shell 的默认目录
    pub fn create_session(&self, cwd: Option<&str>) -> ShellSession {
        let mut inner = self.lock();
        inner.next_session += 1;
        let id = format_compact!("terminal-{}", inner.next_session);
        let session = ShellSession {
            process_id: simulated_pid(&id),
            id: id.clone(),
            kind: self.kind,
            cwd: cwd
                .filter(|c| !c.trim().is_empty())
                .unwrap_or(self.kind.default_cwd())
                .to_string(),
        };
        inner.sessions.insert(id, session.clone());
        inner.emit(ShellEvent::SessionCreated(session.clone()));
        tracing::info!(session = %session.id, kind = %session.kind, "shell session created");
        session
    }

    pub fn close_session(&self, id: &str) -> bool {
        let mut inner = self.lock();
        let Some(session) = inner.sessions.remove(id) else {
            return false;
        };
        inner.emit(ShellEvent::SessionClosed(session.id.clone()));
        tracing::info!(session = %session.id, "shell session closed");
        true
    }

    pub fn session(&self, id: &str) -> Option<ShellSession> {
        self.lock().sessions.get(id).cloned()
    }

    pub fn session_count(&self) -> usize {
        self.lock().sessions.len()
    }

    pub fn prompt(&self, id: &str) -> Option<String> {
        self.session(id).map(|s| s.prompt())
    }

    /// 等待模拟延迟后执行；会话不存在时立即报错
    pub async fn execute(&self, id: &str, command: &str) -> Result<CommandResult> {
        if self.session(id).is_none() {
            return Err(ShellError::SessionNotFound(CompactString::new(id)));
        }
        let delay = self.config.delay_for(command);
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        self.run(id, command)
    }

    /// 无延迟的同步执行
    pub fn run(&self, id: &str, command: &str) -> Result<CommandResult> {
        let mut inner = self.lock();
        let Some(session) = inner.sessions.get_mut(id) else {
            return Err(ShellError::SessionNotFound(CompactString::new(id)));
        };
        let trimmed = command.trim();
        tracing::debug!(session = %id, command = %trimmed, "shell command");

        if trimmed == "clear" || trimmed == "cls" {
            let id = session.id.clone();
            inner.emit(ShellEvent::Cleared(id));
            return Ok(CommandResult::ok(""));
        }

        if let Some(target) = trimmed.strip_prefix("cd ") {
            session.cwd = resolve_path(session.kind, &session.cwd, target.trim());
            return Ok(CommandResult::ok(""));
        }

        if trimmed == "git pull" {
            return Ok(CommandResult::ok("Already up to date."));
        }

        Ok(simulate(session, command))
    }
}

impl Service for SimulatedShell {
    fn name(&self) -> &'static str {
        "SimulatedShell"
    }
}

fn simulated_pid(id: &str) -> u32 {
    let mut hasher = FxHasher::default();
    hasher.write(id.as_bytes());
    1000 + (hasher.finish() % 9000) as u32
}

fn simulate(session: &ShellSession, command: &str) -> CommandResult {
    let trimmed = command.trim();
    match trimmed {
        "pwd" => return CommandResult::ok(session.cwd.clone()),
        "whoami" => return CommandResult::ok("user"),
        "echo $SHELL" | "echo %COMSPEC%" => return CommandResult::ok(session.kind.shell_path()),
        "git status" => return CommandResult::ok(GIT_STATUS),
        _ => {}
    }
    if trimmed.starts_with("ls") || trimmed.starts_with("dir") {
        return list_directory(session);
    }

    match session.kind {
        ShellKind::PowerShell => simulate_powershell(command),
        ShellKind::Cmd => simulate_cmd(command),
        ShellKind::Bash | ShellKind::Zsh => simulate_unix(command),
        ShellKind::Unknown => CommandResult::ok(format!("Command executed: {}", command)),
    }
}

fn command_name(command: &str) -> &str {
    command.trim().split(' ').next().unwrap_or_default()
}

fn is_common_command(command: &str) -> bool {
    COMMON_COMMANDS.contains(&command_name(command))
}

fn simulate_powershell(command: &str) -> CommandResult {
    let trimmed = command.trim();
    if trimmed == "Get-Host" {
        return CommandResult::ok(POWERSHELL_HOST);
    }
    if trimmed == "Get-Process" || trimmed.starts_with("Get-Process ") {
        return CommandResult::ok(POWERSHELL_PROCESSES);
    }
    if !is_common_command(command) {
        return CommandResult::failed(
            format!(
                "The term '{}' is not recognized as the name of a cmdlet, function, script file, or operable program.",
                command_name(command)
            ),
            1,
        );
    }
    CommandResult::ok(format!("Executed PowerShell command: {}", command))
}

fn simulate_cmd(command: &str) -> CommandResult {
    let trimmed = command.trim();
    if trimmed == "ver" {
        return CommandResult::ok(CMD_VERSION);
    }
    if trimmed == "tasklist" || trimmed.starts_with("tasklist ") {
        return CommandResult::ok(CMD_PROCESSES);
    }
    if !is_common_command(command) {
        return CommandResult::failed(
            format!(
                "'{}' is not recognized as an internal or external command, operable program or batch file.",
                command_name(command)
            ),
            1,
        );
    }
    CommandResult::ok(format!("Executed CMD command: {}", command))
}

fn simulate_unix(command: &str) -> CommandResult {
    let trimmed = command.trim();
    if trimmed == "uname -a" {
        return CommandResult::ok(UNAME);
    }
    if trimmed == "ps" || trimmed.starts_with("ps ") {
        return CommandResult::ok(UNIX_PROCESSES);
    }
    if !is_common_command(command) {
        return CommandResult::failed(
            format!("command not found: {}", command_name(command)),
            127,
        );
    }
    CommandResult::ok(format!("Executed Unix command: {}", command))
}

fn list_directory(session: &ShellSession) -> CommandResult {
    let output = if session.kind.is_windows() {
        let mut lines = vec![format!("Directory: {}", session.cwd), String::new()];
        lines.extend(WINDOWS_LISTING.iter().map(|l| l.to_string()));
        lines.join("\n")
    } else {
        UNIX_LISTING.join("\n")
    };
    CommandResult::ok(output)
}

fn is_windows_absolute(path: &str) -> bool {
    let bytes = path.as_bytes();
    bytes.len() >= 3 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':' && bytes[2] == b'\\'
}

pub(crate) fn resolve_path(kind: ShellKind, cwd: &str, path: &str) -> String {
    if path.is_empty() || path == "." {
        return cwd.to_string();
    }

    if kind.is_windows() {
        if is_windows_absolute(path) {
            return path.to_string();
        }
        if path == ".." {
            let mut parts: Vec<&str> = cwd.split('\\').filter(|p| !p.is_empty()).collect();
            if parts.len() > 1 {
                parts.pop();
            }
            return match parts.as_slice() {
                [] => cwd.to_string(),
                [drive] => format!("{}\\", drive),
                _ => parts.join("\\"),
            };
        }
        return if cwd.ends_with('\\') {
            format!("{}{}", cwd, path)
        } else {
            format!("{}\\{}", cwd, path)
        };
    }

    if path.starts_with('/') {
        return path.to_string();
    }
    if path == ".." {
        let mut parts: Vec<&str> = cwd.split('/').filter(|p| !p.is_empty()).collect();
        parts.pop();
        return format!("/{}", parts.join("/"));
    }
    if cwd.ends_with('/') {
        format!("{}{}", cwd, path)
    } else {
        format!("{}/{}", cwd, path)
    }
}

#[cfg(test)]
#[path = "../../../../tests/unit/kernel/services/adapters/shell.rs"]
mod tests;

//! 工作台：持有 Store 与服务宿主，执行副作用并把异步结果泵回 Store

use std::collections::VecDeque;
use std::io;
use std::sync::mpsc::Receiver;
use std::sync::Arc;

use crate::kernel::services::adapters::{
    FileSettingsStorage, SettingsService, ShellConfig, SimulatedShell, TokioExecutor,
};
use crate::kernel::services::ports::{AsyncExecutor, OperatingSystem, ShellEvent};
use crate::kernel::services::KernelServiceHost;
use crate::kernel::{Action, AppState, EditorCommand, Store};
use crate::models::{default_project, NodeId};

mod bridge;
mod tick;

const LOG_BUFFER_CAP: usize = 2000;
const MAX_LOG_DRAIN_PER_TICK: usize = 1024;
const MAX_KERNEL_BUS_DRAIN_PER_TICK: usize = 256;

pub struct Workbench {
    store: Store,
    services: KernelServiceHost,
    shell_events: Receiver<ShellEvent>,
    log_rx: Option<Receiver<String>>,
    logs: VecDeque<String>,
    /// 最近一次请求编辑器定位的位置
    revealed: Option<(NodeId, usize)>,
    /// 转发给编辑器控件、尚未被取走的命令
    editor_commands: Vec<EditorCommand>,
}

impl Workbench {
    /// 装载示例项目，打开第一个文件，并执行启动副作用
    pub fn new(
        settings: SettingsService,
        shell: SimulatedShell,
        executor: Arc<dyn AsyncExecutor>,
        log_rx: Option<Receiver<String>>,
    ) -> io::Result<Self> {
        let tree = default_project().map_err(io::Error::other)?;
        let first_file = tree.files().next().map(|node| node.id());
        let state = AppState::new(tree, settings.get_settings());

        let shell_events = shell.subscribe();
        let mut services = KernelServiceHost::new(executor);
        services.register(settings).map_err(io::Error::other)?;
        services.register(shell).map_err(io::Error::other)?;

        let mut workbench = Self {
            store: Store::new(state),
            services,
            shell_events,
            log_rx,
            logs: VecDeque::with_capacity(LOG_BUFFER_CAP.min(256)),
            revealed: None,
            editor_commands: Vec::new(),
        };

        if let Some(id) = first_file {
            workbench.dispatch(Action::SelectFile(id));
        }
        for effect in workbench.store.startup_effects() {
            workbench.run_effect(effect);
        }
        tracing::info!(
            project = %workbench.store.state().project_name,
            files = workbench.store.state().tree.files().count(),
            "workbench ready"
        );
        Ok(workbench)
    }

    /// 默认组合：缓存目录下的设置文件（不可用时退回内存），当前系统对应的 shell
    pub fn with_defaults(log_rx: Option<Receiver<String>>) -> io::Result<Self> {
        let settings = match FileSettingsStorage::default_location() {
            Some(storage) => {
                tracing::info!(path = %storage.path().display(), "using settings file");
                SettingsService::new(storage)
            }
            None => {
                tracing::warn!("no cache directory; settings kept in memory");
                SettingsService::in_memory()
            }
        };
        let shell = SimulatedShell::for_os(OperatingSystem::current(), ShellConfig::default());
        let executor: Arc<dyn AsyncExecutor> = Arc::new(TokioExecutor::new()?);
        Self::new(settings, shell, executor, log_rx)
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn state(&self) -> &AppState {
        self.store.state()
    }

    pub fn services(&self) -> &KernelServiceHost {
        &self.services
    }

    pub fn logs(&self) -> impl Iterator<Item = &str> {
        self.logs.iter().map(String::as_str)
    }

    pub fn revealed(&self) -> Option<(NodeId, usize)> {
        self.revealed
    }

    pub fn take_editor_commands(&mut self) -> Vec<EditorCommand> {
        std::mem::take(&mut self.editor_commands)
    }

    fn shell(&self) -> Option<SimulatedShell> {
        let shell = self.services.get::<SimulatedShell>().cloned();
        if shell.is_none() {
            tracing::error!("SimulatedShell not registered");
        }
        shell
    }
}

use super::Workbench;
use crate::kernel::services::ports::ShellEvent;
use crate::kernel::services::KernelMessage;
use crate::kernel::Action;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::time::{Duration, Instant};

const IDLE_POLL_INTERVAL: Duration = Duration::from_millis(20);
const SLOW_QUEUE_WAIT: Duration = Duration::from_millis(50);

impl Workbench {
    /// 由主循环调用：回收异步结果、shell 事件与日志
    pub fn tick(&mut self) -> bool {
        let mut changed = false;
        changed |= self.poll_kernel_bus();
        changed |= self.poll_shell_events();
        changed |= self.poll_logs();
        changed
    }

    pub fn poll_kernel_bus(&mut self) -> bool {
        let mut changed = false;
        let mut drained = 0usize;
        while drained < super::MAX_KERNEL_BUS_DRAIN_PER_TICK {
            match self.services.try_recv() {
                Ok(msg) => {
                    drained += 1;
                    changed |= self.dispatch_message(msg);
                }
                Err(mpsc::TryRecvError::Empty) => break,
                Err(mpsc::TryRecvError::Disconnected) => break,
            }
        }
        changed
    }

    /// 阻塞直到后台任务全部结束且结果都已分发；超时返回 false
    pub fn wait_idle(&mut self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        loop {
            self.tick();
            if self.services.in_flight() == 0 && !self.store.state().terminal.is_executing() {
                // 计数归零前结果已入队
                self.tick();
                return true;
            }
            let Some(remaining) = deadline.checked_duration_since(Instant::now()) else {
                return false;
            };
            match self.services.recv_timeout(remaining.min(IDLE_POLL_INTERVAL)) {
                Ok(msg) => {
                    self.dispatch_message(msg);
                }
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => return false,
            }
        }
    }

    fn dispatch_message(&mut self, msg: KernelMessage) -> bool {
        let queue_wait = msg.queue_wait();
        if queue_wait > SLOW_QUEUE_WAIT {
            tracing::debug!(
                queue_wait_ms = queue_wait.as_millis() as u64,
                "kernel bus queue wait"
            );
        }
        self.dispatch(msg.action)
    }

    fn poll_shell_events(&mut self) -> bool {
        let mut changed = false;
        loop {
            match self.shell_events.try_recv() {
                Ok(ShellEvent::Cleared(id)) => {
                    changed |= self.dispatch(Action::TerminalCleared(id));
                }
                Ok(ShellEvent::SessionCreated(session)) => {
                    tracing::debug!(session = %session.id, "shell session created");
                }
                Ok(ShellEvent::SessionClosed(id)) => {
                    tracing::debug!(session = %id, "shell session closed");
                }
                Err(_) => break,
            }
        }
        changed
    }

    fn poll_logs(&mut self) -> bool {
        let Some(rx) = self.log_rx.as_ref() else {
            return false;
        };
        let mut received = 0usize;
        for line in rx.try_iter().take(super::MAX_LOG_DRAIN_PER_TICK) {
            if self.logs.len() >= super::LOG_BUFFER_CAP {
                self.logs.pop_front();
            }
            self.logs.push_back(line);
            received += 1;
        }
        received > 0
    }
}

//! 后台任务把结果以 action 的形式送回主循环

use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender, TryRecvError};
use std::time::{Duration, Instant};

use crate::kernel::Action;

#[derive(Debug)]
pub struct KernelMessage {
    pub action: Action,
    pub enqueued_at: Instant,
}

impl KernelMessage {
    pub fn new(action: Action) -> Self {
        Self {
            action,
            enqueued_at: Instant::now(),
        }
    }

    /// 在队列中等待的时间
    pub fn queue_wait(&self) -> Duration {
        self.enqueued_at.elapsed()
    }
}

#[derive(Clone)]
pub struct KernelBusSender {
    tx: Sender<KernelMessage>,
}

pub struct KernelBusReceiver {
    rx: Receiver<KernelMessage>,
}

pub fn kernel_bus() -> (KernelBusSender, KernelBusReceiver) {
    let (tx, rx) = mpsc::channel();
    (KernelBusSender { tx }, KernelBusReceiver { rx })
}

impl KernelBusSender {
    /// 接收端已关闭时返回 false
    pub fn send_action(&self, action: Action) -> bool {
        self.tx.send(KernelMessage::new(action)).is_ok()
    }
}

impl KernelBusReceiver {
    pub fn try_recv(&self) -> Result<KernelMessage, TryRecvError> {
        self.rx.try_recv()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Result<KernelMessage, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

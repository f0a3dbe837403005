use std::io;
use std::time::Duration;

use crate::kernel::services::ports::{AsyncExecutor, BoxFuture};

/// 持有 tokio 运行时；模拟 shell 的命令在这里执行
pub struct TokioExecutor {
    runtime: tokio::runtime::Runtime,
    multi_thread: bool,
}

impl TokioExecutor {
    pub fn new() -> io::Result<Self> {
        match tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .thread_name("codepad-worker")
            .enable_all()
            .build()
        {
            Ok(runtime) => Ok(Self {
                runtime,
                multi_thread: true,
            }),
            Err(e) => {
                tracing::error!(
                    error = %e,
                    "Failed to create multi-thread tokio runtime, falling back to current-thread"
                );
                Self::current_thread()
            }
        }
    }

    /// 单线程运行时：任务只在 `drive_for` 期间推进
    pub fn current_thread() -> io::Result<Self> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        Ok(Self {
            runtime,
            multi_thread: false,
        })
    }

    pub fn handle(&self) -> tokio::runtime::Handle {
        self.runtime.handle().clone()
    }
}

impl AsyncExecutor for TokioExecutor {
    fn spawn(&self, task: BoxFuture) {
        self.runtime.spawn(task);
    }

    fn needs_driving(&self) -> bool {
        !self.multi_thread
    }

    fn drive_for(&self, duration: Duration) {
        if self.multi_thread {
            std::thread::sleep(duration);
            return;
        }
        // Sleep 必须在运行时上下文内创建
        self.runtime.block_on(async move { tokio::time::sleep(duration).await });
    }
}

#[cfg(test)]
#[path = "../../../../tests/unit/kernel/services/adapters/runtime.rs"]
mod tests;

use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc::{RecvTimeoutError, TryRecvError};
use std::sync::Arc;
use std::time::Duration;

use crate::core::service::Result as ServiceResult;
use crate::core::{Service, ServiceRegistry};
use crate::kernel::Action;

use super::bus::{kernel_bus, KernelBusReceiver, KernelBusSender, KernelMessage};
use super::ports::AsyncExecutor;

/// 服务宿主：注册表 + 回送总线 + 执行器，并统计仍在运行的后台任务
pub struct KernelServiceHost {
    registry: ServiceRegistry,
    bus: KernelBusSender,
    rx: KernelBusReceiver,
    executor: Arc<dyn AsyncExecutor>,
    in_flight: Arc<AtomicUsize>,
}

/// 交给后台任务的句柄：派发任务、回送 action
#[derive(Clone)]
pub struct KernelServiceContext {
    bus: KernelBusSender,
    executor: Arc<dyn AsyncExecutor>,
    in_flight: Arc<AtomicUsize>,
}

/// 任务结束（包括 panic 展开）时计数减一
struct InFlightGuard(Arc<AtomicUsize>);

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::AcqRel);
    }
}

impl KernelServiceHost {
    pub fn new(executor: Arc<dyn AsyncExecutor>) -> Self {
        let (bus, rx) = kernel_bus();
        Self {
            registry: ServiceRegistry::new(),
            bus,
            rx,
            executor,
            in_flight: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn context(&self) -> KernelServiceContext {
        KernelServiceContext {
            bus: self.bus.clone(),
            executor: Arc::clone(&self.executor),
            in_flight: Arc::clone(&self.in_flight),
        }
    }

    pub fn register<S: Service>(&mut self, service: S) -> ServiceResult<()> {
        self.registry.register(service)
    }

    pub fn get<S: Service>(&self) -> Option<&S> {
        self.registry.get::<S>()
    }

    pub fn get_mut<S: Service>(&mut self) -> Option<&mut S> {
        self.registry.get_mut::<S>()
    }

    pub fn services(&self) -> &ServiceRegistry {
        &self.registry
    }

    /// 已派发但尚未结束的任务数
    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::Acquire)
    }

    pub fn try_recv(&self) -> Result<KernelMessage, TryRecvError> {
        self.rx.try_recv()
    }

    /// 单线程执行器先推进一段时间再取消息
    pub fn recv_timeout(&self, timeout: Duration) -> Result<KernelMessage, RecvTimeoutError> {
        if self.executor.needs_driving() {
            self.executor.drive_for(timeout);
            return self.rx.try_recv().map_err(|e| match e {
                TryRecvError::Empty => RecvTimeoutError::Timeout,
                TryRecvError::Disconnected => RecvTimeoutError::Disconnected,
            });
        }
        self.rx.recv_timeout(timeout)
    }
}

impl KernelServiceContext {
    pub fn dispatch(&self, action: Action) {
        if !self.bus.send_action(action) {
            tracing::debug!("kernel bus closed; dropping action");
        }
    }

    pub fn spawn_future<F>(&self, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.in_flight.fetch_add(1, Ordering::AcqRel);
        let guard = InFlightGuard(Arc::clone(&self.in_flight));
        self.executor.spawn(Box::pin(async move {
            let _guard = guard;
            task.await;
        }));
    }
}

#[cfg(test)]
#[path = "../../../tests/unit/kernel/services/host.rs"]
mod tests;

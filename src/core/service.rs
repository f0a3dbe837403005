use rustc_hash::FxHashMap;
use std::any::{Any, TypeId};

pub type Result<T> = std::result::Result<T, ServiceError>;

#[derive(Debug)]
pub enum ServiceError {
    NotFound(&'static str),
    AlreadyRegistered(&'static str),
}

impl std::fmt::Display for ServiceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ServiceError::NotFound(name) => write!(f, "Service not found: {}", name),
            ServiceError::AlreadyRegistered(name) => {
                write!(f, "Service already registered: {}", name)
            }
        }
    }
}

impl std::error::Error for ServiceError {}

/// 进程级服务：在组合根构造一次，按类型查找
pub trait Service: Any {
    fn name(&self) -> &'static str;
}

struct Entry {
    name: &'static str,
    service: Box<dyn Any>,
}

#[derive(Default)]
pub struct ServiceRegistry {
    services: FxHashMap<TypeId, Entry>,
}

impl ServiceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<S: Service>(&mut self, service: S) -> Result<()> {
        let type_id = TypeId::of::<S>();
        let name = service.name();
        if self.services.contains_key(&type_id) {
            return Err(ServiceError::AlreadyRegistered(name));
        }
        tracing::debug!(service = name, "service registered");
        self.services.insert(
            type_id,
            Entry {
                name,
                service: Box::new(service),
            },
        );
        Ok(())
    }

    pub fn get<S: Service>(&self) -> Option<&S> {
        self.services
            .get(&TypeId::of::<S>())
            .and_then(|e| e.service.downcast_ref::<S>())
    }

    pub fn get_mut<S: Service>(&mut self) -> Option<&mut S> {
        self.services
            .get_mut(&TypeId::of::<S>())
            .and_then(|e| e.service.downcast_mut::<S>())
    }

    /// 与 `get` 相同，但缺失时返回带类型名的错误
    pub fn require<S: Service>(&self) -> Result<&S> {
        self.get::<S>()
            .ok_or(ServiceError::NotFound(std::any::type_name::<S>()))
    }

    pub fn contains<S: Service>(&self) -> bool {
        self.services.contains_key(&TypeId::of::<S>())
    }

    pub fn names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.services.values().map(|e| e.name).collect();
        names.sort_unstable();
        names
    }
}

#[cfg(test)]
#[path = "../../tests/unit/core/service.rs"]
mod tests;

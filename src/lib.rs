//! Beacon Registry
//!
//! 命名服务注册发现适配层：把应用层的多端点服务实例注册到共享的
//! 命名服务，按逻辑名发现其他服务的端点，并把后端的变更推送桥接
//! 为可取消的阻塞拉取。
//!
//! 本层不实现命名后端，只通过 [`NamingClient`] 这个窄接口消费它；
//! 也不做重试、退避或超时控制，这些由调用方与客户端实现负责。

pub mod config;
pub mod error;
pub mod naming;
pub mod registry;

// Re-exports
pub use config::RegistryConfig;
pub use error::{RegistryError, Result};
pub use naming::{
    BackendInstance, ChangeCallback, DeregisterInstanceParam, NamingClient, NamingError,
    RegisterInstanceParam, SubscribeParam, UnsubscribeParam,
};
pub use registry::{
    DEFAULT_CLUSTER_NAME, DEFAULT_GROUP_NAME, DEFAULT_PREFIX_PATH, DEFAULT_WEIGHT,
    RESERVED_METADATA_KEY, Registry, RegistryOptions, ServiceInstance, Watcher,
    compose_service_key, decompose_endpoint, split_service_key,
};

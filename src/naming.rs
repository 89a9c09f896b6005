//! 命名服务客户端能力接口
//!
//! 适配层只通过这个窄接口访问命名后端。连接管理、服务端列表与
//! 心跳保活都属于客户端实现自己的职责，不在本层范围内。

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

/// 后端调用错误（由具体客户端实现决定）
pub type NamingError = Box<dyn std::error::Error + Send + Sync>;

/// 服务变更回调
///
/// 命名客户端在自己的任务上调用，参数为变更后的实例列表。
/// 回调必须假定与消费方并发执行，且不得阻塞。
pub type ChangeCallback = Arc<dyn Fn(Vec<BackendInstance>) + Send + Sync>;

/// 命名后端的原生实例记录
///
/// 一条记录只承载一个 IP:port，结构化的服务实例描述通过保留
/// 元数据键随扁平元数据一起存放。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendInstance {
    pub ip: String,
    pub port: u16,
    pub service_key: String,
    pub weight: f64,
    pub healthy: bool,
    pub enabled: bool,
    pub ephemeral: bool,
    pub metadata: HashMap<String, String>,
    pub cluster_name: String,
}

/// 注册实例参数
#[derive(Debug, Clone)]
pub struct RegisterInstanceParam {
    pub ip: String,
    pub port: u16,
    pub service_key: String,
    pub weight: f64,
    pub enabled: bool,
    pub healthy: bool,
    pub ephemeral: bool,
    pub metadata: HashMap<String, String>,
    pub cluster_name: String,
    pub group_name: String,
}

/// 注销实例参数
#[derive(Debug, Clone)]
pub struct DeregisterInstanceParam {
    pub ip: String,
    pub port: u16,
    pub service_key: String,
}

/// 订阅参数
pub struct SubscribeParam {
    pub service_key: String,
    pub group_name: String,
    pub clusters: Vec<String>,
    pub on_change: ChangeCallback,
}

/// 退订参数
#[derive(Debug, Clone)]
pub struct UnsubscribeParam {
    pub service_key: String,
    pub group_name: String,
    pub clusters: Vec<String>,
}

/// 命名客户端 trait
///
/// 所有命名后端客户端都需要实现这个 trait。实现必须是线程安全的，
/// 变更通知在客户端自己的任务上投递。
#[async_trait]
pub trait NamingClient: Send + Sync {
    /// 注册一条实例记录
    async fn register_instance(&self, param: RegisterInstanceParam) -> Result<(), NamingError>;

    /// 注销一条实例记录
    async fn deregister_instance(&self, param: DeregisterInstanceParam) -> Result<(), NamingError>;

    /// 查询一个服务键下的全部实例记录
    async fn get_service(&self, service_key: &str) -> Result<Vec<BackendInstance>, NamingError>;

    /// 订阅服务变更
    async fn subscribe(&self, param: SubscribeParam) -> Result<(), NamingError>;

    /// 退订服务变更
    ///
    /// 与 [`subscribe`](NamingClient::subscribe) 使用相同的
    /// 服务键 + 分组 + 集群三元组定位订阅。
    async fn unsubscribe(&self, param: UnsubscribeParam) -> Result<(), NamingError>;
}

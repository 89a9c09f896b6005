//! 服务注册发现适配层
//!
//! 把应用层的多端点服务实例映射为命名后端的单端点记录：注册时按
//! 端点拆分为 `name@scheme` 键下的独立记录，发现时逐条还原，监听
//! 时把后端的异步变更通知桥接为可取消的阻塞拉取。

pub mod endpoint;
pub mod instance;
pub mod marshal;
pub mod watcher;

pub use endpoint::{compose_service_key, decompose_endpoint, split_service_key};
pub use instance::ServiceInstance;
pub use marshal::RESERVED_METADATA_KEY;
pub use watcher::Watcher;

use crate::error::{RegistryError, Result};
use crate::naming::{DeregisterInstanceParam, NamingClient, RegisterInstanceParam};
use marshal::{marshal, unmarshal};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// 默认注册前缀（保留字段，当前没有操作使用它）
pub const DEFAULT_PREFIX_PATH: &str = "/golang/registry";
/// 默认集群名
pub const DEFAULT_CLUSTER_NAME: &str = "DEFAULT";
/// 默认分组名
pub const DEFAULT_GROUP_NAME: &str = "DEFAULT_GROUP";
/// 默认实例权重
pub const DEFAULT_WEIGHT: f64 = 10.0;

/// 注册中心构造期选项
///
/// 构造时校验一次，之后只读，可在并发调用间共享。
#[derive(Debug, Clone)]
pub struct RegistryOptions {
    /// 注册前缀（保留，未被任何操作使用）
    pub prefix_path: String,
    /// 实例权重
    pub weight: f64,
    /// 集群名
    pub cluster_name: String,
    /// 分组名
    pub group_name: String,
}

impl Default for RegistryOptions {
    fn default() -> Self {
        Self {
            prefix_path: DEFAULT_PREFIX_PATH.to_string(),
            weight: DEFAULT_WEIGHT,
            cluster_name: DEFAULT_CLUSTER_NAME.to_string(),
            group_name: DEFAULT_GROUP_NAME.to_string(),
        }
    }
}

impl RegistryOptions {
    /// 设置注册前缀
    pub fn with_prefix_path(mut self, prefix_path: impl Into<String>) -> Self {
        self.prefix_path = prefix_path.into();
        self
    }

    /// 设置实例权重
    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = weight;
        self
    }

    /// 设置集群名
    pub fn with_cluster_name(mut self, cluster_name: impl Into<String>) -> Self {
        self.cluster_name = cluster_name.into();
        self
    }

    /// 设置分组名
    pub fn with_group_name(mut self, group_name: impl Into<String>) -> Self {
        self.group_name = group_name.into();
        self
    }

    /// 校验选项
    pub fn validate(&self) -> Result<()> {
        if !self.weight.is_finite() || self.weight <= 0.0 {
            return Err(RegistryError::Config(format!(
                "weight must be a positive finite number, got {}",
                self.weight
            )));
        }
        if self.cluster_name.is_empty() {
            return Err(RegistryError::Config(
                "cluster name must not be empty".to_string(),
            ));
        }
        if self.group_name.is_empty() {
            return Err(RegistryError::Config(
                "group name must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// 服务注册发现适配器
///
/// 只持有只读选项和线程安全的命名客户端引用，各方法可被多个调用
/// 方并发使用；跨调用之间没有原子性保证，同一批端点上并发的注册
/// 与注销由后端自行裁决。
pub struct Registry {
    opts: RegistryOptions,
    client: Arc<dyn NamingClient>,
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("opts", &self.opts)
            .finish_non_exhaustive()
    }
}

impl Registry {
    /// 使用默认选项创建注册中心适配器
    pub fn new(client: Arc<dyn NamingClient>) -> Self {
        Self {
            opts: RegistryOptions::default(),
            client,
        }
    }

    /// 使用自定义选项创建，选项在此处校验一次
    pub fn with_options(client: Arc<dyn NamingClient>, opts: RegistryOptions) -> Result<Self> {
        opts.validate()?;
        Ok(Self { opts, client })
    }

    /// 当前生效的选项
    pub fn options(&self) -> &RegistryOptions {
        &self.opts
    }

    /// 注册服务实例
    ///
    /// 实例的每个端点独立注册为 `name@scheme` 键下的一条后端记录，
    /// 遇到第一个错误立即返回，已注册的端点不会回滚，由调用方重试
    /// 或清理。
    ///
    /// 注意：本方法会向 `instance.metadata` 写入保留键
    /// [`RESERVED_METADATA_KEY`]，调用后入参不再保持原样。
    pub async fn register(&self, instance: &mut ServiceInstance) -> Result<()> {
        let endpoints = instance.endpoints.clone();
        for endpoint in &endpoints {
            let (scheme, host, port) = decompose_endpoint(endpoint)?;

            // 归约到当前端点的副本进入保留元数据键
            let mut single = instance.clone();
            single.endpoints = vec![endpoint.clone()];
            let payload = marshal(&single)?;
            instance
                .metadata
                .insert(RESERVED_METADATA_KEY.to_string(), payload);

            let service_key = compose_service_key(&instance.name, &scheme);
            self.client
                .register_instance(RegisterInstanceParam {
                    ip: host.clone(),
                    port,
                    service_key: service_key.clone(),
                    weight: self.opts.weight,
                    enabled: true,
                    healthy: true,
                    ephemeral: true,
                    metadata: instance.metadata.clone(),
                    cluster_name: self.opts.cluster_name.clone(),
                    group_name: self.opts.group_name.clone(),
                })
                .await
                .map_err(|e| RegistryError::Backend {
                    op: "register instance",
                    context: endpoint.clone(),
                    source: e,
                })?;

            info!("Service registered: {} at {}:{}", service_key, host, port);
        }
        Ok(())
    }

    /// 注销服务实例
    ///
    /// 逐端点尽力注销：单个端点失败不会中断后续端点，全部端点处理
    /// 完后返回最后一次失败。
    pub async fn deregister(&self, instance: &ServiceInstance) -> Result<()> {
        let mut last_err: Option<RegistryError> = None;
        for endpoint in &instance.endpoints {
            let (scheme, host, port) = match decompose_endpoint(endpoint) {
                Ok(parts) => parts,
                Err(e) => {
                    warn!("Failed to resolve endpoint {}: {}", endpoint, e);
                    last_err = Some(e);
                    continue;
                }
            };

            let service_key = compose_service_key(&instance.name, &scheme);
            match self
                .client
                .deregister_instance(DeregisterInstanceParam {
                    ip: host.clone(),
                    port,
                    service_key: service_key.clone(),
                })
                .await
            {
                Ok(()) => {
                    info!("Service deregistered: {} at {}:{}", service_key, host, port);
                }
                Err(e) => {
                    warn!(
                        "Failed to deregister {} at {}:{}: {}",
                        service_key, host, port, e
                    );
                    last_err = Some(RegistryError::Backend {
                        op: "deregister instance",
                        context: format!("{host}:{port} ({service_key})"),
                        source: e,
                    });
                }
            }
        }
        match last_err {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    /// 按逻辑名查询服务实例
    ///
    /// 每条后端记录还原为一个实例，不按逻辑名合并，同一逻辑服务的
    /// 多个端点会以多个实例返回；任何一条记录解码失败都会使整个
    /// 调用失败。
    pub async fn get_service(&self, service_name: &str) -> Result<Vec<ServiceInstance>> {
        fetch_instances(self.client.as_ref(), service_name).await
    }

    /// 监听服务变更
    ///
    /// 监听会话拥有自己的生命周期，通过 [`Watcher::stop`] 结束。
    pub async fn watch(&self, service_name: &str) -> Result<Watcher> {
        self.watch_with_token(service_name, &CancellationToken::new())
            .await
    }

    /// 在给定生命周期内监听服务变更
    ///
    /// 监听会话使用 `parent` 的子令牌，父令牌取消时会话随之结束。
    pub async fn watch_with_token(
        &self,
        service_name: &str,
        parent: &CancellationToken,
    ) -> Result<Watcher> {
        Watcher::subscribe(
            self.client.clone(),
            service_name,
            self.opts.group_name.clone(),
            vec![self.opts.cluster_name.clone()],
            parent.child_token(),
        )
        .await
    }
}

/// 查询并解码一个逻辑名下的全部后端记录
pub(crate) async fn fetch_instances(
    client: &dyn NamingClient,
    service_name: &str,
) -> Result<Vec<ServiceInstance>> {
    let records = client
        .get_service(service_name)
        .await
        .map_err(|e| RegistryError::Backend {
            op: "get service",
            context: service_name.to_string(),
            source: e,
        })?;
    records.iter().map(unmarshal).collect()
}

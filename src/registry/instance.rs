//! 应用层服务实例定义

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// 应用层服务实例
///
/// 一个逻辑服务实例可以同时暴露多个协议端点（如 http 与 grpc），
/// 每个端点形如 `scheme://host:port`，由 scheme 区分协议。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ServiceInstance {
    /// 实例 ID
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// 逻辑服务名
    pub name: String,

    /// 版本
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    /// 自定义元数据
    #[serde(default)]
    pub metadata: HashMap<String, String>,

    /// 端点列表，形如 `scheme://host:port`
    #[serde(default)]
    pub endpoints: Vec<String>,
}

impl ServiceInstance {
    /// 创建新的服务实例
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            version: None,
            metadata: HashMap::new(),
            endpoints: Vec::new(),
        }
    }

    /// 设置实例 ID
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// 设置版本
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// 添加端点
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoints.push(endpoint.into());
        self
    }

    /// 添加元数据
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }
}

//! 配置定义
//!
//! 文件形式的注册中心配置，缺省字段落到与构造期选项一致的默认值

use crate::error::{RegistryError, Result};
use crate::registry::{
    DEFAULT_CLUSTER_NAME, DEFAULT_GROUP_NAME, DEFAULT_PREFIX_PATH, DEFAULT_WEIGHT, RegistryOptions,
};
use serde::{Deserialize, Serialize};

/// 注册中心配置
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RegistryConfig {
    #[serde(default = "default_prefix_path")]
    pub prefix_path: String,
    #[serde(default = "default_weight")]
    pub weight: f64,
    #[serde(default = "default_cluster_name")]
    pub cluster_name: String,
    #[serde(default = "default_group_name")]
    pub group_name: String,
}

fn default_prefix_path() -> String {
    DEFAULT_PREFIX_PATH.to_string()
}

fn default_weight() -> f64 {
    DEFAULT_WEIGHT
}

fn default_cluster_name() -> String {
    DEFAULT_CLUSTER_NAME.to_string()
}

fn default_group_name() -> String {
    DEFAULT_GROUP_NAME.to_string()
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            prefix_path: default_prefix_path(),
            weight: default_weight(),
            cluster_name: default_cluster_name(),
            group_name: default_group_name(),
        }
    }
}

impl RegistryConfig {
    /// 从 TOML 文件加载配置
    pub fn load_from_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| RegistryError::Config(format!("failed to read {path}: {e}")))?;
        toml::from_str(&content)
            .map_err(|e| RegistryError::Config(format!("failed to parse {path}: {e}")))
    }
}

impl From<RegistryConfig> for RegistryOptions {
    fn from(config: RegistryConfig) -> Self {
        RegistryOptions::default()
            .with_prefix_path(config.prefix_path)
            .with_weight(config.weight)
            .with_cluster_name(config.cluster_name)
            .with_group_name(config.group_name)
    }
}

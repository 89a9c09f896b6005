//! 注册中心适配层统一错误类型
//!
//! 提供统一的错误定义和结果类型别名，后端调用错误统一包上
//! 操作名与端点上下文便于定位问题

use thiserror::Error;

/// 注册中心适配层错误
#[derive(Error, Debug)]
pub enum RegistryError {
    /// 端点 URI 无法解析为 scheme + host + port
    #[error("malformed endpoint {endpoint}: {reason}")]
    MalformedEndpoint { endpoint: String, reason: String },

    /// 服务键的 `@` 分隔符数量不为一
    #[error("malformed service key: {key}")]
    MalformedServiceKey { key: String },

    /// 保留元数据键中的实例描述存在但已损坏
    #[error("failed to decode service instance for {service_key}")]
    Decode {
        service_key: String,
        #[source]
        source: serde_json::Error,
    },

    /// 底层命名客户端调用失败
    #[error("{op} failed for {context}")]
    Backend {
        op: &'static str,
        context: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// 监听会话已取消（终态，与后端/解码错误区分）
    #[error("watch cancelled")]
    WatchCancelled,

    /// 配置无效
    #[error("invalid registry config: {0}")]
    Config(String),
}

/// 注册中心适配层结果类型
pub type Result<T> = std::result::Result<T, RegistryError>;

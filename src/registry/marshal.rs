//! 实例编组
//!
//! 完整的服务实例以 JSON 形式存进后端记录的保留元数据键，这样
//! 结构化描述能原样穿过后端的扁平记录模型。读取时优先走保留键
//! 快速路径；对其他系统原生注册的记录退化为按服务键尽力重建。

use crate::error::{RegistryError, Result};
use crate::naming::BackendInstance;
use crate::registry::endpoint::split_service_key;
use crate::registry::instance::ServiceInstance;

/// 保留元数据键，存放完整的服务实例描述
///
/// 后端记录若已把该键用作他途，注册时会被覆盖，读取时会被误读。
pub const RESERVED_METADATA_KEY: &str = "serviceInstance";

/// 其他系统注册的记录无法从服务键拆出协议时的默认协议
const FALLBACK_SCHEME: &str = "http";

/// 将服务实例序列化为保留元数据键的取值
pub fn marshal(instance: &ServiceInstance) -> Result<String> {
    serde_json::to_string(instance).map_err(|e| RegistryError::Backend {
        op: "marshal service instance",
        context: instance.name.clone(),
        source: Box::new(e),
    })
}

/// 将后端记录还原为服务实例
///
/// 保留键存在时直接反序列化，载荷损坏是唯一的失败情形。保留键
/// 缺失说明记录来自其他注册方，此时按 `name@scheme` 服务键重建：
/// 拆分失败则保留原始服务键作为逻辑名并默认 http 协议，端点合成
/// 为 `scheme://ip:port`，扁平元数据原样带回。该路径不会失败。
pub fn unmarshal(record: &BackendInstance) -> Result<ServiceInstance> {
    if let Some(raw) = record.metadata.get(RESERVED_METADATA_KEY) {
        return serde_json::from_str(raw).map_err(|e| RegistryError::Decode {
            service_key: record.service_key.clone(),
            source: e,
        });
    }

    let (name, scheme) = match split_service_key(&record.service_key) {
        Ok(split) => split,
        Err(_) => (record.service_key.clone(), FALLBACK_SCHEME.to_string()),
    };
    Ok(ServiceInstance {
        id: None,
        name,
        version: None,
        metadata: record.metadata.clone(),
        endpoints: vec![format!("{}://{}:{}", scheme, record.ip, record.port)],
    })
}

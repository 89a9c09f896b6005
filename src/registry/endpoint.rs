//! 端点与服务键编解码

use crate::error::{RegistryError, Result};

/// 拆解 `scheme://host:port` 形式的端点，返回 (协议, 主机, 端口)
///
/// 带方括号的 IPv6 主机会去掉方括号。端点中的路径、查询串等其他
/// URI 成分不被支持。
pub fn decompose_endpoint(endpoint: &str) -> Result<(String, String, u16)> {
    let parts: Vec<&str> = endpoint.split("://").collect();
    if parts.len() != 2 {
        return Err(RegistryError::MalformedEndpoint {
            endpoint: endpoint.to_string(),
            reason: "expected exactly one scheme separator".to_string(),
        });
    }
    let scheme = parts[0];
    let authority = parts[1];

    let (host, port_str) =
        authority
            .rsplit_once(':')
            .ok_or_else(|| RegistryError::MalformedEndpoint {
                endpoint: endpoint.to_string(),
                reason: "missing port".to_string(),
            })?;
    // [::1]:8080 -> ::1
    let host = host
        .strip_prefix('[')
        .and_then(|h| h.strip_suffix(']'))
        .unwrap_or(host);

    let port = port_str
        .trim()
        .parse::<u16>()
        .map_err(|_| RegistryError::MalformedEndpoint {
            endpoint: endpoint.to_string(),
            reason: format!("invalid port {port_str:?}"),
        })?;

    Ok((scheme.to_string(), host.to_string(), port))
}

/// 组合服务键：`logicalName@scheme`
pub fn compose_service_key(name: &str, scheme: &str) -> String {
    format!("{name}@{scheme}")
}

/// 拆分服务键，要求恰好一个 `@` 分隔符
///
/// 空的逻辑名或协议是合法的（`"@"` 拆出两个空串），分隔符数量
/// 不为一才算格式错误。
pub fn split_service_key(key: &str) -> Result<(String, String)> {
    let parts: Vec<&str> = key.split('@').collect();
    if parts.len() != 2 {
        return Err(RegistryError::MalformedServiceKey {
            key: key.to_string(),
        });
    }
    Ok((parts[0].to_string(), parts[1].to_string()))
}

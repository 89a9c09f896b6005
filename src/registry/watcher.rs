//! 监听会话
//!
//! 把命名后端的回调式变更通知桥接为阻塞拉取：订阅回调只向容量为
//! 1 的唤醒槽做非阻塞投递，两次拉取之间的连续变更坍缩成一次待
//! 处理唤醒；`next` 在取消与唤醒之间竞争等待，醒来后重新查询并
//! 返回完整快照。

use crate::error::{RegistryError, Result};
use crate::naming::{NamingClient, SubscribeParam, UnsubscribeParam};
use crate::registry::instance::ServiceInstance;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::{Mutex, mpsc};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// 服务变更监听会话
///
/// 由 [`Registry::watch`](crate::registry::Registry::watch) 创建。
/// 唤醒槽是回调与消费方之间唯一的共享状态，容量 1 的非阻塞投递
/// 同时提供同步与合并，无需额外加锁。
pub struct Watcher {
    service_name: String,
    group_name: String,
    clusters: Vec<String>,
    client: Arc<dyn NamingClient>,
    token: CancellationToken,
    wakeup: Mutex<mpsc::Receiver<()>>,
    unsubscribed: AtomicBool,
}

impl Watcher {
    /// 创建会话并向后端发起订阅
    pub(crate) async fn subscribe(
        client: Arc<dyn NamingClient>,
        service_name: &str,
        group_name: String,
        clusters: Vec<String>,
        token: CancellationToken,
    ) -> Result<Self> {
        let (tx, rx) = mpsc::channel(1);
        client
            .subscribe(SubscribeParam {
                service_key: service_name.to_string(),
                group_name: group_name.clone(),
                clusters: clusters.clone(),
                on_change: Arc::new(move |_services| {
                    // 满槽说明已有待处理唤醒，丢弃本次通知
                    let _ = tx.try_send(());
                }),
            })
            .await
            .map_err(|e| RegistryError::Backend {
                op: "subscribe",
                context: service_name.to_string(),
                source: e,
            })?;
        debug!("Subscribed to service changes: {}", service_name);

        Ok(Self {
            service_name: service_name.to_string(),
            group_name,
            clusters,
            client,
            token,
            wakeup: Mutex::new(rx),
            unsubscribed: AtomicBool::new(false),
        })
    }

    /// 等待下一次服务变更并返回最新快照
    ///
    /// 阻塞直到出现待处理唤醒或会话被取消。取消后返回
    /// [`RegistryError::WatchCancelled`]，该错误是终态。两次 `next`
    /// 之间的 N 次变更通知只产生一次快照刷新，快照解码与
    /// [`Registry::get_service`](crate::registry::Registry::get_service)
    /// 一样是全有或全无。
    pub async fn next(&self) -> Result<Vec<ServiceInstance>> {
        let mut wakeup = self.wakeup.lock().await;
        tokio::select! {
            // 取消优先于已就绪的待处理唤醒
            biased;
            _ = self.token.cancelled() => return Err(RegistryError::WatchCancelled),
            signal = wakeup.recv() => {
                if signal.is_none() {
                    // 后端丢弃了回调，订阅已不存在
                    return Err(RegistryError::WatchCancelled);
                }
            }
        }
        if self.token.is_cancelled() {
            return Err(RegistryError::WatchCancelled);
        }

        debug!("Service changed, refreshing snapshot: {}", self.service_name);
        super::fetch_instances(self.client.as_ref(), &self.service_name).await
    }

    /// 结束监听会话
    ///
    /// 取消会话令牌并向后端退订一次；阻塞中的和之后的 `next` 都会
    /// 返回 [`RegistryError::WatchCancelled`]。重复调用是安全的，
    /// 退订只发生一次。
    pub async fn stop(&self) -> Result<()> {
        self.token.cancel();
        if self.unsubscribed.swap(true, Ordering::SeqCst) {
            return Ok(());
        }
        self.client
            .unsubscribe(UnsubscribeParam {
                service_key: self.service_name.clone(),
                group_name: self.group_name.clone(),
                clusters: self.clusters.clone(),
            })
            .await
            .map_err(|e| RegistryError::Backend {
                op: "unsubscribe",
                context: self.service_name.clone(),
                source: e,
            })
    }
}

impl Drop for Watcher {
    fn drop(&mut self) {
        self.token.cancel();
        if self.unsubscribed.swap(true, Ordering::SeqCst) {
            return;
        }
        // 未显式 stop 的会话在运行时可用时仍然退订
        if let Ok(handle) = tokio::runtime::Handle::try_current() {
            let client = self.client.clone();
            let service_name = self.service_name.clone();
            let param = UnsubscribeParam {
                service_key: self.service_name.clone(),
                group_name: self.group_name.clone(),
                clusters: self.clusters.clone(),
            };
            handle.spawn(async move {
                if let Err(e) = client.unsubscribe(param).await {
                    warn!("Failed to unsubscribe from {}: {}", service_name, e);
                }
            });
        }
    }
}

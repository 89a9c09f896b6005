//! 测试用的内存命名客户端
//!
//! 记录全部后端调用，支持按服务键注入失败，并允许测试主动触发
//! 订阅回调。

#![allow(dead_code)]

use async_trait::async_trait;
use beacon_registry::{
    BackendInstance, ChangeCallback, DeregisterInstanceParam, NamingClient, NamingError,
    RegisterInstanceParam, SubscribeParam, UnsubscribeParam,
};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

#[derive(Default)]
pub struct MockState {
    pub registered: Vec<RegisterInstanceParam>,
    pub deregistered: Vec<DeregisterInstanceParam>,
    pub services: HashMap<String, Vec<BackendInstance>>,
    pub callbacks: Vec<(String, ChangeCallback)>,
    pub unsubscribed: Vec<UnsubscribeParam>,
    pub fail_register_for: Option<String>,
    pub fail_deregister_for: Option<String>,
}

/// 内存命名客户端
#[derive(Default)]
pub struct MockNamingClient {
    pub state: Mutex<MockState>,
}

impl MockNamingClient {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// 预置一个服务键下的后端记录
    pub fn put_service(&self, service_key: &str, records: Vec<BackendInstance>) {
        self.state
            .lock()
            .unwrap()
            .services
            .insert(service_key.to_string(), records);
    }

    /// 让指定服务键的注册调用失败
    pub fn fail_register_for(&self, service_key: &str) {
        self.state.lock().unwrap().fail_register_for = Some(service_key.to_string());
    }

    /// 让指定服务键的注销调用失败
    pub fn fail_deregister_for(&self, service_key: &str) {
        self.state.lock().unwrap().fail_deregister_for = Some(service_key.to_string());
    }

    /// 触发一次指定服务的变更通知
    pub fn notify(&self, service_key: &str) {
        let callbacks: Vec<ChangeCallback> = self
            .state
            .lock()
            .unwrap()
            .callbacks
            .iter()
            .filter(|(key, _)| key == service_key)
            .map(|(_, cb)| cb.clone())
            .collect();
        for cb in callbacks {
            cb(Vec::new());
        }
    }

    pub fn registered(&self) -> Vec<RegisterInstanceParam> {
        self.state.lock().unwrap().registered.clone()
    }

    pub fn deregistered(&self) -> Vec<DeregisterInstanceParam> {
        self.state.lock().unwrap().deregistered.clone()
    }

    pub fn unsubscribed(&self) -> Vec<UnsubscribeParam> {
        self.state.lock().unwrap().unsubscribed.clone()
    }
}

#[async_trait]
impl NamingClient for MockNamingClient {
    async fn register_instance(&self, param: RegisterInstanceParam) -> Result<(), NamingError> {
        let mut state = self.state.lock().unwrap();
        if state.fail_register_for.as_deref() == Some(param.service_key.as_str()) {
            return Err(format!("register refused for {}", param.service_key).into());
        }
        state.registered.push(param);
        Ok(())
    }

    async fn deregister_instance(&self, param: DeregisterInstanceParam) -> Result<(), NamingError> {
        let mut state = self.state.lock().unwrap();
        if state.fail_deregister_for.as_deref() == Some(param.service_key.as_str()) {
            return Err(format!("deregister refused for {}", param.service_key).into());
        }
        state.deregistered.push(param);
        Ok(())
    }

    async fn get_service(&self, service_key: &str) -> Result<Vec<BackendInstance>, NamingError> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .services
            .get(service_key)
            .cloned()
            .unwrap_or_default())
    }

    async fn subscribe(&self, param: SubscribeParam) -> Result<(), NamingError> {
        self.state
            .lock()
            .unwrap()
            .callbacks
            .push((param.service_key, param.on_change));
        Ok(())
    }

    async fn unsubscribe(&self, param: UnsubscribeParam) -> Result<(), NamingError> {
        let mut state = self.state.lock().unwrap();
        state.callbacks.retain(|(key, _)| key != &param.service_key);
        state.unsubscribed.push(param);
        Ok(())
    }
}

/// 构造一条无保留元数据的后端记录
pub fn backend_instance(service_key: &str, ip: &str, port: u16) -> BackendInstance {
    BackendInstance {
        ip: ip.to_string(),
        port,
        service_key: service_key.to_string(),
        weight: 10.0,
        healthy: true,
        enabled: true,
        ephemeral: true,
        metadata: HashMap::new(),
        cluster_name: "DEFAULT".to_string(),
    }
}

use crate::error::{DeskError, DeskResult};
use async_trait::async_trait;
use serde::{Serialize, de::DeserializeOwned};
use worker::wasm_bindgen::JsValue;

/// 抽象存储接口：负责数据的持久化
#[async_trait(?Send)]
pub trait StorageAdapter {
    async fn get<T: DeserializeOwned>(&self, key: &str) -> DeskResult<Option<T>>;
    async fn put<T: Serialize>(&self, key: &str, value: &T) -> DeskResult<()>;
    async fn delete(&self, key: &str) -> DeskResult<bool>;
    /// 按前缀列出，返回 (去掉前缀的 key, value)，按 key 排序
    async fn list_prefix<T: DeserializeOwned>(&self, prefix: &str) -> DeskResult<Vec<(String, T)>>;
}

/// 抽象环境变量接口：负责访问环境变量和 secrets
pub trait EnvAdapter {
    fn var(&self, name: &str) -> Option<String>;
    fn secret(&self, name: &str) -> Option<String>;
}

// =========================================================
// 生产环境实现 (Worker)
// =========================================================

pub struct WorkerStorage(pub worker::Storage);

#[async_trait(?Send)]
impl StorageAdapter for WorkerStorage {
    async fn get<T: DeserializeOwned>(&self, key: &str) -> DeskResult<Option<T>> {
        self.0.get(key).await.or_else(|e| {
            // 某些版本的 worker crate 在 key 不存在时会报错
            let msg = e.to_string();
            if msg.contains("No such value") {
                Ok(None)
            } else {
                Err(DeskError::from(e).in_op_with("storage.get", key))
            }
        })
    }

    async fn put<T: Serialize>(&self, key: &str, value: &T) -> DeskResult<()> {
        self.0
            .put(key, value)
            .await
            .map_err(|e| DeskError::from(e).in_op_with("storage.put", key))
    }

    async fn delete(&self, key: &str) -> DeskResult<bool> {
        self.0
            .delete(key)
            .await
            .map_err(|e| DeskError::from(e).in_op_with("storage.delete", key))
    }

    async fn list_prefix<T: DeserializeOwned>(&self, prefix: &str) -> DeskResult<Vec<(String, T)>> {
        let opts = worker::ListOptions::new().prefix(prefix);
        let raw_map = self
            .0
            .list_with_options(opts)
            .await
            .map_err(|e| DeskError::from(e).in_op_with("storage.list", prefix))?;

        let mut entries: Vec<(JsValue, JsValue)> = Vec::new();
        raw_map.for_each(&mut |value, key| entries.push((key, value)));

        let mut result = Vec::with_capacity(entries.len());
        for (key_js, val_js) in entries {
            let key = key_js
                .as_string()
                .ok_or_else(|| DeskError::store("Key is not string").in_op("storage.list"))?;
            let val: T = serde_wasm_bindgen::from_value(val_js).map_err(|e| {
                DeskError::serialization(e.to_string()).in_op_with("storage.list", key.clone())
            })?;
            let stripped = key.strip_prefix(prefix).unwrap_or(&key).to_string();
            result.push((stripped, val));
        }
        result.sort_by(|a, b| a.0.cmp(&b.0));

        Ok(result)
    }
}

/// Worker Env 的 EnvAdapter 实现
pub struct WorkerEnv<'a>(pub &'a worker::Env);

impl<'a> EnvAdapter for WorkerEnv<'a> {
    fn var(&self, name: &str) -> Option<String> {
        self.0.var(name).ok().map(|v| v.to_string())
    }

    fn secret(&self, name: &str) -> Option<String> {
        self.0.secret(name).ok().map(|s| s.to_string())
    }
}

// =========================================================
// 测试环境实现 (Mock)
// =========================================================

#[cfg(test)]
pub mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::{BTreeMap, HashMap};

    /// 存储序列化后的 JSON 字符串，模拟真实存储的序列化边界
    pub struct MockStorage {
        pub map: RefCell<BTreeMap<String, String>>,
    }

    impl MockStorage {
        pub fn new() -> Self {
            Self {
                map: RefCell::new(BTreeMap::new()),
            }
        }
    }

    pub struct MockEnv {
        vars: HashMap<String, String>,
        secrets: HashMap<String, String>,
    }

    impl MockEnv {
        pub fn new() -> Self {
            Self {
                vars: HashMap::new(),
                secrets: HashMap::new(),
            }
        }

        pub fn with_var(mut self, name: &str, value: &str) -> Self {
            self.vars.insert(name.to_string(), value.to_string());
            self
        }

        pub fn with_secret(mut self, name: &str, value: &str) -> Self {
            self.secrets.insert(name.to_string(), value.to_string());
            self
        }
    }

    impl EnvAdapter for MockEnv {
        fn var(&self, name: &str) -> Option<String> {
            self.vars.get(name).cloned()
        }

        fn secret(&self, name: &str) -> Option<String> {
            self.secrets.get(name).cloned()
        }
    }

    #[async_trait(?Send)]
    impl StorageAdapter for MockStorage {
        async fn get<T: DeserializeOwned>(&self, key: &str) -> DeskResult<Option<T>> {
            let map = self.map.borrow();
            match map.get(key) {
                Some(val_str) => Ok(Some(serde_json::from_str(val_str)?)),
                None => Ok(None),
            }
        }

        async fn put<T: Serialize>(&self, key: &str, value: &T) -> DeskResult<()> {
            let val_str = serde_json::to_string(value)?;
            self.map.borrow_mut().insert(key.to_string(), val_str);
            Ok(())
        }

        async fn delete(&self, key: &str) -> DeskResult<bool> {
            Ok(self.map.borrow_mut().remove(key).is_some())
        }

        async fn list_prefix<T: DeserializeOwned>(
            &self,
            prefix: &str,
        ) -> DeskResult<Vec<(String, T)>> {
            let map = self.map.borrow();
            let mut result = Vec::new();
            for (k, v_str) in map.range(prefix.to_string()..) {
                let Some(stripped) = k.strip_prefix(prefix) else {
                    break;
                };
                result.push((stripped.to_string(), serde_json::from_str(v_str)?));
            }
            Ok(result)
        }
    }

    // =========================================================
    // MockStorage 单元测试
    // =========================================================

    #[tokio::test]
    async fn test_mock_storage_put_get_delete() {
        let storage = MockStorage::new();

        storage.put("key1", &"value1".to_string()).await.unwrap();
        let retrieved: Option<String> = storage.get("key1").await.unwrap();
        assert_eq!(retrieved, Some("value1".to_string()));

        assert!(storage.delete("key1").await.unwrap());
        assert!(!storage.delete("key1").await.unwrap());
        let result: Option<String> = storage.get("key1").await.unwrap();
        assert_eq!(result, None);
    }

    #[tokio::test]
    async fn test_mock_storage_list_prefix() {
        let storage = MockStorage::new();
        storage.put("eventos:b", &2).await.unwrap();
        storage.put("eventos:a", &1).await.unwrap();
        storage.put("sesion:x", &9).await.unwrap();
        storage.put("usuarios:z", &3).await.unwrap();

        let listed: Vec<(String, i32)> = storage.list_prefix("eventos:").await.unwrap();
        assert_eq!(listed, vec![("a".to_string(), 1), ("b".to_string(), 2)]);

        let empty: Vec<(String, i32)> = storage.list_prefix("nada:").await.unwrap();
        assert!(empty.is_empty());
    }

    #[test]
    fn test_mock_env() {
        let env = MockEnv::new()
            .with_var("STORE_BINDING", "STORE")
            .with_secret("ACCOUNTS", "a@b.c:secret");
        assert_eq!(env.var("STORE_BINDING").as_deref(), Some("STORE"));
        assert_eq!(env.secret("ACCOUNTS").as_deref(), Some("a@b.c:secret"));
        assert_eq!(env.var("MISSING"), None);
    }
}

//! LocalStorage 封装模块

/// 后端地址
pub const KEY_API_URL: &str = "eventdesk_api_url";
/// 会话 token
pub const KEY_SESSION_TOKEN: &str = "eventdesk_session";

/// 浏览器 LocalStorage 的静态访问入口，所有失败都静默处理
pub struct LocalStorage;

impl LocalStorage {
    fn storage() -> Option<web_sys::Storage> {
        web_sys::window()?.local_storage().ok()?
    }

    /// 键不存在或存储不可用时返回 `None`
    pub fn get(key: &str) -> Option<String> {
        Self::storage()?
            .get_item(key)
            .ok()?
            .filter(|v| !v.is_empty())
    }

    pub fn set(key: &str, value: &str) -> bool {
        Self::storage()
            .and_then(|s| s.set_item(key, value).ok())
            .is_some()
    }

    pub fn delete(key: &str) -> bool {
        Self::storage()
            .and_then(|s| s.remove_item(key).ok())
            .is_some()
    }
}

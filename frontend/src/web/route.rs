//! 路由定义模块 - 领域模型
//!
//! 纯粹的业务逻辑层，不依赖于 DOM 或 web_sys。

use std::fmt::Display;

/// 应用路由枚举
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AppRoute {
    /// 登录页面 (默认路由)
    #[default]
    Login,
    /// 主菜单
    Menu,
    /// 新建事件
    NewEvent,
    /// 事件列表与编辑
    Events,
    NotFound,
}

impl AppRoute {
    /// 将 URL path 解析为路由枚举，忽略末尾的 `/`
    pub fn from_path(path: &str) -> Self {
        let trimmed = path.trim_end_matches('/');
        match trimmed {
            "" | "/login" => Self::Login,
            "/menu" => Self::Menu,
            "/eventos/nuevo" => Self::NewEvent,
            "/eventos" => Self::Events,
            _ => Self::NotFound,
        }
    }

    pub fn to_path(&self) -> &'static str {
        match self {
            Self::Login => "/",
            Self::Menu => "/menu",
            Self::NewEvent => "/eventos/nuevo",
            Self::Events => "/eventos",
            Self::NotFound => "/404",
        }
    }

    /// **核心守卫逻辑：定义该路由是否需要认证**
    pub fn requires_auth(&self) -> bool {
        matches!(self, Self::Menu | Self::NewEvent | Self::Events)
    }

    /// 已认证用户是否应该离开此路由（登录页）
    pub fn should_redirect_when_authenticated(&self) -> bool {
        matches!(self, Self::Login)
    }

    pub fn auth_failure_redirect() -> Self {
        Self::Login
    }

    pub fn auth_success_redirect() -> Self {
        Self::Menu
    }
}

impl Display for AppRoute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths() {
        assert_eq!(AppRoute::from_path("/"), AppRoute::Login);
        assert_eq!(AppRoute::from_path("/menu/"), AppRoute::Menu);
        assert_eq!(AppRoute::from_path("/eventos"), AppRoute::Events);
        assert_eq!(AppRoute::from_path("/eventos/nuevo"), AppRoute::NewEvent);
        assert_eq!(AppRoute::from_path("/reportes"), AppRoute::NotFound);

        for route in [AppRoute::Menu, AppRoute::NewEvent, AppRoute::Events] {
            assert_eq!(AppRoute::from_path(route.to_path()), route);
            assert!(route.requires_auth());
        }
    }

    #[test]
    fn test_guard_targets() {
        assert!(!AppRoute::Login.requires_auth());
        assert!(AppRoute::Login.should_redirect_when_authenticated());
        assert_eq!(AppRoute::auth_success_redirect(), AppRoute::Menu);
        assert_eq!(AppRoute::auth_failure_redirect(), AppRoute::Login);
    }
}

//! 主菜单选项

/// 点击选项后到真正跳转之间的延迟（毫秒），期间按钮显示加载状态
pub const NAVIGATION_DELAY_MS: u64 = 500;

/// "即将推出" 弹窗自动关闭的时间（毫秒）
pub const COMING_SOON_CLOSE_MS: u64 = 5000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MenuOption {
    NewEvent,
    ModifyEvents,
    Reports,
    Dashboard,
}

/// 选项的去向
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuTarget {
    /// 应用内路径
    Path(&'static str),
    /// 尚未实现的页面，展示提示弹窗
    ComingSoon(&'static str),
}

impl MenuOption {
    pub const ALL: [MenuOption; 4] = [
        MenuOption::NewEvent,
        MenuOption::ModifyEvents,
        MenuOption::Reports,
        MenuOption::Dashboard,
    ];

    /// 键盘数字 1-4 对应的选项
    pub fn from_key(key: &str) -> Option<Self> {
        let index: usize = key.parse().ok()?;
        index.checked_sub(1).and_then(|i| Self::ALL.get(i).copied())
    }

    pub fn title(&self) -> &'static str {
        match self {
            MenuOption::NewEvent => "Captura Nuevo Evento",
            MenuOption::ModifyEvents => "Modificación de Evento",
            MenuOption::Reports => "Reportes",
            MenuOption::Dashboard => "Dashboard",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            MenuOption::NewEvent => "Registrar un evento nuevo con sus datos financieros",
            MenuOption::ModifyEvents => "Buscar, consultar y editar eventos existentes",
            MenuOption::Reports => "Reportes de facturación y cobranza",
            MenuOption::Dashboard => "Indicadores generales",
        }
    }

    pub fn target(&self) -> MenuTarget {
        match self {
            MenuOption::NewEvent => MenuTarget::Path("/eventos/nuevo"),
            MenuOption::ModifyEvents => MenuTarget::Path("/eventos"),
            MenuOption::Reports => MenuTarget::ComingSoon("reportes"),
            MenuOption::Dashboard => MenuTarget::ComingSoon("dashboard"),
        }
    }
}

pub fn coming_soon_message(section: &str) -> String {
    format!("La sección \"{}\" estará disponible pronto.", section)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digit_keys() {
        assert_eq!(MenuOption::from_key("1"), Some(MenuOption::NewEvent));
        assert_eq!(MenuOption::from_key("4"), Some(MenuOption::Dashboard));
        assert_eq!(MenuOption::from_key("0"), None);
        assert_eq!(MenuOption::from_key("5"), None);
        assert_eq!(MenuOption::from_key("a"), None);
    }

    #[test]
    fn test_targets() {
        assert_eq!(
            MenuOption::ModifyEvents.target(),
            MenuTarget::Path("/eventos")
        );
        assert_eq!(
            MenuOption::Reports.target(),
            MenuTarget::ComingSoon("reportes")
        );
        assert_eq!(
            coming_soon_message("dashboard"),
            "La sección \"dashboard\" estará disponible pronto."
        );
    }
}

use crate::store::adapter::EnvAdapter;
use std::time::Duration;

// =========================================================
// 常量定义
// =========================================================
const DEFAULT_STORE_BINDING: &str = "DOCUMENT_STORE";
const DEFAULT_ACCOUNTS_SECRET_NAME: &str = "ACCOUNTS";
const DEFAULT_SESSION_TTL_SECS: u64 = 8 * 60 * 60;

// =========================================================
// 运行时配置
// =========================================================

/// 从 `[vars]` 读取的运行时配置，缺失或非法值回落到默认值
#[derive(Debug, Clone, PartialEq)]
pub struct RuntimeConfig {
    pub store_binding: String,
    pub accounts_secret_name: String,
    pub session_ttl: Duration,
    /// 操作员集合为空时写入的名称（`OPERATOR_SEED`，逗号分隔）
    pub operator_seed: Vec<String>,
}

impl RuntimeConfig {
    pub fn new(env: &impl EnvAdapter) -> Self {
        let session_ttl_secs = env
            .var("SESSION_TTL_SECS")
            .and_then(|v| v.trim().parse::<u64>().ok())
            .filter(|v| *v > 0)
            .unwrap_or(DEFAULT_SESSION_TTL_SECS);

        let operator_seed = env
            .var("OPERATOR_SEED")
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|n| !n.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        Self {
            store_binding: env
                .var("STORE_BINDING")
                .unwrap_or_else(|| DEFAULT_STORE_BINDING.to_string()),
            accounts_secret_name: env
                .var("ACCOUNTS_SECRET_NAME")
                .unwrap_or_else(|| DEFAULT_ACCOUNTS_SECRET_NAME.to_string()),
            session_ttl: Duration::from_secs(session_ttl_secs),
            operator_seed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::adapter::tests::MockEnv;

    #[test]
    fn test_defaults() {
        let cfg = RuntimeConfig::new(&MockEnv::new());
        assert_eq!(cfg.store_binding, "DOCUMENT_STORE");
        assert_eq!(cfg.accounts_secret_name, "ACCOUNTS");
        assert_eq!(cfg.session_ttl, Duration::from_secs(28_800));
        assert!(cfg.operator_seed.is_empty());
    }

    #[test]
    fn test_overrides() {
        let env = MockEnv::new()
            .with_var("STORE_BINDING", "STORE")
            .with_var("SESSION_TTL_SECS", "600")
            .with_var("OPERATOR_SEED", "Ana, Luis,, ");
        let cfg = RuntimeConfig::new(&env);
        assert_eq!(cfg.store_binding, "STORE");
        assert_eq!(cfg.session_ttl, Duration::from_secs(600));
        assert_eq!(cfg.operator_seed, vec!["Ana", "Luis"]);

        let env = MockEnv::new().with_var("SESSION_TTL_SECS", "abc");
        assert_eq!(
            RuntimeConfig::new(&env).session_ttl,
            Duration::from_secs(28_800)
        );
    }
}

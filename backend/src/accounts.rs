use eventdesk_shared::AuthErrorCode;
use std::collections::HashMap;

/// 登录账号表，来自 secret：`email:password` 条目，以 `;` 或换行分隔
#[derive(Debug, Default)]
pub struct Accounts {
    entries: HashMap<String, String>,
}

/// 比较时间只取决于长度，不取决于首个不同字节的位置
pub(crate) fn constant_time_eq(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.as_bytes()
        .iter()
        .zip(b.as_bytes())
        .fold(0, |acc, (&x, &y)| acc | (x ^ y))
        == 0
}

impl Accounts {
    pub fn parse(raw: &str) -> Self {
        let entries = raw
            .split(['\n', ';'])
            .filter_map(|line| {
                let (email, password) = line.trim().split_once(':')?;
                let email = email.trim().to_lowercase();
                if email.is_empty() || password.is_empty() {
                    return None;
                }
                Some((email, password.to_string()))
            })
            .collect();
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 校验凭据，成功时返回规范化后的邮箱
    ///
    /// 未知邮箱与错误密码都报告为 `auth/invalid-credential`
    pub fn verify(&self, email: &str, password: &str) -> Result<String, AuthErrorCode> {
        let email = email.trim().to_lowercase();
        match self.entries.get(&email) {
            Some(expected) if constant_time_eq(expected, password) => Ok(email),
            _ => Err(AuthErrorCode::InvalidCredential),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_separators() {
        let accounts = Accounts::parse(
            "ana@example.com:secreto1;\n luis@example.com:clave:con:dos-puntos \n\nbroken\n:nomail",
        );
        assert_eq!(accounts.len(), 2);
        assert_eq!(
            accounts.verify("luis@example.com", "clave:con:dos-puntos"),
            Ok("luis@example.com".to_string())
        );
    }

    #[test]
    fn test_verify() {
        let accounts = Accounts::parse("Ana@Example.com:secreto1");
        assert_eq!(
            accounts.verify(" ANA@example.com ", "secreto1"),
            Ok("ana@example.com".to_string())
        );
        assert_eq!(
            accounts.verify("ana@example.com", "secreto2"),
            Err(AuthErrorCode::InvalidCredential)
        );
        assert_eq!(
            accounts.verify("otro@example.com", "secreto1"),
            Err(AuthErrorCode::InvalidCredential)
        );
        assert!(Accounts::parse("").is_empty());
    }

    #[test]
    fn test_constant_time_eq() {
        assert!(constant_time_eq("abc", "abc"));
        assert!(!constant_time_eq("abc", "abd"));
        assert!(!constant_time_eq("abc", "abcd"));
    }
}

//! 登录输入校验与认证错误码

use serde::{Deserialize, Serialize};
use std::fmt;

pub const MIN_PASSWORD_LEN: usize = 6;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// 登录表单的本地校验错误
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialsError {
    EmailRequired,
    EmailInvalid,
    PasswordRequired,
    PasswordTooShort,
}

impl fmt::Display for CredentialsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            CredentialsError::EmailRequired => "El correo electrónico es requerido",
            CredentialsError::EmailInvalid => "El formato del correo electrónico no es válido",
            CredentialsError::PasswordRequired => "La contraseña es requerida",
            CredentialsError::PasswordTooShort => {
                "La contraseña debe tener al menos 6 caracteres"
            }
        };
        f.write_str(msg)
    }
}

impl std::error::Error for CredentialsError {}

/// `local@domain.tld`：不含空白，恰好一个 `@`，域名部分含点且点两侧非空
pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    match domain.rsplit_once('.') {
        Some((host, tld)) => !host.is_empty() && !tld.is_empty(),
        None => false,
    }
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into().trim().to_string(),
            password: password.into(),
        }
    }

    /// 返回第一个校验错误
    pub fn validate(&self) -> Result<(), CredentialsError> {
        let email = self.email.trim();
        if email.is_empty() {
            return Err(CredentialsError::EmailRequired);
        }
        if !is_valid_email(email) {
            return Err(CredentialsError::EmailInvalid);
        }
        if self.password.trim().is_empty() {
            return Err(CredentialsError::PasswordRequired);
        }
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(CredentialsError::PasswordTooShort);
        }
        Ok(())
    }
}

// =========================================================
// 认证错误码
// =========================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthErrorCode {
    UserNotFound,
    WrongPassword,
    InvalidEmail,
    UserDisabled,
    TooManyRequests,
    NetworkRequestFailed,
    InvalidCredential,
}

impl AuthErrorCode {
    pub const ALL: [AuthErrorCode; 7] = [
        AuthErrorCode::UserNotFound,
        AuthErrorCode::WrongPassword,
        AuthErrorCode::InvalidEmail,
        AuthErrorCode::UserDisabled,
        AuthErrorCode::TooManyRequests,
        AuthErrorCode::NetworkRequestFailed,
        AuthErrorCode::InvalidCredential,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AuthErrorCode::UserNotFound => "auth/user-not-found",
            AuthErrorCode::WrongPassword => "auth/wrong-password",
            AuthErrorCode::InvalidEmail => "auth/invalid-email",
            AuthErrorCode::UserDisabled => "auth/user-disabled",
            AuthErrorCode::TooManyRequests => "auth/too-many-requests",
            AuthErrorCode::NetworkRequestFailed => "auth/network-request-failed",
            AuthErrorCode::InvalidCredential => "auth/invalid-credential",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str() == code)
    }

    pub fn message(&self) -> &'static str {
        match self {
            AuthErrorCode::UserNotFound => "No existe una cuenta con este correo electrónico",
            AuthErrorCode::WrongPassword => "Contraseña incorrecta",
            AuthErrorCode::InvalidEmail => "El formato del correo electrónico no es válido",
            AuthErrorCode::UserDisabled => "Esta cuenta ha sido deshabilitada",
            AuthErrorCode::TooManyRequests => "Demasiados intentos fallidos. Inténtalo más tarde",
            AuthErrorCode::NetworkRequestFailed => "Error de conexión. Verifica tu internet",
            AuthErrorCode::InvalidCredential => {
                "Credenciales inválidas. Verifica tu correo y contraseña"
            }
        }
    }
}

/// 登录失败时展示给用户的文本；未知错误码附带原始信息
pub fn sign_in_error_message(code: &str, detail: &str) -> String {
    match AuthErrorCode::from_code(code) {
        Some(known) => known.message().to_string(),
        None => format!("Error de autenticación: {}", detail),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_shape() {
        assert!(is_valid_email("ana@example.com"));
        assert!(is_valid_email("a.b@sub.example.mx"));
        assert!(!is_valid_email("ana@example"));
        assert!(!is_valid_email("ana example@x.com"));
        assert!(!is_valid_email("@x.com"));
        assert!(!is_valid_email("a@@x.com"));
        assert!(!is_valid_email("a@.com"));
    }

    #[test]
    fn test_first_error_wins() {
        let creds = Credentials::new("", "");
        assert_eq!(creds.validate(), Err(CredentialsError::EmailRequired));

        let creds = Credentials::new("bad", "");
        assert_eq!(creds.validate(), Err(CredentialsError::EmailInvalid));

        let creds = Credentials::new(" ana@example.com ", "   ");
        assert_eq!(creds.email, "ana@example.com");
        assert_eq!(creds.validate(), Err(CredentialsError::PasswordRequired));

        let creds = Credentials::new("ana@example.com", "12345");
        assert_eq!(creds.validate(), Err(CredentialsError::PasswordTooShort));
        assert_eq!(
            creds.validate().unwrap_err().to_string(),
            "La contraseña debe tener al menos 6 caracteres"
        );

        assert!(Credentials::new("ana@example.com", "123456").validate().is_ok());
    }

    #[test]
    fn test_error_code_messages() {
        for code in AuthErrorCode::ALL {
            assert_eq!(AuthErrorCode::from_code(code.as_str()), Some(code));
        }
        assert_eq!(
            sign_in_error_message("auth/wrong-password", ""),
            "Contraseña incorrecta"
        );
        assert_eq!(
            sign_in_error_message("auth/other", "boom"),
            "Error de autenticación: boom"
        );
    }
}

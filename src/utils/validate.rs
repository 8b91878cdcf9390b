/// 标题与学生姓名的最大长度（与数据库列宽一致）
pub const MAX_TITLE_LEN: usize = 100;
pub const MAX_NAME_LEN: usize = 100;

pub fn validate_title(title: &str) -> Result<(), &'static str> {
    if title.trim().is_empty() {
        return Err("Title must not be empty");
    }
    if title.chars().count() > MAX_TITLE_LEN {
        return Err("Title must be at most 100 characters");
    }
    Ok(())
}

pub fn validate_student_name(name: &str) -> Result<(), &'static str> {
    if name.trim().is_empty() {
        return Err("Please provide at least the student name");
    }
    if name.chars().count() > MAX_NAME_LEN {
        return Err("Student name must be at most 100 characters");
    }
    Ok(())
}

const MIN_PASSWORD_LEN: usize = 8;

/// 不允许作为新密码，包括内置管理员的初始密码
const COMMON_PASSWORDS: &[&str] = &[
    "admin123",
    "password",
    "password1",
    "12345678",
    "123456789",
    "qwerty123",
    "abcd1234",
    "letmein1",
    "welcome1",
];

type PasswordRule = (fn(&str) -> bool, &'static str);

const PASSWORD_RULES: &[PasswordRule] = &[
    (
        |p| p.chars().count() >= MIN_PASSWORD_LEN,
        "Password must be at least 8 characters long",
    ),
    (
        |p| p.chars().any(|c| c.is_ascii_uppercase()),
        "Password must contain at least one uppercase letter",
    ),
    (
        |p| p.chars().any(|c| c.is_ascii_lowercase()),
        "Password must contain at least one lowercase letter",
    ),
    (
        |p| p.chars().any(|c| c.is_ascii_digit()),
        "Password must contain at least one digit",
    ),
    (
        |p| !COMMON_PASSWORDS.iter().any(|w| p.eq_ignore_ascii_case(w)),
        "Password is too common, please choose a stronger password",
    ),
];

/// 未满足的密码规则
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordPolicyError(pub Vec<&'static str>);

impl std::fmt::Display for PasswordPolicyError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0.join("; "))
    }
}

/// 密码策略：至少 8 位，包含大小写字母和数字，且不是常见弱密码
pub fn validate_password(password: &str) -> Result<(), PasswordPolicyError> {
    let failed: Vec<_> = PASSWORD_RULES
        .iter()
        .filter(|(check, _)| !check(password))
        .map(|(_, message)| *message)
        .collect();

    if failed.is_empty() {
        Ok(())
    } else {
        Err(PasswordPolicyError(failed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn failures(password: &str) -> Vec<&'static str> {
        validate_password(password).err().map(|e| e.0).unwrap_or_default()
    }

    #[test]
    fn test_titles_and_names() {
        assert!(validate_title("Week 1 notes").is_ok());
        assert!(validate_title("   ").is_err());
        assert!(validate_title(&"t".repeat(101)).is_err());
        assert!(validate_title(&"é".repeat(100)).is_ok());
        assert_eq!(
            validate_student_name(""),
            Err("Please provide at least the student name")
        );
    }

    #[test]
    fn test_strong_passwords_pass() {
        assert!(validate_password("SecureP@ss1").is_ok());
        assert!(validate_password("Ananas2024").is_ok());
    }

    #[test]
    fn test_default_admin_password_rejected() {
        let failed = failures("admin123");
        assert!(failed.contains(&"Password is too common, please choose a stronger password"));
        assert!(failed.contains(&"Password must contain at least one uppercase letter"));
    }

    #[test]
    fn test_each_rule_reported() {
        assert_eq!(
            failures("Ab1"),
            vec!["Password must be at least 8 characters long"]
        );
        assert_eq!(
            failures("ZXCV5678"),
            vec!["Password must contain at least one lowercase letter"]
        );
        assert_eq!(
            failures("AbcdEfgh"),
            vec!["Password must contain at least one digit"]
        );
        assert_eq!(
            failures("Password1"),
            vec!["Password is too common, please choose a stronger password"]
        );
    }

    #[test]
    fn test_error_message_joins_rules() {
        let err = validate_password("abc").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Password must be at least 8 characters long; \
             Password must contain at least one uppercase letter; \
             Password must contain at least one digit"
        );
    }
}

pub const MIN_PASSWORD_LEN: usize = 10;

/// Rule violated by a candidate password.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasswordRule {
    MinLength,
    Uppercase,
    Lowercase,
    Digit,
}

impl PasswordRule {
    pub fn message(&self) -> &'static str {
        match self {
            PasswordRule::MinLength => "Password must be at least 10 characters long",
            PasswordRule::Uppercase => "Password must contain an uppercase letter",
            PasswordRule::Lowercase => "Password must contain a lowercase letter",
            PasswordRule::Digit => "Password must contain a digit",
        }
    }
}

/// Every rule the password fails; empty means accepted.
pub fn password_violations(password: &str) -> Vec<PasswordRule> {
    let mut out = Vec::new();
    if password.chars().count() < MIN_PASSWORD_LEN {
        out.push(PasswordRule::MinLength);
    }
    if !password.chars().any(|c| c.is_uppercase()) {
        out.push(PasswordRule::Uppercase);
    }
    if !password.chars().any(|c| c.is_lowercase()) {
        out.push(PasswordRule::Lowercase);
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        out.push(PasswordRule::Digit);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_a_compliant_password() {
        assert!(password_violations("Frontdesk2024").is_empty());
    }

    #[test]
    fn reports_every_failed_rule() {
        assert_eq!(
            password_violations("short"),
            vec![
                PasswordRule::MinLength,
                PasswordRule::Uppercase,
                PasswordRule::Digit
            ]
        );
        assert_eq!(
            password_violations("ALLUPPERCASE1"),
            vec![PasswordRule::Lowercase]
        );
    }
}

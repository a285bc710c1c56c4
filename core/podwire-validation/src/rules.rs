use chrono::NaiveDate;

/// A single validation rule applied to one field's text value.
///
/// Rules check shape, not meaning: they accept anything a well-behaved
/// pod would emit and reject obvious garbage. Nested entity values are
/// outside their scope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rule {
    /// The value must not be empty.
    NotEmpty,
    /// The value must look like a federation handle (`user@pod.tld`).
    Email,
    /// At least 16 characters of hex.
    Guid,
    /// One of the usual boolean spellings.
    Boolean,
    /// Parseable as a number.
    Numeric,
    /// PEM armor of an exported RSA public key.
    RsaKey,
    /// At most `maximum` characters.
    Length { maximum: usize },
    /// At most `maximum` `;`-separated handles.
    HandleCount { maximum: usize },
    /// At most `maximum` `#` tags.
    TagCount { maximum: usize },
    /// Empty, or a `YYYY-MM-DD` date.
    Birthday,
    /// No `;` anywhere; emptiness allowed only when `allow_blank`.
    NoSemicolon { allow_blank: bool },
}

impl Rule {
    /// Stable key identifying the rule in error reports.
    pub fn error_key(&self) -> &'static str {
        match self {
            Rule::NotEmpty => "not_empty",
            Rule::Email => "email",
            Rule::Guid => "guid",
            Rule::Boolean => "boolean",
            Rule::Numeric => "numeric",
            Rule::RsaKey => "rsa_key",
            Rule::Length { .. } => "length",
            Rule::HandleCount { .. } => "handle_count",
            Rule::TagCount { .. } => "tag_count",
            Rule::Birthday => "birthday",
            Rule::NoSemicolon { .. } => "format",
        }
    }

    /// Checks a field's text value against this rule.
    pub fn check(&self, value: &str) -> bool {
        match self {
            Rule::NotEmpty => !value.is_empty(),
            Rule::Email => email_shaped(value),
            Rule::Guid => value.len() >= 16 && value.chars().all(|c| c.is_ascii_hexdigit()),
            Rule::Boolean => matches!(
                value.to_ascii_lowercase().as_str(),
                "true" | "false" | "t" | "f" | "yes" | "no" | "y" | "n" | "1" | "0"
            ),
            Rule::Numeric => value.parse::<f64>().is_ok(),
            Rule::RsaKey => {
                let trimmed = value.trim();
                trimmed.starts_with("-----BEGIN RSA PUBLIC KEY-----")
                    && trimmed.ends_with("-----END RSA PUBLIC KEY-----")
            }
            Rule::Length { maximum } => value.chars().count() <= *maximum,
            Rule::HandleCount { maximum } => value.split(';').count() <= *maximum,
            Rule::TagCount { maximum } => value.matches('#').count() <= *maximum,
            Rule::Birthday => {
                value.is_empty() || NaiveDate::parse_from_str(value, "%Y-%m-%d").is_ok()
            }
            Rule::NoSemicolon { allow_blank } => {
                if value.is_empty() {
                    *allow_blank
                } else {
                    !value.contains(';')
                }
            }
        }
    }
}

fn email_shaped(value: &str) -> bool {
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.is_empty()
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !value.chars().any(char::is_whitespace)
        && !domain.contains('@')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guid_accepts_long_hex() {
        assert!(Rule::Guid.check("abcdef0123456789"));
        assert!(Rule::Guid.check("ABCDEF0123456789AA"));
    }

    #[test]
    fn guid_rejects_short_or_non_hex() {
        assert!(!Rule::Guid.check("abc"));
        assert!(!Rule::Guid.check("ghijklmnopqrstuv"));
        assert!(!Rule::Guid.check(""));
    }

    #[test]
    fn email_accepts_handles() {
        assert!(Rule::Email.check("d_user01@pod.example.tld"));
        assert!(Rule::Email.check("alice@pod.example"));
    }

    #[test]
    fn email_rejects_malformed_handles() {
        for bad in ["", "alice", "@pod.example", "alice@", "alice@pod", "a b@pod.example"] {
            assert!(!Rule::Email.check(bad), "accepted {bad:?}");
        }
    }

    #[test]
    fn boolean_accepts_all_spellings() {
        for ok in ["true", "False", "t", "F", "yes", "NO", "y", "n", "1", "0"] {
            assert!(Rule::Boolean.check(ok), "rejected {ok:?}");
        }
        assert!(!Rule::Boolean.check("maybe"));
        assert!(!Rule::Boolean.check(""));
    }

    #[test]
    fn numeric_accepts_numbers() {
        assert!(Rule::Numeric.check("480"));
        assert!(Rule::Numeric.check("-16.37"));
        assert!(!Rule::Numeric.check("wide"));
    }

    #[test]
    fn rsa_key_checks_the_armor() {
        assert!(Rule::RsaKey.check(
            "-----BEGIN RSA PUBLIC KEY-----\nAAAA\n-----END RSA PUBLIC KEY-----"
        ));
        assert!(Rule::RsaKey.check(
            "  -----BEGIN RSA PUBLIC KEY-----\nAAAA\n-----END RSA PUBLIC KEY-----\n"
        ));
        assert!(!Rule::RsaKey.check("-----BEGIN PUBLIC KEY-----\nAAAA\n-----END PUBLIC KEY-----"));
    }

    #[test]
    fn counting_rules() {
        assert!(Rule::HandleCount { maximum: 2 }.check("a@b.c;d@e.f"));
        assert!(!Rule::HandleCount { maximum: 2 }.check("a@b.c;d@e.f;g@h.i"));
        assert!(Rule::TagCount { maximum: 5 }.check("#one #two"));
        assert!(!Rule::TagCount { maximum: 1 }.check("#one #two"));
        assert!(Rule::Length { maximum: 3 }.check("abc"));
        assert!(!Rule::Length { maximum: 3 }.check("abcd"));
    }

    #[test]
    fn birthday_allows_blank_or_date() {
        assert!(Rule::Birthday.check(""));
        assert!(Rule::Birthday.check("1984-02-29"));
        assert!(!Rule::Birthday.check("1985-02-29"));
        assert!(!Rule::Birthday.check("tomorrow"));
    }

    #[test]
    fn no_semicolon_rule() {
        assert!(Rule::NoSemicolon { allow_blank: true }.check(""));
        assert!(!Rule::NoSemicolon { allow_blank: false }.check(""));
        assert!(Rule::NoSemicolon { allow_blank: true }.check("Alice"));
        assert!(!Rule::NoSemicolon { allow_blank: true }.check("Ali;ce"));
    }
}

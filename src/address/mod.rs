//! Name/email pattern matching for raw `From`/`To` header strings
//!
//! All address grammar lives here. The strict pattern finds
//! `"Display Name" <local@domain>` fragments; the loose pattern is only
//! used to recover a single address from a string with several `@`.

use regex::Regex;
use std::sync::LazyLock;

/// A display name immediately followed by an address, with an optional `<` between them.
///
/// The address follows the RFC 5322 `addr-spec` shape: a dot-atom or
/// quoted-string local part, `@`, then a dot-atom or domain literal.
static NAME_EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"(?P<name>[^<>,]*?)<?",
        r#"(?P<email>(?:[-!#-'*+/-9=?A-Z^-~]+(?:\.[-!#-'*+/-9=?A-Z^-~]+)*|"(?:[\]!#-\[^-~ \t]|\\[\t -~])+")"#,
        r"@",
        r"(?:[-!#-'*+/-9=?A-Z^-~]+(?:\.[-!#-'*+/-9=?A-Z^-~]+)*|\[[\t -Z^-~]*\]))",
    ))
    .expect("Invalid NAME_EMAIL_REGEX pattern")
});

/// Looser address shape for salvaging one address out of a multi-`@` string
static LOOSE_ADDRESS_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[\w.\-]+@[\w.\-]+").expect("Invalid LOOSE_ADDRESS_REGEX pattern")
});

/// Quote characters stripped from both ends of a display name
const NAME_QUOTES: &[char] = &['"', '\''];

/// One `(name, email)` occurrence inside a raw header string
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameEmailMatch {
    /// Display name, trimmed and unquoted. `None` when nothing is left.
    pub name: Option<String>,
    /// Address exactly as matched (trimmed, case preserved)
    pub email: String,
}

impl NameEmailMatch {
    /// Build a match, normalizing the raw name capture
    pub fn new(name: &str, email: &str) -> Self {
        let name = name.trim().trim_matches(NAME_QUOTES).trim();
        Self {
            name: (!name.is_empty()).then(|| name.to_string()),
            email: email.trim().to_string(),
        }
    }
}

/// Find every `(name, email)` pair in a header string, left to right
///
/// Comma separated address lists produce one match per address. A string
/// without any address yields an empty vector.
#[must_use]
pub fn match_field(field: &str) -> Vec<NameEmailMatch> {
    NAME_EMAIL_REGEX
        .captures_iter(field)
        .filter_map(|caps| {
            let email = caps.name("email")?;
            let name = caps.name("name").map_or("", |m| m.as_str());
            Some(NameEmailMatch::new(name, email.as_str()))
        })
        .collect()
}

/// Recover the single well-formed address from a string holding more than one `@`
///
/// Returns `None` when no candidate exists, when there is more than one,
/// or when the only candidate runs straight into another `@` (as in
/// `a@b@c.com`, which could be `a@b` or `b@c.com`).
#[must_use]
pub fn salvage_address(email: &str) -> Option<&str> {
    let mut candidates = LOOSE_ADDRESS_REGEX.find_iter(email);
    let candidate = candidates.next()?;
    if candidates.next().is_some() {
        return None;
    }

    let touches_at =
        email[..candidate.start()].ends_with('@') || email[candidate.end()..].starts_with('@');
    (!touches_at).then(|| candidate.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(field: &str) -> Vec<(Option<String>, String)> {
        match_field(field)
            .into_iter()
            .map(|m| (m.name, m.email))
            .collect()
    }

    fn pair(name: Option<&str>, email: &str) -> (Option<String>, String) {
        (name.map(str::to_string), email.to_string())
    }

    #[test]
    fn test_quoted_display_name() {
        assert_eq!(
            pairs(r#""Jane Doe" <jane@example.com>"#),
            vec![pair(Some("Jane Doe"), "jane@example.com")]
        );
    }

    #[test]
    fn test_bracketed_address_without_name() {
        assert_eq!(
            pairs("<bob@example.com>"),
            vec![pair(None, "bob@example.com")]
        );
    }

    #[test]
    fn test_bare_address() {
        assert_eq!(
            pairs("  bob@example.com "),
            vec![pair(None, "bob@example.com")]
        );
    }

    #[test]
    fn test_no_email() {
        assert!(match_field("no-email-here").is_empty());
        assert!(match_field("").is_empty());
        assert!(match_field("Jane Doe <>").is_empty());
    }

    #[test]
    fn test_address_list() {
        let field = r#""Jane Doe" <jane@example.com>, <john@example.com>, Bob Smith <bob@mail.example.org>, carol@example.net"#;
        assert_eq!(
            pairs(field),
            vec![
                pair(Some("Jane Doe"), "jane@example.com"),
                pair(None, "john@example.com"),
                pair(Some("Bob Smith"), "bob@mail.example.org"),
                pair(None, "carol@example.net"),
            ]
        );
    }

    #[test]
    fn test_comma_in_unquoted_name_keeps_last_part() {
        assert_eq!(
            pairs("Smith, John <john@example.com>"),
            vec![pair(Some("John"), "john@example.com")]
        );
    }

    #[test]
    fn test_single_quotes_and_empty_quotes() {
        assert_eq!(
            pairs("'Ann' <ann@example.com>"),
            vec![pair(Some("Ann"), "ann@example.com")]
        );
        assert_eq!(
            pairs(r#""" <ann@example.com>"#),
            vec![pair(None, "ann@example.com")]
        );
    }

    #[test]
    fn test_case_is_preserved() {
        assert_eq!(
            pairs("Jane <Jane@Example.COM>"),
            vec![pair(Some("Jane"), "Jane@Example.COM")]
        );
    }

    #[test]
    fn test_quoted_local_part_and_domain_literal() {
        assert_eq!(
            pairs(r#"Odd <"john doe"@example.com>"#),
            vec![pair(Some("Odd"), r#""john doe"@example.com"#)]
        );
        assert_eq!(
            pairs("admin@[192.168.0.1]"),
            vec![pair(None, "admin@[192.168.0.1]")]
        );
    }

    #[test]
    fn test_encoded_word_name_is_kept_verbatim() {
        assert_eq!(
            pairs("=?UTF-8?B?SmFuZQ==?= <jane@example.com>"),
            vec![pair(Some("=?UTF-8?B?SmFuZQ==?="), "jane@example.com")]
        );
    }

    #[test]
    fn test_salvage_single_candidate() {
        assert_eq!(salvage_address(r#""jane@work"@example.com"#), Some("jane@work"));
        assert_eq!(salvage_address("x y@z.com"), Some("y@z.com"));
    }

    #[test]
    fn test_salvage_ambiguous() {
        assert_eq!(salvage_address("a@b@c.com"), None);
        assert_eq!(salvage_address(r#""a@b c@d"@e.com"#), None);
        assert_eq!(salvage_address("@@"), None);
    }
}

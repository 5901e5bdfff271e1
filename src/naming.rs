use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{BuildError, SvgsResult};

/// Lowercase letter runs separated by single hyphens.
static KEBAB_CASE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z]+(-[a-z]+)*$").expect("Failed to compile kebab-case pattern"));

/// Whether `name` is strict kebab-case.
///
/// Digits are rejected so that every generated component name is a valid
/// identifier (`123-icon` would otherwise become `123Icon`).
pub fn is_kebab_case(name: &str) -> bool {
    KEBAB_CASE_PATTERN.is_match(name)
}

/// Validate `name`, returning an error that quotes the offending name.
pub fn validate_kebab_case(name: &str) -> SvgsResult<()> {
    if is_kebab_case(name) {
        Ok(())
    } else {
        Err(BuildError::InvalidName {
            name: name.to_string(),
        }
        .into())
    }
}

/// `my-icon` + `Icon` -> `MyIconIcon`
pub fn to_pascal_case(name: &str, suffix: &str) -> String {
    let mut pascal = String::with_capacity(name.len() + suffix.len());

    for segment in name.split('-').filter(|s| !s.is_empty()) {
        let mut chars = segment.chars();
        if let Some(first) = chars.next() {
            pascal.extend(first.to_uppercase());
            pascal.push_str(chars.as_str());
        }
    }

    pascal.push_str(suffix);
    pascal
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_kebab_case() {
        for name in ["icon", "my-icon", "arrow-up-right"] {
            assert!(is_kebab_case(name), "{name} should be accepted");
        }
    }

    #[test]
    fn test_rejects_malformed_names() {
        for name in [
            "Icon",
            "icon_name",
            "icon-",
            "-icon",
            "icon--name",
            "123-icon",
            "icon-2-test",
            "",
        ] {
            assert!(!is_kebab_case(name), "{name} should be rejected");

            let error = validate_kebab_case(name).unwrap_err();
            assert!(error.to_string().contains(&format!("{name:?}")));
        }
    }

    #[test]
    fn test_to_pascal_case() {
        assert_eq!(to_pascal_case("icon", ""), "Icon");
        assert_eq!(to_pascal_case("chevron-down", ""), "ChevronDown");
        assert_eq!(to_pascal_case("chevron-down", "Icon"), "ChevronDownIcon");
    }

    #[test]
    fn test_to_pascal_case_ignores_empty_segments() {
        assert_eq!(to_pascal_case("icon-", ""), "Icon");
        assert_eq!(to_pascal_case("icon--name", ""), "IconName");
    }
}

//! Tolerant `{TOKEN}` substitution engine

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use super::PlaceholderMap;

/// Any brace run without nested braces: `{CODE}`, `{}`, `{ abc d }`
static BRACE_EXPR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{([^{}]*)\}").expect("valid brace pattern"));

/// Well-formed token names only
static TOKEN_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{([A-Z][A-Z0-9_]*)\}").expect("valid token pattern"));

/// Substitute every `{NAME}` whose name is in `placeholders`.
///
/// Brace expressions that do not name a known placeholder are copied to
/// the output verbatim. Inserted values are not scanned again.
pub fn substitute(template: &str, placeholders: &PlaceholderMap) -> String {
    BRACE_EXPR
        .replace_all(template, |caps: &Captures<'_>| {
            let whole = caps.get(0).map_or("", |m| m.as_str());
            let name = caps.get(1).map_or("", |m| m.as_str());
            placeholders.get(name).unwrap_or(whole).to_string()
        })
        .into_owned()
}

/// Render an email body and wrap it with optional greeting and closing.
///
/// Greeting and closing are attached as given, without substitution. An
/// absent part adds nothing, not even a line break.
pub fn format_email(
    template: &str,
    placeholders: &PlaceholderMap,
    greeting: Option<&str>,
    closing: Option<&str>,
) -> String {
    let body = substitute(template, placeholders);

    let mut email = String::with_capacity(
        body.len() + greeting.map_or(0, |g| g.len() + 1) + closing.map_or(0, |c| c.len() + 1),
    );

    if let Some(greeting) = greeting {
        email.push_str(greeting);
        email.push('\n');
    }
    email.push_str(&body);
    if let Some(closing) = closing {
        email.push('\n');
        email.push_str(closing);
    }

    email
}

/// Distinct well-formed token names in order of first appearance
pub fn placeholder_names(template: &str) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for caps in TOKEN_NAME.captures_iter(template) {
        if let Some(name) = caps.get(1) {
            if !names.iter().any(|n| n == name.as_str()) {
                names.push(name.as_str().to_string());
            }
        }
    }
    names
}

#[cfg(test)]
mod tests {
    use super::*;

    const BROKEN_TEMPLATE: &str = "
        Text
        {DOES_NOT_EXIST} {USER_EMAIL}
        code: {CODE} {CODE}
        {}
        { abc d }
        More text.
        ";

    fn placeholders(email: &str, code: &str) -> PlaceholderMap {
        PlaceholderMap::new()
            .with("REDEMPTIONS_REMAINING", 500)
            .with("USER_EMAIL", email)
            .with("CODE", code)
            .with("EXPIRATION_DATE", "2018-12-19")
    }

    fn words(s: &str) -> Vec<&str> {
        s.split_whitespace().collect()
    }

    #[test]
    fn test_substitute_known_tokens() {
        let map = placeholders("johndoe@unknown.com", "GIL7RUEOU7VHBH7Q");
        let result = substitute("login: {USER_EMAIL}, code: {CODE}", &map);
        assert_eq!(result, "login: johndoe@unknown.com, code: GIL7RUEOU7VHBH7Q");
    }

    #[test]
    fn test_substitute_leaves_unknown_and_malformed() {
        let map = placeholders("johndoe@unknown.com", "GIL7RUEOU7VHBH7Q");
        let result = substitute("{DOES_NOT_EXIST} {} { abc d } {code} {CODE", &map);
        assert_eq!(result, "{DOES_NOT_EXIST} {} { abc d } {code} {CODE");
    }

    #[test]
    fn test_substitute_does_not_rescan_values() {
        let map = PlaceholderMap::new()
            .with("CODE", "{USER_EMAIL}")
            .with("USER_EMAIL", "x@example.com");
        assert_eq!(substitute("{CODE}", &map), "{USER_EMAIL}");
    }

    #[test]
    fn test_substitute_exact_name_only() {
        let map = PlaceholderMap::new().with("CODE", "ABC");
        assert_eq!(substitute("{ CODE } {CODE}", &map), "{ CODE } ABC");
    }

    #[test]
    fn test_format_broken_template() {
        let code = "GIL7RUEOU7VHBH7Q";
        let map = placeholders("johndoe@unknown.com", code);

        let email = format_email(BROKEN_TEMPLATE, &map, Some("hi {CODE} "), Some(" bye {CODE}"));

        assert!(email.contains("{DOES_NOT_EXIST}"));
        assert!(email.contains(code));

        let expected = "
            hi {CODE} Text
            {DOES_NOT_EXIST} johndoe@unknown.com
            code: GIL7RUEOU7VHBH7Q GIL7RUEOU7VHBH7Q
            {}
            { abc d }
            More text. bye {CODE}
            ";
        assert_eq!(words(&email), words(expected));
    }

    #[test]
    fn test_format_without_greeting_or_closing() {
        let code = "ABC7RUEOU7VHBH7Q";
        let map = placeholders("johndoe2@unknown.com", code);

        let email = format_email(BROKEN_TEMPLATE, &map, None, None);

        let expected = "
            Text
            {DOES_NOT_EXIST} johndoe2@unknown.com
            code: ABC7RUEOU7VHBH7Q ABC7RUEOU7VHBH7Q
            {}
            { abc d }
            More text.
            ";
        assert_eq!(words(&email), words(expected));
        assert_eq!(email, substitute(BROKEN_TEMPLATE, &map));
    }

    #[test]
    fn test_format_line_breaks() {
        let map = PlaceholderMap::new().with("CODE", "X1");
        assert_eq!(
            format_email("code {CODE}", &map, Some("hi"), Some("bye")),
            "hi\ncode X1\nbye"
        );
        assert_eq!(format_email("code {CODE}", &map, Some("hi"), None), "hi\ncode X1");
        assert_eq!(format_email("code {CODE}", &map, None, Some("bye")), "code X1\nbye");
    }

    #[test]
    fn test_placeholder_names() {
        let names = placeholder_names(BROKEN_TEMPLATE);
        assert_eq!(names, vec!["DOES_NOT_EXIST", "USER_EMAIL", "CODE"]);
    }
}

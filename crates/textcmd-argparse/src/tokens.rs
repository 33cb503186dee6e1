//! Prefix matching and token splitting.

/// Compare two names, optionally ignoring ASCII case.
pub fn names_match(a: &str, b: &str, case_sensitive: bool) -> bool {
    if case_sensitive {
        a == b
    } else {
        a.eq_ignore_ascii_case(b)
    }
}

/// Strip `prefix` (and the separator after it) from `line`.
///
/// Returns the remainder of the line, or `None` when the line does not open
/// with the prefix. A line consisting of the prefix alone yields `""`.
/// An empty `separator` means the command may follow the prefix directly.
pub fn strip_prefix<'a>(
    line: &'a str,
    prefix: &str,
    separator: &str,
    case_sensitive: bool,
) -> Option<&'a str> {
    let head = line.get(..prefix.len())?;
    if !names_match(head, prefix, case_sensitive) {
        return None;
    }

    let rest = &line[prefix.len()..];
    if rest.trim().is_empty() {
        return Some("");
    }
    if separator.is_empty() {
        return Some(rest);
    }
    rest.strip_prefix(separator)
}

/// Split a command line into tokens.
///
/// Tokens are separated by whitespace. A quote (`'` or `"`) opening a token,
/// or opening the value of a `-flag=` token, groups everything up to the next
/// matching quote into that token; the quotes themselves are dropped and any
/// text right after the closing quote stays in the same token. There is no
/// escaping inside quotes, and an unterminated quote runs to end of line.
pub fn split(rest: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut started = false;
    let mut quote: Option<char> = None;

    for c in rest.chars() {
        if let Some(q) = quote {
            if c == q {
                quote = None;
            } else {
                current.push(c);
            }
            continue;
        }

        if c.is_whitespace() {
            if started {
                tokens.push(std::mem::take(&mut current));
                started = false;
            }
            continue;
        }

        if (c == '"' || c == '\'') && opens_quote(&current) {
            quote = Some(c);
            started = true;
            continue;
        }

        current.push(c);
        started = true;
    }

    if started {
        tokens.push(current);
    }
    tokens
}

fn opens_quote(current: &str) -> bool {
    current.is_empty() || (current.starts_with('-') && current.ends_with('='))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strip_prefix_requires_separator() {
        assert_eq!(strip_prefix("/app foo", "/app", " ", true), Some("foo"));
        assert_eq!(strip_prefix("/app", "/app", " ", true), Some(""));
        assert_eq!(strip_prefix("/app   ", "/app", " ", true), Some(""));
        assert_eq!(strip_prefix("/appfoo", "/app", " ", true), None);
        assert_eq!(strip_prefix("not a cli sentence", "/app", " ", true), None);
        assert_eq!(strip_prefix("", "/app", " ", true), None);
    }

    #[test]
    fn strip_prefix_with_empty_separator() {
        assert_eq!(strip_prefix("/foo", "/", "", true), Some("foo"));
        assert_eq!(strip_prefix("/", "/", "", true), Some(""));
    }

    #[test]
    fn strip_prefix_honors_case_policy() {
        assert_eq!(strip_prefix("TESTAPP", "tEsTaPp", " ", false), Some(""));
        assert_eq!(strip_prefix("TESTAPP foo", "tEsTaPp", " ", false), Some("foo"));
        assert_eq!(strip_prefix("TESTAPP foo", "tEsTaPp", " ", true), None);
    }

    #[test]
    fn strip_prefix_does_not_split_multibyte_chars() {
        assert_eq!(strip_prefix("é", "ab", " ", true), None);
    }

    #[test]
    fn split_on_whitespace() {
        assert_eq!(split("foo  bar\tbaz "), vec!["foo", "bar", "baz"]);
        assert!(split("   ").is_empty());
    }

    #[test]
    fn split_groups_quoted_tokens() {
        assert_eq!(
            split(r#"say "hello world" 'single quoted' tail"#),
            vec!["say", "hello world", "single quoted", "tail"]
        );
        assert_eq!(split(r#""""#), vec![""]);
    }

    #[test]
    fn split_groups_quoted_flag_values() {
        assert_eq!(
            split("foo --name='a b' -t=\"c\""),
            vec!["foo", "--name=a b", "-t=c"]
        );
    }

    #[test]
    fn split_keeps_apostrophes_inside_words() {
        assert_eq!(split("say don't stop"), vec!["say", "don't", "stop"]);
    }

    #[test]
    fn split_closes_at_the_matching_quote() {
        assert_eq!(split(r#"say "hi"there tail"#), vec!["say", "hithere", "tail"]);
        assert_eq!(split("say 'a b'c 'd'"), vec!["say", "a bc", "d"]);
    }

    #[test]
    fn names_match_ignores_ascii_case_only() {
        assert!(names_match("Foo", "fOO", false));
        assert!(!names_match("Foo", "fOO", true));
        assert!(!names_match("É", "é", false));
    }

    #[test]
    fn split_unterminated_quote_runs_to_end() {
        assert_eq!(split("say 'open ended"), vec!["say", "open ended"]);
    }
}

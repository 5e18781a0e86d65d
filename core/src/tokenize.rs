//! Shell-style splitting of one physical line into words.

use crate::error::TokenizeError;

const BACKSLASH: char = '\\';
const SINGLE_QUOTE: char = '\'';
const DOUBLE_QUOTE: char = '"';
const COMMENT: char = '#';

/// Splits `line` into words, honoring single quotes, double quotes, and
/// backslash escapes.
///
/// A `#` at the start of a word comments out the rest of the line. A backslash
/// that ends the line is kept as a literal `\`, which is how a continuation
/// marker reaches the classifier.
///
/// # Errors
///
/// Returns [`TokenizeError::UnterminatedQuote`] if a quoted span is not closed
/// before the end of the line.
///
/// # Examples
///
/// ```
/// use bazelrc_core::tokenize_line;
///
/// let words = tokenize_line(r#"test --test_env=FLAKY="maybe, maybe not" \"#).unwrap();
/// assert_eq!(words, vec!["test", "--test_env=FLAKY=maybe, maybe not", "\\"]);
/// ```
pub fn tokenize_line(line: &str) -> Result<Vec<String>, TokenizeError> {
    let mut words = Vec::new();
    let mut current = String::new();
    // A word has started even if it is still empty (e.g. after `""`).
    let mut in_word = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            c if c.is_whitespace() => {
                if in_word {
                    words.push(std::mem::take(&mut current));
                    in_word = false;
                }
            }
            COMMENT if !in_word => break,
            BACKSLASH => {
                in_word = true;
                match chars.next() {
                    Some(escaped) => current.push(escaped),
                    None => current.push(BACKSLASH),
                }
            }
            SINGLE_QUOTE => {
                in_word = true;
                loop {
                    match chars.next() {
                        Some(SINGLE_QUOTE) => break,
                        Some(ch) => current.push(ch),
                        None => return Err(TokenizeError::UnterminatedQuote { quote: SINGLE_QUOTE }),
                    }
                }
            }
            DOUBLE_QUOTE => {
                in_word = true;
                loop {
                    match chars.next() {
                        Some(DOUBLE_QUOTE) => break,
                        Some(BACKSLASH) => match chars.next() {
                            Some(escaped) => current.push(escaped),
                            None => return Err(TokenizeError::UnterminatedQuote { quote: DOUBLE_QUOTE }),
                        },
                        Some(ch) => current.push(ch),
                        None => return Err(TokenizeError::UnterminatedQuote { quote: DOUBLE_QUOTE }),
                    }
                }
            }
            _ => {
                in_word = true;
                current.push(c);
            }
        }
    }

    if in_word {
        words.push(current);
    }
    Ok(words)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_words() {
        assert_eq!(
            tokenize_line("build --foo=bar  --baz").unwrap(),
            vec!["build", "--foo=bar", "--baz"]
        );
    }

    #[test]
    fn test_blank_line_has_no_words() {
        assert!(tokenize_line("").unwrap().is_empty());
        assert!(tokenize_line(" \t ").unwrap().is_empty());
    }

    #[test]
    fn test_quoted_spans_join_adjacent_text() {
        assert_eq!(
            tokenize_line("test --test_env=FLAKY='maybe, maybe not'").unwrap(),
            vec!["test", "--test_env=FLAKY=maybe, maybe not"]
        );
        assert_eq!(
            tokenize_line(r#"build --copt "--foo --bar""#).unwrap(),
            vec!["build", "--copt", "--foo --bar"]
        );
    }

    #[test]
    fn test_empty_quotes_yield_empty_word() {
        assert_eq!(tokenize_line(r#"build """#).unwrap(), vec!["build", ""]);
        assert_eq!(tokenize_line(r#"" ""#).unwrap(), vec![" "]);
    }

    #[test]
    fn test_single_quotes_are_literal() {
        assert_eq!(tokenize_line(r#"'a\b "c"'"#).unwrap(), vec![r#"a\b "c""#]);
    }

    #[test]
    fn test_backslash_escapes() {
        assert_eq!(tokenize_line(r"a\ b").unwrap(), vec!["a b"]);
        assert_eq!(tokenize_line(r#""a\"b""#).unwrap(), vec![r#"a"b"#]);
    }

    #[test]
    fn test_trailing_backslash_is_a_word() {
        assert_eq!(tokenize_line(r"build --foo \").unwrap(), vec!["build", "--foo", "\\"]);
        assert_eq!(tokenize_line(r"build --foo \\").unwrap(), vec!["build", "--foo", "\\"]);
    }

    #[test]
    fn test_comment_at_word_start() {
        assert_eq!(tokenize_line("build --foo # trailing").unwrap(), vec!["build", "--foo"]);
        assert_eq!(tokenize_line("build --foo=a#b").unwrap(), vec!["build", "--foo=a#b"]);
        assert!(tokenize_line("   # indented comment").unwrap().is_empty());
    }

    #[test]
    fn test_unterminated_quotes() {
        assert_eq!(
            tokenize_line(r#"build --foo="bar"#),
            Err(TokenizeError::UnterminatedQuote { quote: '"' })
        );
        assert_eq!(
            tokenize_line("build --foo='bar"),
            Err(TokenizeError::UnterminatedQuote { quote: '\'' })
        );
        assert_eq!(
            tokenize_line(r#"build --foo="bar"#).unwrap_err().to_string(),
            "EOF found when expecting closing quote"
        );
    }
}

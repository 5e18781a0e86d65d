//! Token-by-token classification of flag lines.
//!
//! A flag line (everything after the sub-command name) is a sequence of
//! tokens that are flags, flag values, or targets. Whether a token is a value
//! depends on the token before it, so the classifier threads a small
//! [`LineState`] through every call.

use crate::contents::FlagValues;
use crate::error::ClassifyError;
use crate::schema::FlagSchema;

const CONTINUATION: &str = "\\";
const SEPARATOR: &str = "--";
const NEGATION_PREFIX: &str = "--no";

/// What the caller should do after a token has been classified.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TokenOutcome {
    /// The token was fully handled; move on to the next one.
    Consumed,
    /// The token was a trailing `\`; the line continues on the next physical line.
    ContinueOnNextLine,
    /// The token was `--`; every remaining token on the line is a target.
    RestAreTargets,
}

/// State carried between tokens. A pending flag outlives the line it was
/// given on; targets are per line.
#[derive(Debug, Default)]
pub(crate) struct LineState {
    /// A flag, with its leading dashes, waiting for the next token as its value.
    pub pending: Option<String>,
    /// Tokens that were not flags or flag values.
    pub targets: Vec<String>,
}

/// Classifies tokens against a [`FlagSchema`].
#[derive(Debug, Clone, Copy)]
pub(crate) struct Classifier<'a> {
    schema: &'a FlagSchema,
}

impl<'a> Classifier<'a> {
    pub fn new(schema: &'a FlagSchema) -> Self {
        Self { schema }
    }

    /// Classifies one token, recording flags into `values` and targets into
    /// `state.targets`.
    pub fn classify(
        &self,
        token: &str,
        is_last_token_in_line: bool,
        values: &mut FlagValues,
        state: &mut LineState,
    ) -> Result<TokenOutcome, ClassifyError> {
        if is_last_token_in_line && token == CONTINUATION {
            return Ok(TokenOutcome::ContinueOnNextLine);
        }

        if let Some(pending) = state.pending.take() {
            let pending_name = strip_leading_dashes(&pending);
            if self.schema.is_known_boolean(pending_name) && token != "true" && token != "false" {
                // The pending flag was a bare boolean; this token still needs classifying.
                self.resolve_boolean(&pending, values)?;
            } else {
                values.push(pending_name, token);
                return Ok(TokenOutcome::Consumed);
            }
        }

        if !token.starts_with('-') {
            state.targets.push(token.to_string());
            return Ok(TokenOutcome::Consumed);
        }

        if token == SEPARATOR {
            state.targets.push(token.to_string());
            return Ok(TokenOutcome::RestAreTargets);
        }

        if !token.starts_with(SEPARATOR) {
            match self.parse_abbreviated(token)? {
                Abbreviated::Value { flag, value } => values.push(flag, value),
                Abbreviated::ExpectingValue(flag) => state.pending = Some(flag),
            }
            return Ok(TokenOutcome::Consumed);
        }

        if let Some((flag, value)) = token.split_once('=') {
            values.push(strip_leading_dashes(flag), value);
        } else if is_last_token_in_line {
            self.resolve_boolean(token, values)?;
        } else {
            state.pending = Some(token.to_string());
        }
        Ok(TokenOutcome::Consumed)
    }

    /// Records a flag given without a value, negated if it starts with `--no`.
    pub fn resolve_boolean(&self, flag: &str, values: &mut FlagValues) -> Result<(), ClassifyError> {
        let (name, assumed_value) = match flag.strip_prefix(NEGATION_PREFIX) {
            Some(name) => (name, "false"),
            None => (strip_leading_dashes(flag), "true"),
        };
        if !self.schema.is_boolean(name) {
            return Err(ClassifyError::MissingBooleanRegistration(name.to_string()));
        }
        values.push(name, assumed_value);
        Ok(())
    }

    /// Handles single-dash tokens. The only accepted forms are `-b` and `-b-`
    /// for boolean flags and a bare `-j` (value in the next token) otherwise.
    fn parse_abbreviated(&self, token: &str) -> Result<Abbreviated, ClassifyError> {
        let mut chars = token.chars();
        chars.next();
        let Some(abbreviation) = chars.next() else {
            return Err(ClassifyError::InvalidFlag(token.to_string()));
        };
        let full_name = self
            .schema
            .expand_abbreviation(abbreviation)
            .ok_or(ClassifyError::UnknownAbbreviation(abbreviation))?;
        let rest = chars.as_str();

        if self.schema.is_boolean(full_name) {
            let value = match rest {
                "" => "true",
                "-" => "false",
                _ => return Err(ClassifyError::MalformedAbbreviatedBoolean(token.to_string())),
            };
            Ok(Abbreviated::Value {
                flag: full_name.to_string(),
                value,
            })
        } else if rest.is_empty() {
            Ok(Abbreviated::ExpectingValue(format!("--{full_name}")))
        } else {
            Err(ClassifyError::MalformedAbbreviatedFlag(token.to_string()))
        }
    }
}

enum Abbreviated {
    Value { flag: String, value: &'static str },
    ExpectingValue(String),
}

pub(crate) fn strip_leading_dashes(flag: &str) -> &str {
    flag.strip_prefix("--")
        .or_else(|| flag.strip_prefix('-'))
        .unwrap_or(flag)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schema() -> FlagSchema {
        FlagSchema::new()
            .with_boolean_flag("bool_flag")
            .with_boolean_flag("other_bool_flag")
            .with_value_flag("jobs")
            .with_abbreviation('b', "bool_flag")
            .with_abbreviation('j', "jobs")
            .with_abbreviation('o', "other_bool_flag")
    }

    fn classify_all(tokens: &[&str]) -> Result<(FlagValues, LineState, Vec<TokenOutcome>), ClassifyError> {
        let schema = schema();
        let classifier = Classifier::new(&schema);
        let mut values = FlagValues::new();
        let mut state = LineState::default();
        let mut outcomes = Vec::new();
        for (i, token) in tokens.iter().enumerate() {
            outcomes.push(classifier.classify(token, i + 1 == tokens.len(), &mut values, &mut state)?);
        }
        Ok((values, state, outcomes))
    }

    #[test]
    fn test_equals_value() {
        let (values, _, _) = classify_all(&["--foo=bar=true"]).unwrap();
        assert_eq!(values.values("foo").unwrap(), ["bar=true"]);
    }

    #[test]
    fn test_space_separated_value() {
        let (values, state, _) = classify_all(&["--foo", "strict=false", "--bar=true"]).unwrap();
        assert_eq!(values.values("foo").unwrap(), ["strict=false"]);
        assert_eq!(values.values("bar").unwrap(), ["true"]);
        assert!(state.pending.is_none());
    }

    #[test]
    fn test_value_may_look_like_a_flag() {
        let (values, _, _) = classify_all(&["--copt", "-fsanitize=address"]).unwrap();
        assert_eq!(values.values("copt").unwrap(), ["-fsanitize=address"]);
        let (values, _, _) = classify_all(&["--copt", "-b"]).unwrap();
        assert_eq!(values.values("copt").unwrap(), ["-b"]);
    }

    #[test]
    fn test_pending_boolean_reclassifies_next_token() {
        let (values, _, _) = classify_all(&["--bool_flag", "-o"]).unwrap();
        assert_eq!(values.values("bool_flag").unwrap(), ["true"]);
        assert_eq!(values.values("other_bool_flag").unwrap(), ["true"]);
    }

    #[test]
    fn test_pending_boolean_takes_explicit_value() {
        let (values, _, _) = classify_all(&["--bool_flag", "false", "--bool_flag", "true"]).unwrap();
        assert_eq!(values.values("bool_flag").unwrap(), ["false", "true"]);
    }

    #[test]
    fn test_pending_negated_boolean() {
        let (values, state, _) = classify_all(&["--nobool_flag", "//target"]).unwrap();
        assert_eq!(values.values("bool_flag").unwrap(), ["false"]);
        assert_eq!(state.targets, vec!["//target"]);
    }

    #[test]
    fn test_last_token_boolean() {
        let (values, _, _) = classify_all(&["--bool_flag"]).unwrap();
        assert_eq!(values.values("bool_flag").unwrap(), ["true"]);
        let (values, _, _) = classify_all(&["--nobool_flag"]).unwrap();
        assert_eq!(values.values("bool_flag").unwrap(), ["false"]);
    }

    #[test]
    fn test_last_token_value_flag_fails() {
        let err = classify_all(&["--jobs"]).unwrap_err();
        assert_eq!(err, ClassifyError::MissingBooleanRegistration("jobs".to_string()));
        assert_eq!(err.to_string(), "value-requiring flag jobs didn't have value");
    }

    #[test]
    fn test_no_prefixed_name_is_always_treated_as_negation() {
        let schema = schema().with_boolean_flag("notify");
        let classifier = Classifier::new(&schema);
        let mut values = FlagValues::new();
        let err = classifier.resolve_boolean("--notify", &mut values).unwrap_err();
        assert_eq!(err, ClassifyError::MissingBooleanRegistration("tify".to_string()));
    }

    #[test]
    fn test_abbreviations() {
        let (values, state, _) = classify_all(&["-b", "-b-", "-j", "200", "-o"]).unwrap();
        assert_eq!(values.values("bool_flag").unwrap(), ["true", "false"]);
        assert_eq!(values.values("jobs").unwrap(), ["200"]);
        assert_eq!(values.values("other_bool_flag").unwrap(), ["true"]);
        assert!(state.pending.is_none());
    }

    #[test]
    fn test_trailing_value_abbreviation_stays_pending() {
        let (values, state, _) = classify_all(&["-j"]).unwrap();
        assert!(values.is_empty());
        assert_eq!(state.pending.as_deref(), Some("--jobs"));
    }

    #[test]
    fn test_abbreviation_errors() {
        assert_eq!(
            classify_all(&["-z"]).unwrap_err().to_string(),
            "flag z wasn't a known abbreviation"
        );
        assert_eq!(
            classify_all(&["-zqe"]).unwrap_err(),
            ClassifyError::UnknownAbbreviation('z')
        );
        assert_eq!(
            classify_all(&["-bo"]).unwrap_err().to_string(),
            "token \"-bo\" wasn't a valid abbreviated flag"
        );
        assert_eq!(
            classify_all(&["-j=200"]).unwrap_err().to_string(),
            "flag \"-j=200\" wasn't a valid abbreviated flag"
        );
        assert_eq!(
            classify_all(&["-j200"]).unwrap_err(),
            ClassifyError::MalformedAbbreviatedFlag("-j200".to_string())
        );
        assert_eq!(classify_all(&["-"]).unwrap_err(), ClassifyError::InvalidFlag("-".to_string()));
    }

    #[test]
    fn test_separator_and_continuation_signals() {
        let (_, state, outcomes) = classify_all(&["//a", "--", "rest"]).unwrap();
        assert_eq!(state.targets, vec!["//a", "--", "rest"]);
        assert_eq!(outcomes[1], TokenOutcome::RestAreTargets);

        let (_, _, outcomes) = classify_all(&["--bool_flag", "\\"]).unwrap();
        assert_eq!(outcomes[1], TokenOutcome::ContinueOnNextLine);
    }

    #[test]
    fn test_backslash_not_last_is_a_target() {
        let (_, state, outcomes) = classify_all(&["\\", "//a"]).unwrap();
        assert_eq!(outcomes, vec![TokenOutcome::Consumed, TokenOutcome::Consumed]);
        assert_eq!(state.targets, vec!["\\", "//a"]);
    }

    #[test]
    fn test_strip_leading_dashes() {
        assert_eq!(strip_leading_dashes("--foo"), "foo");
        assert_eq!(strip_leading_dashes("-f"), "f");
        assert_eq!(strip_leading_dashes("foo"), "foo");
        assert_eq!(strip_leading_dashes("---foo"), "-foo");
    }
}

//! Accumulated results of parsing rc files and command lines.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

/// Flag names (without leading dashes) mapped to the values they were given,
/// in the order they were encountered.
///
/// A flag that is present always has at least one value.
///
/// # Examples
///
/// ```
/// use bazelrc_core::FlagValues;
///
/// let mut values = FlagValues::new();
/// values.push("jobs", "100");
/// values.push("jobs", "200");
///
/// assert_eq!(values.flag_value("jobs"), Some("200"));
/// assert_eq!(values.values("jobs").unwrap(), ["100", "200"]);
/// assert_eq!(values.flag_value("missing"), None);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FlagValues(BTreeMap<String, Vec<String>>);

impl FlagValues {
    /// Creates an empty set of flag values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `value` to the values recorded for `flag`.
    pub fn push(&mut self, flag: impl Into<String>, value: impl Into<String>) {
        self.0.entry(flag.into()).or_default().push(value.into());
    }

    /// Returns the effective (last) value of `flag`.
    ///
    /// This knows nothing about which flags accumulate multiple values or
    /// what their defaults are.
    pub fn flag_value(&self, flag: &str) -> Option<&str> {
        self.0
            .get(flag)
            .and_then(|values| values.last())
            .map(String::as_str)
    }

    /// Returns every value recorded for `flag`, oldest first.
    pub fn values(&self, flag: &str) -> Option<&[String]> {
        self.0.get(flag).map(Vec::as_slice)
    }

    /// Returns `true` if `flag` has been given at least once.
    pub fn contains(&self, flag: &str) -> bool {
        self.0.contains_key(flag)
    }

    /// Iterates over flags in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.0
            .iter()
            .map(|(flag, values)| (flag.as_str(), values.as_slice()))
    }

    /// Returns the number of distinct flags.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<F, V> FromIterator<(F, Vec<V>)> for FlagValues
where
    F: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (F, Vec<V>)>>(iter: I) -> Self {
        let mut out = Self::new();
        for (flag, values) in iter {
            let flag = flag.into();
            for value in values {
                out.push(flag.clone(), value);
            }
        }
        out
    }
}

/// Flags deserialized with an empty value list are dropped.
impl<'de> Deserialize<'de> for FlagValues {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = BTreeMap::<String, Vec<String>>::deserialize(deserializer)?;
        Ok(raw.into_iter().collect())
    }
}

/// The output of parsing an rc file and everything it imports.
///
/// Maps sub-command names (e.g. `build`, or `build:asan` for a named config)
/// to the flags given for them.
///
/// # Examples
///
/// ```
/// use bazelrc_core::{FlagSchema, RcParser};
///
/// let schema = FlagSchema::new();
/// let parser = RcParser::new("/workspace", &schema);
/// let contents = parser
///     .parse("build --jobs=8\nbuild --jobs=16\n".as_bytes(), "/workspace/.bazelrc")
///     .unwrap();
///
/// assert_eq!(contents.flag_value("build", "jobs"), Some("16"));
/// assert_eq!(contents.flag_value("test", "jobs"), None);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RcContents {
    entries: BTreeMap<String, FlagValues>,
}

impl RcContents {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the flags recorded for `command`.
    pub fn command(&self, command: &str) -> Option<&FlagValues> {
        self.entries.get(command)
    }

    /// Returns the effective (last) value of `flag` for `command`.
    pub fn flag_value(&self, command: &str, flag: &str) -> Option<&str> {
        self.command(command)?.flag_value(flag)
    }

    /// Iterates over sub-command names in order.
    pub fn commands(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Iterates over sub-commands and their flags.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FlagValues)> {
        self.entries
            .iter()
            .map(|(command, values)| (command.as_str(), values))
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the flags for `command`, creating an empty entry on first use.
    pub(crate) fn command_mut(&mut self, command: &str) -> &mut FlagValues {
        self.entries.entry(command.to_string()).or_default()
    }
}

impl<C: Into<String>> FromIterator<(C, FlagValues)> for RcContents {
    fn from_iter<I: IntoIterator<Item = (C, FlagValues)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(command, values)| (command.into(), values))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_preserves_order() {
        let mut values = FlagValues::new();
        values.push("a", "1");
        values.push("b", "x");
        values.push("a", "2");
        assert_eq!(values.values("a").unwrap(), ["1", "2"]);
        assert_eq!(values.flag_value("a"), Some("2"));
        assert_eq!(values.len(), 2);
        assert!(values.contains("b"));
    }

    #[test]
    fn test_from_iter_skips_empty_value_lists() {
        let values: FlagValues = [("a", vec!["1"]), ("b", Vec::<&str>::new())]
            .into_iter()
            .collect();
        assert!(values.contains("a"));
        assert!(!values.contains("b"));
    }

    #[test]
    fn test_deserialize_drops_empty_value_lists() {
        let values: FlagValues =
            serde_json::from_str(r#"{ "a": [], "b": ["1", "2"] }"#).unwrap();
        assert!(!values.contains("a"));
        assert_eq!(values.values("b").unwrap(), ["1", "2"]);
        assert_eq!(values.len(), 1);

        let contents: RcContents =
            serde_json::from_str(r#"{ "build": { "jobs": [], "copt": ["-g"] } }"#).unwrap();
        assert_eq!(contents.flag_value("build", "copt"), Some("-g"));
        assert!(!contents.command("build").unwrap().contains("jobs"));
    }

    #[test]
    fn test_command_mut_reuses_entry() {
        let mut contents = RcContents::new();
        contents.command_mut("build").push("foo", "1");
        contents.command_mut("build").push("foo", "2");
        assert_eq!(contents.commands().collect::<Vec<_>>(), vec!["build"]);
        assert_eq!(contents.flag_value("build", "foo"), Some("2"));
        assert_eq!(contents.flag_value("build", "bar"), None);
    }

    #[test]
    fn test_serializes_as_nested_maps() {
        let contents: RcContents = [(
            "build",
            [("jobs", vec!["8", "16"])].into_iter().collect::<FlagValues>(),
        )]
        .into_iter()
        .collect();
        let json = serde_json::to_value(&contents).unwrap();
        assert_eq!(json, serde_json::json!({ "build": { "jobs": ["8", "16"] } }));

        let back: RcContents = serde_json::from_value(json).unwrap();
        assert_eq!(back, contents);
    }
}

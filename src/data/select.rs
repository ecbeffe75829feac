use std::fmt;

use serde_json::Value as JsonValue;

use super::tree::{NodeRef, ResultTree};
use crate::error::{Error, Result};

// ---------------------------------------------------------------------------
// DataChoice – which sibling to pick
// ---------------------------------------------------------------------------

/// Which time-step directory to plot.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DataChoice {
    /// The sibling key with the largest numeric value.
    #[default]
    Last,
    /// Exactly this key.
    Key(String),
}

impl DataChoice {
    /// Interpret a command-line value: `last` or a literal key.
    pub fn parse(value: &str) -> Self {
        match value {
            "last" => DataChoice::Last,
            other => DataChoice::Key(other.to_string()),
        }
    }

    /// Interpret a configuration value: `"last"`, any other string, or an
    /// integer (used as its decimal string). Anything else is rejected.
    pub fn from_json(value: &JsonValue) -> Result<Self> {
        match value {
            JsonValue::String(s) => Ok(DataChoice::parse(s)),
            JsonValue::Number(n) if n.is_i64() || n.is_u64() => Ok(DataChoice::Key(n.to_string())),
            other => Err(Error::Configuration(format!(
                "data choice must be \"last\", a key or an integer, got {other}"
            ))),
        }
    }

    /// Pick one child of `parent` according to this choice.
    pub fn pick<'t>(&self, parent: NodeRef<'t>) -> Result<NodeRef<'t>> {
        match self {
            DataChoice::Key(key) => parent.child(key),
            DataChoice::Last => {
                let key = last_numeric_key(parent.keys())?;
                parent.child(key)
            }
        }
    }
}

impl fmt::Display for DataChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataChoice::Last => write!(f, "last"),
            DataChoice::Key(key) => write!(f, "{key}"),
        }
    }
}

/// The key with the largest numeric value (`"20"` beats `"5"`).
///
/// Fails when there are no keys or any key is not a finite number, so
/// directories named `inf` or `nan` are rejected.
pub fn last_numeric_key<'a>(keys: impl IntoIterator<Item = &'a str>) -> Result<&'a str> {
    let mut best: Option<(f64, &'a str)> = None;
    for key in keys {
        let value = key
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| {
                Error::Configuration(format!("cannot pick the last of non-numeric key '{key}'"))
            })?;
        if best.map_or(true, |(max, _)| value > max) {
            best = Some((value, key));
        }
    }
    best.map(|(_, key)| key)
        .ok_or_else(|| Error::Configuration("no keys to pick the last one from".to_string()))
}

// ---------------------------------------------------------------------------
// SubtreeSelector – which part of the tree a render call plots
// ---------------------------------------------------------------------------

/// Chooses the branch whose leaf tables are plotted together.
pub trait SubtreeSelector {
    fn select<'t>(&self, tree: &'t ResultTree) -> Result<NodeRef<'t>>;
}

/// Follow a fixed prefix (`["sample"]` for OpenFOAM `sample` function
/// objects) and then pick one time-step directory below it.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleSelector {
    pub prefix: Vec<String>,
    pub choice: DataChoice,
}

impl SampleSelector {
    pub fn new(prefix: Vec<String>, choice: DataChoice) -> Self {
        SampleSelector { prefix, choice }
    }
}

impl Default for SampleSelector {
    fn default() -> Self {
        SampleSelector::new(vec!["sample".to_string()], DataChoice::Last)
    }
}

impl SubtreeSelector for SampleSelector {
    fn select<'t>(&self, tree: &'t ResultTree) -> Result<NodeRef<'t>> {
        let parent = tree.node(self.prefix.as_slice())?;
        self.choice.pick(parent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{Column, Table};
    use crate::style::Style;
    use rstest::rstest;
    use std::path::Path;

    fn tree_with_times(times: &[&str]) -> ResultTree {
        let mut tree = ResultTree::new(Path::new("postProcessing"), "Case");
        for (i, time) in times.iter().enumerate() {
            let table = Table::new(
                "bottom",
                vec![Column::new("x", vec![i as f64])],
                Style::default(),
            )
            .unwrap();
            let path = ["sample", *time, "bottom"].map(str::to_string);
            tree.insert(&path, table);
        }
        tree
    }

    #[rstest]
    #[case::numeric_not_lexicographic(&["10", "20", "5"], "20")]
    #[case::fractional_times(&["0.5", "0.25", "1"], "1")]
    #[case::single(&["7"], "7")]
    fn last_picks_numeric_maximum(#[case] keys: &[&str], #[case] expected: &str) {
        assert_eq!(last_numeric_key(keys.iter().copied()).unwrap(), expected);
    }

    #[rstest]
    #[case::word(&["10", "latest"])]
    #[case::infinity(&["10", "20", "inf"])]
    #[case::spelled_infinity(&["infinity", "5"])]
    #[case::not_a_number(&["nan", "10"])]
    #[case::lone_nan(&["nan"])]
    fn last_rejects_non_numeric_keys(#[case] keys: &[&str]) {
        let err = last_numeric_key(keys.iter().copied()).unwrap_err();
        assert!(matches!(err, Error::Configuration(_)));
    }

    #[test]
    fn last_rejects_empty_key_set() {
        assert!(matches!(
            last_numeric_key(std::iter::empty()),
            Err(Error::Configuration(_))
        ));
    }

    #[test]
    fn sample_selector_picks_latest_time() {
        let tree = tree_with_times(&["10", "20", "5"]);
        let node = SampleSelector::default().select(&tree).unwrap();
        assert_eq!(node.keys().collect::<Vec<_>>(), ["bottom"]);
        let bottom = node.child("bottom").unwrap().table().unwrap();
        assert_eq!(bottom.column("x").unwrap(), &[1.0]);
    }

    #[test]
    fn sample_selector_uses_explicit_key() {
        let tree = tree_with_times(&["10", "20"]);
        let selector = SampleSelector::new(vec!["sample".to_string()], DataChoice::parse("10"));
        let node = selector.select(&tree).unwrap();
        let bottom = node.child("bottom").unwrap().table().unwrap();
        assert_eq!(bottom.column("x").unwrap(), &[0.0]);
    }

    #[test]
    fn sample_selector_missing_key_is_key_not_found() {
        let tree = tree_with_times(&["10"]);
        let selector = SampleSelector::new(vec!["sample".to_string()], DataChoice::parse("30"));
        assert!(matches!(
            selector.select(&tree),
            Err(Error::KeyNotFound { .. })
        ));
    }

    #[test]
    fn sample_selector_missing_prefix_is_key_not_found() {
        let tree = tree_with_times(&["10"]);
        let selector = SampleSelector::new(vec!["surfaces".to_string()], DataChoice::Last);
        assert!(matches!(
            selector.select(&tree),
            Err(Error::KeyNotFound { .. })
        ));
    }

    #[test]
    fn custom_selector_can_be_injected() {
        struct Fixed;
        impl SubtreeSelector for Fixed {
            fn select<'t>(&self, tree: &'t ResultTree) -> Result<NodeRef<'t>> {
                tree.node(&["sample", "5"])
            }
        }
        let tree = tree_with_times(&["10", "5"]);
        let node = Fixed.select(&tree).unwrap();
        let bottom = node.child("bottom").unwrap().table().unwrap();
        assert_eq!(bottom.column("x").unwrap(), &[1.0]);
    }

    #[rstest]
    #[case::last(serde_json::json!("last"), DataChoice::Last)]
    #[case::string(serde_json::json!("10"), DataChoice::Key("10".to_string()))]
    #[case::integer(serde_json::json!(20), DataChoice::Key("20".to_string()))]
    fn data_choice_from_json(#[case] value: JsonValue, #[case] expected: DataChoice) {
        assert_eq!(DataChoice::from_json(&value).unwrap(), expected);
    }

    #[rstest]
    #[case::float(serde_json::json!(1.5))]
    #[case::boolean(serde_json::json!(true))]
    #[case::list(serde_json::json!(["10"]))]
    #[case::null(serde_json::json!(null))]
    fn data_choice_rejects_other_types(#[case] value: JsonValue) {
        assert!(matches!(
            DataChoice::from_json(&value),
            Err(Error::Configuration(_))
        ));
    }
}

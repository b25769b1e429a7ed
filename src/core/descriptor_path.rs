//! A minimal JSONPath evaluator for descriptor map and constraint field paths.
//!
//! Only member and index steps are understood: `$.a.b[0]`, `$['a']`, `` $.`a` `` all address
//! the same kinds of nodes. Wildcards, slices and filter expressions are not supported.

use std::{fmt, sync::LazyLock};

use regex::Regex;
use serde_json::Value as Json;

static SEGMENT_DELIMITERS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\[\]`.]").expect("delimiter pattern should compile"));

/// The value found at the end of a path.
#[derive(Clone, Debug, PartialEq)]
pub enum PathValue {
    String(String),
    Integer(i64),
    /// Any other node: objects, arrays, booleans and non-integer numbers.
    Node(Json),
}

impl PathValue {
    fn from_node(node: &Json) -> Option<Self> {
        match node {
            Json::Null => None,
            Json::String(s) => Some(Self::String(s.clone())),
            Json::Number(n) => Some(match n.as_i64() {
                Some(i) => Self::Integer(i),
                None => Self::Node(node.clone()),
            }),
            other => Some(Self::Node(other.clone())),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for PathValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(s) => s.fmt(f),
            Self::Integer(i) => i.fmt(f),
            Self::Node(node) => node.fmt(f),
        }
    }
}

/// Evaluates paths against a fixed JSON root.
#[derive(Clone, Copy, Debug)]
pub struct DescriptorPath<'a> {
    root: &'a Json,
}

impl<'a> DescriptorPath<'a> {
    pub fn new(root: &'a Json) -> Self {
        Self { root }
    }

    /// Return the value at `path`, or `None` when any step is missing.
    ///
    /// The first segment is the root marker (`$`) and is always discarded. Walking into a
    /// string, number or boolean while segments remain yields `None`.
    pub fn get_value(&self, path: &str) -> Option<PathValue> {
        let mut current = self.root;

        for segment in segments(path).skip(1) {
            current = match current {
                Json::Object(map) => map.get(segment)?,
                Json::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
                _ => return None,
            };
        }

        PathValue::from_node(current)
    }
}

fn segments(path: &str) -> impl Iterator<Item = &str> {
    SEGMENT_DELIMITERS
        .split(path)
        .map(|segment| segment.trim_matches(|c| c == '\'' || c == '"'))
        .filter(|segment| !segment.is_empty())
}

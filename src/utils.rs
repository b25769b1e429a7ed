use std::{
    ops::Deref,
    time::{SystemTime, UNIX_EPOCH},
};

use anyhow::{bail, Error};
use serde::{Deserialize, Serialize};

/// A list with at least one element.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(try_from = "Vec<T>", into = "Vec<T>")]
pub struct NonEmptyVec<T: Clone>(Vec<T>);

impl<T: Clone> NonEmptyVec<T> {
    pub fn new(t: T) -> Self {
        Self(vec![t])
    }

    pub fn maybe_new(v: Vec<T>) -> Option<Self> {
        Self::try_from(v).ok()
    }

    pub fn push(&mut self, t: T) {
        self.0.push(t)
    }
}

impl<T: Clone> TryFrom<Vec<T>> for NonEmptyVec<T> {
    type Error = Error;

    fn try_from(v: Vec<T>) -> Result<NonEmptyVec<T>, Error> {
        if v.is_empty() {
            bail!("expected at least one element")
        }
        Ok(NonEmptyVec(v))
    }
}

impl<T: Clone> From<NonEmptyVec<T>> for Vec<T> {
    fn from(NonEmptyVec(v): NonEmptyVec<T>) -> Vec<T> {
        v
    }
}

impl<T: Clone> Deref for NonEmptyVec<T> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        &self.0
    }
}

/// Render a claim name for people: `dateOfBirth` and `date_of_birth` both become
/// `Date Of Birth`.
pub fn to_human_readable_string(value: impl Into<String>) -> String {
    let value = value.into();
    let mut words: Vec<String> = Vec::new();
    let mut current = String::new();

    for c in value.chars() {
        if c == '_' || c == '-' || c.is_whitespace() {
            words.extend((!current.is_empty()).then(|| std::mem::take(&mut current)));
            continue;
        }
        if c.is_uppercase() && !current.is_empty() {
            words.push(std::mem::take(&mut current));
        }
        current.push(c);
    }
    words.extend((!current.is_empty()).then_some(current));

    words
        .iter()
        .map(|word| {
            let mut chars = word.chars();
            chars
                .next()
                .map(|first| first.to_uppercase().chain(chars).collect::<String>())
                .unwrap_or_default()
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Seconds since the Unix epoch. A clock set before 1970 reads as zero.
pub fn unix_timestamp() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| i64::try_from(elapsed.as_secs()).unwrap_or(i64::MAX))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn human_readable_claim_names() {
        assert_eq!(to_human_readable_string("dateOfBirth"), "Date Of Birth");
        assert_eq!(to_human_readable_string("family_name"), "Family Name");
        assert_eq!(to_human_readable_string("email"), "Email");
        assert_eq!(to_human_readable_string("id"), "Id");
        assert_eq!(to_human_readable_string(""), "");
    }

    #[test]
    fn non_empty_vec_rejects_empty_input() {
        assert!(NonEmptyVec::<u8>::maybe_new(vec![]).is_none());
        assert!(serde_json::from_str::<NonEmptyVec<u8>>("[]").is_err());

        let mut v: NonEmptyVec<u8> = serde_json::from_str("[1]").unwrap();
        v.push(2);
        assert_eq!(v[0], 1);
        assert_eq!(v.len(), 2);
    }
}

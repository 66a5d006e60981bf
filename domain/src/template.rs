use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Values substituted for `{{name}}` tokens in a drafted reply.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlaceholderMap(BTreeMap<String, String>);

impl PlaceholderMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Replace every `{{name}}` whose name is configured. Unknown tokens stay as they
    /// are. Inserted values are never rescanned.
    pub fn fill(&self, text: &str) -> String {
        if self.0.is_empty() {
            return text.to_string();
        }

        let mut out = String::with_capacity(text.len());
        let mut rest = text;
        while let Some(start) = rest.find("{{") {
            out.push_str(&rest[..start]);
            let after_open = &rest[start + 2..];
            let token = after_open
                .find("}}")
                .and_then(|end| self.get(&after_open[..end]).map(|value| (end, value)));
            match token {
                Some((end, value)) => {
                    out.push_str(value);
                    rest = &after_open[end + 2..];
                }
                None => {
                    // Step one brace so `{{{{name}}` still finds the inner token.
                    out.push('{');
                    rest = &rest[start + 1..];
                }
            }
        }
        out.push_str(rest);
        out
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for PlaceholderMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

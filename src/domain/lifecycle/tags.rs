use serde::{Deserialize, Serialize};

/// Splits a comma separated tag string, trimming each entry and dropping
/// empty ones. Order is preserved.
pub fn parse_tags(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect()
}

/// Renders tags back into the editable form.
pub fn join_tags(tags: &[String]) -> String {
    tags.join(", ")
}

/// Tags as sent by the admin forms: either the raw comma separated string or
/// an already split list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TagInput {
    Text(String),
    List(Vec<String>),
}

impl Default for TagInput {
    fn default() -> Self {
        TagInput::List(Vec::new())
    }
}

impl TagInput {
    pub fn into_tags(self) -> Vec<String> {
        match self {
            TagInput::Text(text) => parse_tags(&text),
            TagInput::List(list) => list
                .into_iter()
                .map(|tag| tag.trim().to_string())
                .filter(|tag| !tag.is_empty())
                .collect(),
        }
    }
}

use serde::{de, Deserialize, Deserializer, Serialize};

/// Millisecond timestamp assigned when the item is created.
pub type TodoId = i64;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct TodoItem {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: TodoId,
    pub title: String,
    #[serde(rename = "isDone")]
    pub is_done: bool,
}

impl TodoItem {
    pub fn new(id: TodoId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            is_done: false,
        }
    }
}

// Older writers stored the id as text, so accept either form and always write a number.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Int(i64),
    Float(f64),
    Text(String),
}

fn deserialize_id<'de, D>(deserializer: D) -> Result<TodoId, D::Error>
where
    D: Deserializer<'de>,
{
    match RawId::deserialize(deserializer)? {
        RawId::Int(id) => Ok(id),
        RawId::Float(f) if f.fract() == 0.0 && f.abs() < i64::MAX as f64 => Ok(f as i64),
        RawId::Float(f) => Err(de::Error::custom(format!("id {f} is not an integer"))),
        RawId::Text(s) => s
            .trim()
            .parse()
            .map_err(|_| de::Error::custom(format!("id {s:?} is not an integer"))),
    }
}

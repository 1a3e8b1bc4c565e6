use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// An entry of `GET /api/notifications/`. Only the ID is typed; the rest is
/// kept as-is for printing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub id: u64,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

/// An entry of `GET /api/users/me/activity/`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityEntry {
    pub id: u64,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

/// One-line summary of a loosely typed entry: `#id key=value ...`, with the
/// fields in the order the server sent them.
pub fn summarize(id: u64, fields: &Map<String, Value>) -> String {
    let mut line = format!("#{}", id);
    for (key, value) in fields {
        let text = match value {
            Value::String(s) => s.clone(),
            Value::Null => continue,
            other => other.to_string(),
        };
        line.push_str(&format!(" {}={}", key, text));
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notification_keeps_extra_fields() {
        let n: Notification = serde_json::from_str(
            r#"{"id": 4, "message": "Task assigned", "read": false, "link": null}"#,
        )
        .unwrap();
        assert_eq!(n.id, 4);
        assert_eq!(summarize(n.id, &n.fields), "#4 message=Task assigned read=false");
    }
}

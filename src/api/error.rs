use serde_json::Value;

use crate::model::records::RecordKind;

/// The endpoint operation a request belongs to, used to label failures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiOp {
    Connect,
    Login,
    FetchTasks,
    CreateTask,
    UpdateTask,
    DeleteTask,
    FetchProjects,
    FetchUsers,
    FetchMe,
    FetchProfile,
    UpdateProfile,
    ChangePassword,
    FetchNotifications,
    FetchActivity,
    ListRecords(RecordKind),
    CreateRecord(RecordKind),
    FetchRecord(RecordKind),
    FetchCase,
    UpdateCase,
    DeleteCase,
}

impl std::fmt::Display for ApiOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiOp::Connect => f.write_str("connect"),
            ApiOp::Login => f.write_str("login"),
            ApiOp::FetchTasks => f.write_str("fetch tasks"),
            ApiOp::CreateTask => f.write_str("create task"),
            ApiOp::UpdateTask => f.write_str("update task"),
            ApiOp::DeleteTask => f.write_str("delete task"),
            ApiOp::FetchProjects => f.write_str("fetch projects"),
            ApiOp::FetchUsers => f.write_str("fetch users"),
            ApiOp::FetchMe => f.write_str("fetch current user"),
            ApiOp::FetchProfile => f.write_str("fetch profile"),
            ApiOp::UpdateProfile => f.write_str("update profile"),
            ApiOp::ChangePassword => f.write_str("change password"),
            ApiOp::FetchNotifications => f.write_str("fetch notifications"),
            ApiOp::FetchActivity => f.write_str("fetch activity"),
            ApiOp::ListRecords(kind) => write!(f, "list {}", kind.path().trim_matches('/')),
            ApiOp::CreateRecord(kind) => write!(f, "create {}", kind),
            ApiOp::FetchRecord(kind) => write!(f, "fetch {}", kind),
            ApiOp::FetchCase => f.write_str("fetch case"),
            ApiOp::UpdateCase => f.write_str("update case"),
            ApiOp::DeleteCase => f.write_str("delete case"),
        }
    }
}

/// One field of a structured validation error (`{"field": ["msg", ...]}`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub messages: Vec<String>,
}

/// Error type for API calls
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{op} failed: could not reach server: {source}")]
    Transport {
        op: ApiOp,
        #[source]
        source: reqwest::Error,
    },
    #[error("{op} failed: not authorized (run `tb login` again)")]
    Unauthorized { op: ApiOp },
    #[error("{op} failed: {}", describe_fields(.fields))]
    Validation { op: ApiOp, fields: Vec<FieldError> },
    #[error("{op} failed (HTTP {status}){}", detail_suffix(.detail))]
    Rejected {
        op: ApiOp,
        status: u16,
        detail: Option<String>,
    },
    #[error("{op} failed: unexpected response: {source}")]
    Decode {
        op: ApiOp,
        #[source]
        source: serde_json::Error,
    },
}

fn describe_fields(fields: &[FieldError]) -> String {
    fields
        .iter()
        .map(|f| format!("{}: {}", f.field, f.messages.join(" ")))
        .collect::<Vec<_>>()
        .join("; ")
}

fn detail_suffix(detail: &Option<String>) -> String {
    match detail {
        Some(d) => format!(": {}", d),
        None => String::new(),
    }
}

const INVALID_CHOICE: &str = "is not a valid choice";

impl ApiError {
    pub fn op(&self) -> ApiOp {
        match self {
            ApiError::Transport { op, .. }
            | ApiError::Unauthorized { op }
            | ApiError::Validation { op, .. }
            | ApiError::Rejected { op, .. }
            | ApiError::Decode { op, .. } => *op,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Unauthorized { .. })
    }

    /// Text for an alert or status row. Validation errors become one line
    /// per field, with invalid-choice rejections rephrased.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Validation { fields, .. } => fields
                .iter()
                .map(field_message)
                .collect::<Vec<_>>()
                .join("\n"),
            other => other.to_string(),
        }
    }
}

fn field_message(f: &FieldError) -> String {
    let first = f.messages.first().map(String::as_str).unwrap_or_default();
    if f.field == "non_field_errors" || f.field == "detail" {
        return f.messages.join(" ");
    }
    if first.contains(INVALID_CHOICE) {
        return format!(
            "{} has an invalid value; choose one of the listed options",
            field_label(&f.field)
        );
    }
    format!("{}: {}", f.field, f.messages.join(" "))
}

/// Display label for a field name (`case_type` -> `Case type`)
fn field_label(field: &str) -> String {
    let spaced = field.replace('_', " ");
    let mut chars = spaced.chars();
    match chars.next() {
        Some(c) => c.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Classify a non-2xx response body.
///
/// - 401 → `Unauthorized`, except for login, where it means bad credentials
/// - `{"detail": "..."}` or a bare JSON string → `Rejected` with that text
/// - `{"field": ["msg"], ...}` → `Validation`
/// - anything else → `Rejected` with the raw JSON (or no detail if the
///   body is not JSON at all)
pub fn interpret_error(op: ApiOp, status: u16, body: &str) -> ApiError {
    if status == 401 && op != ApiOp::Login {
        return ApiError::Unauthorized { op };
    }
    let value: Value = match serde_json::from_str(body) {
        Ok(v) => v,
        Err(_) => {
            return ApiError::Rejected {
                op,
                status,
                detail: None,
            };
        }
    };
    match value {
        Value::String(s) => ApiError::Rejected {
            op,
            status,
            detail: Some(s),
        },
        Value::Object(map) => {
            if let Some(Value::String(detail)) = map.get("detail") {
                return ApiError::Rejected {
                    op,
                    status,
                    detail: Some(detail.clone()),
                };
            }
            let fields: Vec<FieldError> = map
                .iter()
                .filter_map(|(field, v)| {
                    let messages = match v {
                        Value::Array(items) => items
                            .iter()
                            .map(|m| match m {
                                Value::String(s) => s.clone(),
                                other => other.to_string(),
                            })
                            .collect(),
                        Value::String(s) => vec![s.clone()],
                        _ => return None,
                    };
                    Some(FieldError {
                        field: field.clone(),
                        messages,
                    })
                })
                .collect();
            if fields.is_empty() {
                ApiError::Rejected {
                    op,
                    status,
                    detail: Some(Value::Object(map).to_string()),
                }
            } else {
                ApiError::Validation { op, fields }
            }
        }
        other => ApiError::Rejected {
            op,
            status,
            detail: Some(other.to_string()),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn unauthorized() {
        let err = interpret_error(ApiOp::FetchTasks, 401, r#"{"detail":"Token expired"}"#);
        assert!(err.is_unauthorized());
        assert_eq!(err.op(), ApiOp::FetchTasks);
    }

    #[test]
    fn bad_credentials_keep_detail() {
        let body = r#"{"detail":"No active account found with the given credentials"}"#;
        let err = interpret_error(ApiOp::Login, 401, body);
        assert!(!err.is_unauthorized());
        assert_eq!(
            err.user_message(),
            "login failed (HTTP 401): No active account found with the given credentials"
        );
    }

    #[test]
    fn detail_payload() {
        let err = interpret_error(ApiOp::CreateTask, 400, r#"{"detail":"Project is closed"}"#);
        assert_eq!(err.to_string(), "create task failed (HTTP 400): Project is closed");
    }

    #[test]
    fn opaque_body() {
        let err = interpret_error(ApiOp::DeleteTask, 500, "<html>Server Error</html>");
        assert_eq!(err.to_string(), "delete task failed (HTTP 500)");
    }

    #[test]
    fn structured_fields() {
        let body = r#"{"title":["This field may not be blank."],"end_date":["Invalid date."]}"#;
        let err = interpret_error(ApiOp::UpdateTask, 400, body);
        match &err {
            ApiError::Validation { fields, .. } => assert_eq!(fields.len(), 2),
            other => panic!("expected validation error, got {:?}", other),
        }
        let msg = err.user_message();
        assert!(msg.contains("title: This field may not be blank."));
        assert!(msg.contains("end_date: Invalid date."));
    }

    #[test]
    fn invalid_choice_is_rephrased() {
        let body = r#"{"case_type":["\"Old\" is not a valid choice."],"status":["\"Nope\" is not a valid choice."]}"#;
        let err = interpret_error(ApiOp::CreateRecord(RecordKind::Cases), 400, body);
        assert_eq!(
            err.user_message(),
            "Case type has an invalid value; choose one of the listed options\n\
             Status has an invalid value; choose one of the listed options"
        );
    }

    #[test]
    fn non_field_errors_are_plain() {
        let body = r#"{"non_field_errors":["Unable to log in with provided credentials."]}"#;
        let err = interpret_error(ApiOp::Login, 400, body);
        assert_eq!(err.user_message(), "Unable to log in with provided credentials.");
    }

    #[test]
    fn op_labels() {
        assert_eq!(ApiOp::ListRecords(RecordKind::ConstructionTypes).to_string(), "list constructiontypes");
        assert_eq!(ApiOp::CreateRecord(RecordKind::Cases).to_string(), "create case");
    }
}

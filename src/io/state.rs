use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Persisted TUI preferences (written to state.json)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UiState {
    /// Whether the filter sidebar is shown
    #[serde(default = "default_true")]
    pub sidebar_open: bool,
    /// Which view was showing ("board", "gantt", "list")
    #[serde(default)]
    pub view: String,
    /// Assignee filter (`None` = all)
    #[serde(default)]
    pub assignee_filter: Option<String>,
    /// Project filter by project ID (`None` = all)
    #[serde(default)]
    pub project_filter: Option<u64>,
    /// Last search pattern in the list view
    #[serde(default)]
    pub last_search: Option<String>,
}

impl Default for UiState {
    fn default() -> Self {
        UiState {
            sidebar_open: true,
            view: String::new(),
            assignee_filter: None,
            project_filter: None,
            last_search: None,
        }
    }
}

fn default_true() -> bool {
    true
}

/// Read state.json from the given directory
pub fn read_ui_state(dir: &Path) -> Option<UiState> {
    let path = dir.join("state.json");
    let content = fs::read_to_string(&path).ok()?;
    serde_json::from_str(&content).ok()
}

/// Write state.json to the given directory
pub fn write_ui_state(dir: &Path, state: &UiState) -> Result<(), std::io::Error> {
    let path = dir.join("state.json");
    let content = serde_json::to_string_pretty(state)?;
    super::atomic_write(&path, content.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn write_and_read_round_trip() {
        let dir = TempDir::new().unwrap();
        let state = UiState {
            sidebar_open: false,
            view: "gantt".into(),
            assignee_filter: Some("mika".into()),
            project_filter: Some(3),
            last_search: Some("deploy".into()),
        };

        write_ui_state(dir.path(), &state).unwrap();
        let loaded = read_ui_state(dir.path()).unwrap();

        assert!(!loaded.sidebar_open);
        assert_eq!(loaded.view, "gantt");
        assert_eq!(loaded.assignee_filter.as_deref(), Some("mika"));
        assert_eq!(loaded.project_filter, Some(3));
        assert_eq!(loaded.last_search.as_deref(), Some("deploy"));

        let raw = fs::read_to_string(dir.path().join("state.json")).unwrap();
        assert!(raw.contains("\"sidebarOpen\": false"));
    }

    #[test]
    fn read_missing_file_returns_none() {
        let dir = TempDir::new().unwrap();
        assert!(read_ui_state(dir.path()).is_none());
    }

    #[test]
    fn read_malformed_json_returns_none() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("state.json"), "not json {{{").unwrap();
        assert!(read_ui_state(dir.path()).is_none());
    }

    #[test]
    fn serde_defaults_on_empty_object() {
        let state: UiState = serde_json::from_str("{}").unwrap();
        assert!(state.sidebar_open);
        assert_eq!(state.view, "");
        assert!(state.assignee_filter.is_none());
        assert!(state.project_filter.is_none());
    }
}

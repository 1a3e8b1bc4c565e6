use serde::{Deserialize, Serialize};

/// A project, used as a task filter and as a foreign key on tasks
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: u64,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Look up a project's name by ID
pub fn project_name(projects: &[Project], id: u64) -> Option<&str> {
    projects
        .iter()
        .find(|p| p.id == id)
        .map(|p| p.name.as_str())
}

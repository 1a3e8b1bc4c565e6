use std::ops::Range;

use regex::{Regex, RegexBuilder};

use super::kanban::{AssigneeFilter, assignee_name};
use crate::model::project::Project;
use crate::model::task::Task;
use crate::model::user::UserDirectory;

/// Client-side filters shared by the board, Gantt and list views. The
/// project filter is applied by the server (`?project=`) and lives with the
/// fetch, not here.
#[derive(Debug, Clone, Default)]
pub struct TaskFilter {
    pub assignee: AssigneeFilter,
    /// Only tasks assigned to this user ID
    pub only_mine: Option<u64>,
    pub search: Option<Regex>,
}

impl TaskFilter {
    /// True when every task passes
    pub fn is_empty(&self) -> bool {
        self.assignee == AssigneeFilter::All && self.only_mine.is_none() && self.search.is_none()
    }

    pub fn matches(&self, task: &Task, users: &UserDirectory) -> bool {
        if let Some(me) = self.only_mine
            && task.assignee != Some(me)
        {
            return false;
        }
        if !self.assignee.accepts(assignee_name(task, users)) {
            return false;
        }
        match &self.search {
            Some(re) => search_task(re, task).is_some(),
            None => true,
        }
    }

    /// Matching tasks, in their original order
    pub fn apply(&self, tasks: &[Task], users: &UserDirectory) -> Vec<Task> {
        tasks
            .iter()
            .filter(|t| self.matches(t, users))
            .cloned()
            .collect()
    }
}

/// Case-insensitive search pattern
pub fn compile_search(pattern: &str) -> Result<Regex, regex::Error> {
    RegexBuilder::new(pattern).case_insensitive(true).build()
}

/// Which task field a search matched
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchField {
    Id,
    Title,
    Description,
}

/// A search hit: the first matching field and the match ranges in it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchHit {
    pub field: MatchField,
    pub spans: Vec<Range<usize>>,
}

fn find_matches(re: &Regex, text: &str) -> Vec<Range<usize>> {
    re.find_iter(text).map(|m| m.start()..m.end()).collect()
}

/// Search a task's ID, title and description, in that order
pub fn search_task(re: &Regex, task: &Task) -> Option<SearchHit> {
    let id = task.id.to_string();
    let description = task.description.as_deref().unwrap_or_default();
    [
        (MatchField::Id, id.as_str()),
        (MatchField::Title, task.title.as_str()),
        (MatchField::Description, description),
    ]
    .into_iter()
    .find_map(|(field, text)| {
        let spans = find_matches(re, text);
        (!spans.is_empty()).then_some(SearchHit { field, spans })
    })
}

/// Next project filter when cycling: all, then each project, then all again
pub fn cycle_project(current: Option<u64>, projects: &[Project]) -> Option<u64> {
    match current {
        None => projects.first().map(|p| p.id),
        Some(id) => projects
            .iter()
            .position(|p| p.id == id)
            .and_then(|i| projects.get(i + 1))
            .map(|p| p.id),
    }
}

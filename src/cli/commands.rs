use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};

use crate::model::records::RecordKind;
use crate::model::task::TaskStatus;

#[derive(Parser)]
#[command(name = "tb", about = concat!("taskboard v", env!("CARGO_PKG_VERSION"), " - kanban and Gantt for your task API"), version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// API base URL (overrides TASKBOARD_API_URL and config.toml)
    #[arg(long = "api-url", value_name = "URL", global = true)]
    pub api_url: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Log in and store the session
    Login(LoginArgs),
    /// Forget the stored session
    Logout,
    /// Show the logged-in user
    Whoami,
    /// List tasks
    List(ListArgs),
    /// Show tasks as kanban columns
    Board(BoardArgs),
    /// Show dated tasks as a Gantt chart
    Gantt(GanttArgs),
    /// Show task details
    Show(ShowArgs),
    /// Create a task
    Add(AddArgs),
    /// Edit a task
    Edit(EditArgs),
    /// Move a task to another status column
    Mv(MvArgs),
    /// Delete a task
    Rm(RmArgs),
    /// List projects
    Projects,
    /// List users
    Users,
    /// Show or update your profile
    Profile(ProfileArgs),
    /// Change your password
    Passwd,
    /// List notifications
    Notifications,
    /// List your recent activity
    Activity,
    /// List case-management records
    Records(RecordsArgs),
    /// Manage companies
    Company(CompanyCmd),
    /// Manage cases
    Case(CaseCmd),
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct LoginArgs {
    pub username: String,
    /// Password (prompted for if omitted)
    #[arg(long)]
    pub password: Option<String>,
}

// ---------------------------------------------------------------------------
// Task views
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct ListArgs {
    /// Only tasks in this project
    #[arg(long)]
    pub project: Option<u64>,
    /// Only tasks assigned to this username
    #[arg(long)]
    pub assignee: Option<String>,
    /// Only tasks assigned to you
    #[arg(long)]
    pub mine: bool,
    /// Regex matched against ID, title and description (case-insensitive)
    #[arg(long)]
    pub search: Option<String>,
    /// Only tasks with this status
    #[arg(long)]
    pub status: Option<TaskStatus>,
}

#[derive(Args)]
pub struct BoardArgs {
    #[arg(long)]
    pub project: Option<u64>,
    #[arg(long)]
    pub assignee: Option<String>,
    /// Column width in characters
    #[arg(long, default_value_t = 24)]
    pub column_width: usize,
}

#[derive(Args)]
pub struct GanttArgs {
    #[arg(long)]
    pub project: Option<u64>,
    /// Only tasks assigned to this username
    #[arg(long)]
    pub assignee: Option<String>,
    /// Only tasks assigned to you
    #[arg(long)]
    pub mine: bool,
    /// Characters per day
    #[arg(long, default_value_t = 1)]
    pub width: u16,
}

#[derive(Args)]
pub struct ShowArgs {
    pub id: u64,
}

// ---------------------------------------------------------------------------
// Task writes
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct AddArgs {
    pub title: String,
    #[arg(long)]
    pub description: Option<String>,
    /// Assignee user ID
    #[arg(long)]
    pub assignee: Option<u64>,
    #[arg(long)]
    pub project: Option<u64>,
    #[arg(long)]
    pub status: Option<TaskStatus>,
    /// Start date (YYYY-MM-DD)
    #[arg(long)]
    pub start: Option<String>,
    /// End date (YYYY-MM-DD)
    #[arg(long)]
    pub end: Option<String>,
}

#[derive(Args)]
pub struct EditArgs {
    pub id: u64,
    #[arg(long)]
    pub title: Option<String>,
    #[arg(long)]
    pub description: Option<String>,
    #[arg(long)]
    pub status: Option<TaskStatus>,
    /// Assignee user ID (0 to unassign)
    #[arg(long)]
    pub assignee: Option<u64>,
    /// Project ID (0 to clear)
    #[arg(long)]
    pub project: Option<u64>,
    /// Start date (YYYY-MM-DD, empty to clear)
    #[arg(long)]
    pub start: Option<String>,
    /// End date (YYYY-MM-DD, empty to clear)
    #[arg(long)]
    pub end: Option<String>,
}

#[derive(Args)]
pub struct MvArgs {
    pub id: u64,
    /// Destination column
    pub status: TaskStatus,
}

#[derive(Args)]
pub struct RmArgs {
    pub id: u64,
    /// Skip the confirmation prompt
    #[arg(long, short = 'y')]
    pub yes: bool,
}

// ---------------------------------------------------------------------------
// Profile
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct ProfileArgs {
    #[arg(long)]
    pub bio: Option<String>,
    #[arg(long)]
    pub department: Option<String>,
}

// ---------------------------------------------------------------------------
// Case management
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct RecordsArgs {
    pub kind: RecordKind,
}

#[derive(Args)]
pub struct CompanyCmd {
    #[command(subcommand)]
    pub action: CompanyAction,
}

#[derive(Subcommand)]
pub enum CompanyAction {
    /// Show one company
    Show { id: u64 },
    /// Create a company
    Add(CompanyAddArgs),
}

#[derive(Args)]
pub struct CompanyAddArgs {
    pub name: String,
    #[arg(long)]
    pub address: Option<String>,
    /// Contact person's name
    #[arg(long)]
    pub contact: Option<String>,
}

#[derive(Args)]
pub struct CaseCmd {
    #[command(subcommand)]
    pub action: CaseAction,
}

#[derive(Subcommand)]
pub enum CaseAction {
    /// Count all, in-progress and completed cases
    Summary,
    /// Show one case
    Show { id: u64 },
    /// Create a case
    Add(CaseAddArgs),
    /// Change a case's type or status
    Edit(CaseEditArgs),
    /// Delete a case
    Rm(RmArgs),
}

#[derive(Args)]
pub struct CaseAddArgs {
    /// Case type (e.g. New, CS)
    #[arg(long = "type")]
    pub case_type: String,
    /// Status (e.g. Appointment, Surveyed)
    #[arg(long)]
    pub status: String,
    /// Owner ID
    #[arg(long)]
    pub owner: u64,
    /// Property ID
    #[arg(long)]
    pub property: u64,
    /// Assigned sales user ID
    #[arg(long)]
    pub sales: u64,
    /// Occurrence date (YYYY-MM-DD)
    #[arg(long)]
    pub date: NaiveDate,
    /// Expected construction type ID (repeatable)
    #[arg(long = "construction-type")]
    pub construction_types: Vec<u64>,
}

#[derive(Args)]
pub struct CaseEditArgs {
    pub id: u64,
    #[arg(long = "type")]
    pub case_type: Option<String>,
    #[arg(long)]
    pub status: Option<String>,
}

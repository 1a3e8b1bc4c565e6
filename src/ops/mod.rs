pub mod board;
pub mod filter;
pub mod gantt;
pub mod kanban;

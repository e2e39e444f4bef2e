pub mod column;
pub mod config;
pub mod editor;
pub mod kanban_board;
pub mod state;
pub mod task;
pub mod theme;
pub mod ui;

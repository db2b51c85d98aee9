//! Command implementations for rubric

pub mod create;
pub mod delete;
pub mod dispatch;
pub mod export;
pub mod grade;
pub mod init;
pub mod list;
pub mod show;
pub mod update;

mod render;

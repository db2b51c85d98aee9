mod create;
mod errors;
mod grade;
mod init;
mod list;
mod show;

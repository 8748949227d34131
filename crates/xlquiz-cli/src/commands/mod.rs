pub mod check_table;
pub mod grade;
pub mod init;
pub mod interview;
pub mod questions;
pub mod report;

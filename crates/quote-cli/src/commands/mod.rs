//! CLI commands

pub mod db_check;
pub mod dev;
pub mod fetch;

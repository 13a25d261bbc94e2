pub mod add;
pub mod auth_cmd;
pub mod common;
pub mod delete;
pub mod list;
pub mod palette;
pub mod profile;
pub mod show;

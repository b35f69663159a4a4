pub mod config_cmd;
pub mod logs;
pub mod route;

pub mod config;
pub mod follow;
pub mod init;
pub mod post;
pub mod replay;
pub mod user;

pub mod clock;
pub mod config;
pub mod error;
pub mod io;
pub mod journal;
pub mod paths;
pub mod publication;
pub mod publisher;
pub mod receptionist;
pub mod system;
pub mod user;

pub use error::{OpenChatError, Result};

pub mod aliases;
pub mod init;
pub mod run;
pub mod sessions;
pub mod utils;

pub mod avatar;
pub mod init;
pub mod modes;
pub mod play;
pub mod stats;

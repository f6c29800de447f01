//! Process management infrastructure
//!
//! The pid file and the signal plumbing used to control a running daemon.

pub mod pid_file;

pub use pid_file::PidFile;

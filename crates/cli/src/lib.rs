//! Library surface of the gifwall binary, exposed so integration tests can
//! exercise argument parsing without spawning a process.

pub mod cache_cmd;
pub mod cli;
pub mod page;

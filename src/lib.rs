pub mod config;
pub mod flash;
pub mod serial;

#[macro_use]
extern crate log;

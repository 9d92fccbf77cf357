//! Process-level infrastructure shared by the SSE server binary: command line and
//! environment configuration, and console logging.

pub mod config;
pub mod logging;

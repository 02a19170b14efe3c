//! Background Tasks Module
//!
//! Contains background tasks that run periodically during server operation.
//!
//! # Tasks
//! - Session sweep: drops expired sessions from the in-process backend

mod cleanup;

pub use cleanup::spawn_cleanup_task;

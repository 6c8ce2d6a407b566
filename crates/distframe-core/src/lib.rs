//! distframe core: layered configuration and tracing initialisation shared by every crate.

pub mod config;
pub mod html;
pub mod observability;

//! Local static file server, readiness poller and endpoint resolution.
//!
//! - **Resolver**: a reachable remote published URL wins; otherwise fall back to the local
//!   build directory (which must exist).
//! - **Server**: serve the build directory over plain HTTP on a background thread with an
//!   explicit shutdown.
//! - **Poller**: bounded retry loop until the candidate URL answers HTTP 200.

mod error;
mod mime;
mod poller;
mod probe;
mod resolver;
mod server;

pub use error::ServeError;
pub use poller::{Readiness, ReadinessPoller};
pub use probe::{HttpProbe, Probe, ProbeOutcome};
pub use resolver::{EndpointResolver, Resolution};
pub use server::StaticServer;

//! CoAP-style resource layer for an embedded sensor/actuator gateway.
//!
//! Requests decoded by the surrounding protocol engine are routed through
//! a [`Gateway`] to per-device resources under `/sensor/<group>/<name>`.
//! Each resource answers `PUT` (configuration), `GET` (config and live
//! readings, with Observe subscriptions), and `DELETE ?all` (disable),
//! producing short textual payloads like `245.2 ppm`.

pub mod coap;
pub mod convert;
pub mod error;
pub mod gateway;
pub mod observe;
pub mod query;
pub mod resource;
pub mod retry;
pub mod sensor;
pub mod stats;

pub use coap::{Code, Method, Reading, Request, Response};
pub use error::Error;
pub use gateway::Gateway;
pub use resource::Resource;
pub use stats::Stats;

//! Performance recognition engine for an HR self-service portal.
//!
//! Peers rate colleagues each period, unit supervisors may override the
//! peer result with penalties and bonuses, and central administrators may
//! override again with a discretionary adjustment. The engine answers, at
//! any time, "what is this employee's current score" and "who currently
//! leads", and records explicitly designated winners for the recap views.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod workflows;

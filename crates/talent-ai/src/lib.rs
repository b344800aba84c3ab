//! Candidate matching and automated triage for recruiting workflows.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod workflows;

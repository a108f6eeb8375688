//! Credit risk scoring service: validates loan applications, assembles the
//! fixed-order feature vector expected by the pretrained classifiers, and
//! serves predictions over HTTP.

pub mod config;
pub mod error;
pub mod scoring;
pub mod telemetry;

//! LORA reports fetched from the VALERA API and exported in one call.

pub mod client;
pub mod handlers;

pub use client::{ReportFilter, ReportSource, UpstreamError, ValeraClient};

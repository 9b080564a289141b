//! Core use-case services.
//!
//! # Responsibility
//! - Seed sample data through the unit of work.
//! - Orchestrate repository reads into the printed report.

pub mod report_service;
pub mod seed_service;

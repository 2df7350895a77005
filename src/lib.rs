//! Salary Structure Engine
//!
//! This crate validates salary structures built from a catalog of pay
//! components, resolves the references between components, and computes
//! monthly salary breakdowns for an annual cost-to-company (CTC).
//!
//! # Example
//!
//! ```no_run
//! use salary_engine::calculation::{PreviewService, StructureSource};
//! use salary_engine::config::ConfigLoader;
//! use rust_decimal::Decimal;
//!
//! let loader = ConfigLoader::load("./config/default")?;
//! let preview = PreviewService::new(loader.config()).compute_preview(
//!     StructureSource::Stored { structure_id: "standard", version: None },
//!     Decimal::from(1_200_000),
//!     None,
//! )?;
//!
//! for component in &preview.components {
//!     println!("{:<24} {:>12}", component.name, component.monthly_amount);
//! }
//! println!("{:<24} {:>12}", "Net salary", preview.net_salary);
//! # Ok::<(), salary_engine::error::EngineError>(())
//! ```

#![warn(missing_docs)]

pub mod api;
pub mod calculation;
pub mod config;
pub mod error;
pub mod models;
pub mod telemetry;

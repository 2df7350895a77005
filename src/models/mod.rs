//! Core data models for the salary structure engine.
//!
//! This module contains all the domain models used throughout the engine.

mod assignment;
mod component;
mod preview_result;
mod structure;

pub use assignment::SalaryAssignment;
pub use component::{CalculationType, ComponentCategory, ComponentType, PayComponentDefinition};
pub use preview_result::{
    AuditStep, AuditTrace, AuditWarning, ComponentAmount, GrossBasis, PreviewResult,
};
pub use structure::{
    BaseRef, Bounds, CalculationRule, SalaryStructure, StructureComponent,
    StructureComponentDraft, StructureStatus,
};

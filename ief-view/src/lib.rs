//! Views over resolved policy journeys.
//!
//! Turns an [`ief_resolver::ResolutionResult`] into the shapes a journey
//! viewer renders:
//! - [`StepGraph`]: node and edge topology of the step chain
//! - [`ReportAssembler`]: plain-text details and compact step summaries

pub mod config;
pub mod graph;
pub mod report;

pub use config::ViewConfig;
pub use graph::{step_label, StepEdge, StepGraph, StepNode};
pub use report::ReportAssembler;

//! Ledger report generation.
//!
//! - `types` - report catalogue, profiles, requests and row DTOs
//! - `source` - data source seam implemented by the database layer
//! - `composer` - three-segment row composition per entity
//! - `render` - renderer contract and parameter map
//! - `service` - assembly: fetch, compose, placeholder, render

pub mod composer;
pub mod error;
pub mod render;
pub mod service;
pub mod source;
pub mod types;


pub use composer::ReportComposer;
pub use error::ReportError;
pub use render::{JsonRenderer, RenderError, RenderedDocument, ReportParameters, ReportRenderer};
pub use service::{ReportService, ReportSettings};
pub use source::{LedgerSource, SourceError, SourceQuery, SourceTransaction};
pub use types::*;

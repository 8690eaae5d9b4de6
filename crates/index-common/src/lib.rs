//! Shared types for the imagery-index validation workspace.

pub mod bbox;
pub mod geometry;
pub mod messages;
pub mod source;

pub use bbox::BoundingBox;
pub use geometry::RawGeometry;
pub use messages::{CheckMessage, CheckReport, RunReport, Severity, Stage};
pub use source::{Source, SourceProperties, SourceType};

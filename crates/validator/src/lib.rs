//! Validation pipeline for catalogue source files.
//!
//! The pipeline runs each GeoJSON source through schema, geometry,
//! metadata and protocol stages. The basic profile stays offline; the
//! strict profile also probes the imagery servers.

pub mod fetch;
pub mod geometry;
pub mod metadata;
pub mod pipeline;
pub mod profile;
pub mod protocol;
pub mod schema;

pub use fetch::{Fetch, FetchError, FetchResponse, HttpFetcher, USER_AGENT};
pub use pipeline::Pipeline;
pub use profile::Profile;
pub use schema::{BuiltinSchemaValidator, SchemaValidator};

//! OpenProject resource client.
//!
//! # Architecture
//!
//! - `resource`: the [`ResourceClient`] trait every view is written against
//! - `http`: reqwest-backed implementation for API v3
//! - `models`: domain entities (WorkPackage, Relation, Activity, Project, Page)
//! - `hal`: HAL+JSON wire shapes, converted into models on deserialisation
//! - `payloads`: HAL bodies for write operations
//! - `error`: fetch error types

mod error;
mod hal;
mod http;
mod models;
pub mod payloads;
mod resource;

#[cfg(test)]
pub(crate) mod fake;

pub use error::{ClientError, ClientResult};
pub use http::{ClientConfig, OpenProjectClient};
pub use models::*;
pub use resource::{MAX_PAGE_SIZE, PageQuery, ResourceClient, ResourceKind};

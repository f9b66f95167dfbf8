//! Spatial directory for CURFEW.
//!
//! Holds the registry of guard agents and route points and answers the
//! two queries the alert protocol is built on: nearest agent to a
//! point, and the k nearest route points to a point.

pub mod directory;
pub mod error;

pub use directory::{RoutePoint, SpatialDirectory};
pub use error::SpatialError;

//! Shortest routes across the whole network.
//!
//! Every segment of every line becomes an edge weighted by its distance, so
//! a route may change lines wherever two lines share a station.

mod graph;
mod route;

pub use graph::{RouteError, RouteGraph, Traversal};
pub use route::Route;

//! Subway network server.
//!
//! Maintains subway lines as ordered chains of segments, keeps them
//! consistent as segments are inserted or stations removed, and answers
//! "what is the shortest way from A to B, and what does it cost?"

pub mod config;
pub mod domain;
pub mod fare;
pub mod navigator;
pub mod seed;
pub mod service;
pub mod store;
pub mod web;

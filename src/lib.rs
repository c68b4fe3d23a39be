//! Wrapped-plane arcade shooter: the simulation core.
//!
//! `entities` holds the data, `compute` holds the rules that advance it, and
//! `view` exposes the read-only snapshots a renderer draws from.

pub mod compute;
pub mod config;
pub mod entities;
pub mod error;
pub mod score;
pub mod view;

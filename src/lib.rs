//! vmctl Library
//!
//! This library provides the core functionality for vmctl: a uniform
//! command pipeline for issuing lifecycle actions (start, stop, restart,
//! migrate, volume hot-plug) and guest queries against virtual machines
//! managed by a remote control plane.

pub mod command;
pub mod config;
pub mod control_plane;
pub mod logging;

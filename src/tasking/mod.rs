//! Task lifecycle and authorization decisions for Gantt.
//!
//! This module implements the task-management core: role-ranked
//! authorization decisions, the task status state machine with due-date and
//! delay semantics, per-due-date rating aggregation, audit-trail emission,
//! and grouped task reporting. The module follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Pure authorization decisions in [`access`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]
//! - Immutable runtime policy in [`config`]

pub mod access;
pub mod adapters;
pub mod config;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;

//! Gantt: task lifecycle and authorization core for a multi-tenant
//! task-management backend.
//!
//! This crate implements the rules governing who may create, edit,
//! transition, rate, or delete a task, combined with the task and rating
//! state machines: due-date semantics, delay detection, and rating
//! aggregation. Transport, persistence engines, and notification delivery
//! stay outside the crate behind narrow port traits.
//!
//! # Architecture
//!
//! Gantt follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external collaborators
//! - **Adapters**: Concrete implementations of ports (in-memory today)
//!
//! # Modules
//!
//! - [`tasking`]: Task lifecycle, authorization decisions, rating
//!   aggregation, and grouped task reporting

pub mod tasking;

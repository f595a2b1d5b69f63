//! exec-gateway
//!
//! A lifecycle orchestrator for a long-running command-execution gateway,
//! built with Tokio and Axum.
//!
//! # Architecture Overview
//!
//! ```text
//!                    ┌──────────────────────────────────────────────────┐
//!                    │                  EXEC GATEWAY                     │
//!                    │                                                   │
//!   Client Request   │  ┌─────────┐    ┌───────────┐    ┌────────────┐  │
//!   ─────────────────┼─▶│  http   │───▶│  service  │───▶│ execution  │  │
//!                    │  │ server  │    │  handler  │    │  service   │  │
//!                    │  └─────────┘    └─────┬─────┘    └─────┬──────┘  │
//!                    │                       │                │         │
//!                    │                       ▼                ▼         │
//!                    │                 ┌───────────┐    ┌────────────┐  │
//!   Health Prober    │                 │  events   │◀───│ publisher  │  │
//!   ─────────────────┼─▶ /health/*     │  router   │    └────────────┘  │
//!                    │                 └───────────┘                    │
//!                    │                                                   │
//!                    │  ┌────────────────────────────────────────────┐  │
//!                    │  │           Cross-Cutting Concerns            │  │
//!                    │  │  ┌────────┐ ┌────────┐ ┌────────────────┐  │  │
//!                    │  │  │ config │ │ health │ │ observability  │  │  │
//!                    │  │  └────────┘ └────────┘ └────────────────┘  │  │
//!                    │  │  ┌──────────────────────────────────────┐  │  │
//!                    │  │  │   lifecycle: startup / registry /    │  │  │
//!                    │  │  │   shutdown coordinator / signals     │  │  │
//!                    │  │  └──────────────────────────────────────┘  │  │
//!                    │  └────────────────────────────────────────────┘  │
//!                    └──────────────────────────────────────────────────┘
//! ```
//!
//! The lifecycle subsystem is the heart of the crate: dependencies come up
//! in a fixed order, each registers its teardown as soon as it exists, and a
//! termination signal drains them in strict reverse order with a bounded
//! grace period for the server.

// Core subsystems
pub mod config;
pub mod http;
pub mod service;

// Cross-cutting concerns
pub mod health;
pub mod lifecycle;
pub mod observability;

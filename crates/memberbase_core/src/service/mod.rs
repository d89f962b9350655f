//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate collection calls into graph, cascade and record use-cases.
//! - Keep request handlers decoupled from storage details.

pub mod cascade;
pub mod error;
pub mod record_service;
pub mod subscription_graph;

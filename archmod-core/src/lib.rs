//! archmod core library — coupling metrics, cluster store, and module recovery.
//!
//! The main entry point is [`pipeline::run_analysis`], which turns a
//! [`call_graph::CallGraph`] into a class-level [`coupling::CouplingGraph`]
//! and runs both [`analyze::hierarchical`] clustering and bounded
//! [`analyze::modules`] identification over it.

pub mod analyze;
pub mod call_graph;
pub mod cluster;
pub mod config;
pub mod coupling;
pub mod error;
pub mod observer;
pub mod pipeline;
pub mod render;
pub mod types;

//! Integration tests for chatpane
//!
//! These tests verify that multiple components work together correctly.

#[path = "../common/mod.rs"]
pub mod common;

pub mod app_flow;
pub mod panel_flow;
pub mod selection_flow;

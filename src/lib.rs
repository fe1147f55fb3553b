//! userdeck - a terminal user directory built from encapsulated widgets
//!
//! Widgets declare a scoped style sheet and a markup template, render into a
//! surface they own, and are created by tag through a process-wide registry.
//! The binary in `main.rs` hosts them on a single page.

pub mod action;
pub mod app;
pub mod component;
pub mod components;
pub mod config;
pub mod listeners;
pub mod logging;
pub mod markup;
pub mod model;
pub mod registry;
pub mod services;
pub mod style;
pub mod surface;
pub mod tui;
pub mod validation;

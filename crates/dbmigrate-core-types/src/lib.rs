//! Core types shared across dbmigrate facilities
//!
//! This crate provides the canonical field keys and event names used by the
//! error and logging facilities, so every layer emits the same schema.

pub mod schema;

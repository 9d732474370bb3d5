//! Relational store for statement rows, prices and profiles.

pub mod sqlite;

pub use sqlite::{SqliteStore, StoreStats};

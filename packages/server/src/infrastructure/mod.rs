//! Infrastructure layer: storage, connections and wire formats.

pub mod connection;
pub mod dto;
pub mod repository;
pub mod store;

//! Infrastructure layer: storage for live connections and HTTP DTOs.

pub mod dto;
pub mod repository;

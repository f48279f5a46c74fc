//! Diagram module: three-layer architecture (domain, repository, service).
//!
//! The service layer is the coordinator sequencing metadata and blob
//! operations into one logical entity operation.

pub mod domain;
pub mod object_key;
pub mod errors;
pub mod repository;
pub mod repo;
pub mod service;

pub use service::DiagramService;

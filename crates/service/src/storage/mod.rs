//! Storage abstractions for the service layer
//!
//! Contains the reusable file-backed array store shared by the collection
//! services that persist small JSON documents.

pub mod json_array_store;

//! Service layer: in-memory collections with write-through JSON file
//! persistence.
//! - `storage` holds the generic array-file store.
//! - `accounts` and `catalog` expose the business operations on users
//!   and items built on top of it.

pub mod accounts;
pub mod catalog;
pub mod errors;
pub mod storage;

//! Service layer providing business-oriented operations on top of models.
//! - `storage` holds the blob store client and its backends.
//! - `diagram` coordinates the relational and blob halves of a diagram into
//!   single logical create/read/update/delete operations.

pub mod storage;
pub mod diagram;

//! Database module: the module state table and the actor that owns it.
//!
//! Layout:
//! - `models.rs`: Rust structs mirroring DB rows
//! - `schema.rs`: SQL DDL for initializing the database (SQLite-first)
//! - `patch.rs`: create/patch payloads and the `DbPatchable` contract
//! - `actor.rs`: ractor actor serialising all access to the pool

pub mod actor;
pub mod models;
pub mod patch;
pub mod schema;

mod patch_impl;

pub use models::DbModuleState;
pub use patch::{DbPatchable, ModuleStateCreate, ModuleStatePatch};
pub use schema::SQLITE_INIT;

pub use actor::{DbActorHandle, OpenMode, spawn, spawn_read_only, spawn_with};

//! # Slotbook Core
//!
//! Domain types and logic for the slot booking engine. This crate is
//! free of I/O: it defines the slot and schedule models, the error
//! taxonomy shared by the storage and API layers, the pure expansion of
//! recurring weekly schedules into concrete slots, and the contract for
//! the profile-lookup collaborator service.

pub mod errors;
pub mod expand;
pub mod models;
pub mod profile;

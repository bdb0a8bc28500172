//! Domain types and pure logic for SharedVisions.
//!
//! Prompt assembly, member-mention parsing, invite codes, lifecycle status,
//! and input limits. Apart from the environment helpers in [`config`],
//! nothing here performs I/O.

pub mod aesthetic;
pub mod config;
pub mod error;
pub mod invite;
pub mod limits;
pub mod members;
pub mod prompt;
pub mod status;
pub mod style;
pub mod types;

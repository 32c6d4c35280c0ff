// ABOUTME: Validated domain types shared across the crate.
// ABOUTME: Team numbers and the addresses derived from them.

mod address;
mod team;

pub use address::{Strategy, TargetAddress, USB_HOST};
pub use team::TeamNumber;

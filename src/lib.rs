//! Core of a vertical shooter with a score-funded upgrade economy.
//!
//! The library holds the simulation (`compute`, `spawner`, `shooter`,
//! `collision`), the economy (`upgrades`, `economy`), persistence (`save`)
//! and configuration.  Terminal I/O lives in the binary.

pub mod collision;
pub mod compute;
pub mod config;
pub mod economy;
pub mod entities;
pub mod error;
pub mod math;
pub mod rules;
pub mod save;
pub mod shooter;
pub mod spawner;
pub mod upgrades;

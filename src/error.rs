/// Error types for the parts of the game that touch the outside world, plus
/// the rejection reasons of the upgrade shop.  A rejected purchase leaves the
/// state it was given untouched.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::upgrades::UpgradeKind;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to encode save data: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum PurchaseRejected {
    #[error("the upgrade screen is not open")]
    ShopClosed,

    #[error("{0} is not sold in this mode")]
    NotOffered(UpgradeKind),

    #[error("{0} is already at its highest level")]
    MaxLevel(UpgradeKind),

    #[error("not enough score: need {cost}, have {score}")]
    InsufficientScore { cost: u64, score: u64 },
}

pub type StoreResult<T> = Result<T, StoreError>;

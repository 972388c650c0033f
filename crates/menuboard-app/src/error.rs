// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use thiserror::Error;

/// Everything that can keep a menu from being shown.
///
/// All variants are handled the same way by a page session: the menu area
/// switches to its "currently unavailable" presentation. The payloads are
/// plain strings so one cached failure can be cloned to every waiter.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FeedError {
    #[error("fetch menu feed: {0}")]
    Fetch(String),

    #[error("menu feed reported failure: {0}")]
    Source(String),

    #[error("parse menu feed: {0}")]
    Parse(String),

    #[error("menu feed has no categories")]
    EmptyCatalog,
}

impl FeedError {
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Fetch(_) => "fetch",
            Self::Source(_) => "source",
            Self::Parse(_) => "parse",
            Self::EmptyCatalog => "empty_catalog",
        }
    }
}

pub type FeedResult<T> = std::result::Result<T, FeedError>;

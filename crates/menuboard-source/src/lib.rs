// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

mod cache;
mod decode;

pub use cache::{FeedFetcher, FetchCache, SharedFeed};
pub use decode::{
    DecodedFeed, FeedFormat, FeedSnapshot, decode_feed, detect_format, parse_csv, parse_envelope,
};

use anyhow::{Context, Result};
use menuboard_app::{FeedError, FeedResult};
use reqwest::StatusCode;
use reqwest::blocking::Client as HttpClient;
use reqwest::header::CONTENT_TYPE;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

/// Published demo sheet used when the host supplies no feed URL.
pub const DEMO_SHEET_URL: &str = "https://docs.google.com/spreadsheets/d/e/2PACX-1vSS9YRIvTPo-Gd_gWj2hBJbxlrK5Z4qfZzHR2AJUlbokJlLVqSrYxU2DPr3ZgR3S0aQxITWbGUQ5fQ9/pub?output=csv";

const USER_AGENT: &str = concat!("menuboard/", env!("CARGO_PKG_VERSION"));

/// Where a feed lives. Anything that is not an http(s) URL is read from disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedLocation {
    Remote(Url),
    Local(PathBuf),
}

impl FeedLocation {
    pub fn parse(raw: &str) -> FeedResult<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(FeedError::Fetch("feed location is empty".to_owned()));
        }

        match Url::parse(trimmed) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => Ok(Self::Remote(url)),
            Ok(url) if url.scheme() == "file" => url
                .to_file_path()
                .map(Self::Local)
                .map_err(|()| FeedError::Fetch(format!("invalid file URL {trimmed:?}"))),
            Ok(url) if url.scheme().len() > 1 => Err(FeedError::Fetch(format!(
                "unsupported feed scheme {:?} in {trimmed:?}; use http(s) or a file path",
                url.scheme()
            ))),
            _ => Ok(Self::Local(PathBuf::from(trimmed))),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Client {
    timeout: Duration,
    http: HttpClient,
}

impl Client {
    pub fn new(timeout: Duration) -> Result<Self> {
        let http = HttpClient::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .context("build HTTP client")?;
        Ok(Self { timeout, http })
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn fetch(&self, location: &str) -> FeedResult<FeedSnapshot> {
        let decoded = match FeedLocation::parse(location)? {
            FeedLocation::Remote(url) => self.fetch_remote(&url)?,
            FeedLocation::Local(path) => read_local(&path)?,
        };

        tracing::info!(
            location,
            format = decoded.format.as_str(),
            rows = decoded.rows.len(),
            "fetched menu feed"
        );
        Ok(FeedSnapshot {
            location: location.to_owned(),
            format: decoded.format,
            rows: decoded.rows,
            published_at: decoded.published_at,
            source: decoded.source,
        })
    }

    fn fetch_remote(&self, url: &Url) -> FeedResult<DecodedFeed> {
        let response = self
            .http
            .get(url.as_str())
            .send()
            .map_err(|error| connection_error(url, error))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(clean_error_response(status, &body));
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned);
        let body = response
            .text()
            .map_err(|error| FeedError::Fetch(format!("read response from {url}: {error}")))?;
        decode_feed(&body, content_type.as_deref())
    }
}

impl FeedFetcher for Client {
    fn fetch(&self, location: &str) -> FeedResult<FeedSnapshot> {
        Client::fetch(self, location)
    }
}

fn read_local(path: &Path) -> FeedResult<DecodedFeed> {
    let body = fs::read_to_string(path)
        .map_err(|error| FeedError::Fetch(format!("read feed file {}: {error}", path.display())))?;
    let content_type = path
        .extension()
        .and_then(|ext| ext.to_str())
        .filter(|ext| ext.eq_ignore_ascii_case("json"))
        .map(|_| "application/json");
    decode_feed(&body, content_type)
}

fn connection_error(url: &Url, error: reqwest::Error) -> FeedError {
    let host = url.host_str().unwrap_or("feed host");
    if error.is_timeout() {
        return FeedError::Fetch(format!("timed out waiting for {host}"));
    }
    FeedError::Fetch(format!("cannot reach {host} ({error})"))
}

fn clean_error_response(status: StatusCode, body: &str) -> FeedError {
    let trimmed = body.trim();
    if !trimmed.is_empty() && trimmed.len() < 100 && !trimmed.contains('<') {
        return FeedError::Fetch(format!("server error ({}): {trimmed}", status.as_u16()));
    }
    FeedError::Fetch(format!("server returned {}", status.as_u16()))
}

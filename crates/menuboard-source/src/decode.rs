// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use menuboard_app::{FEED_COLUMNS, FeedError, FeedResult, MenuRow};
use serde::Deserialize;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedFormat {
    Csv,
    JsonEnvelope,
}

impl FeedFormat {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::JsonEnvelope => "json",
        }
    }
}

/// Rows from one successful fetch, in source order.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedSnapshot {
    pub location: String,
    pub format: FeedFormat,
    pub rows: Vec<MenuRow>,
    pub published_at: Option<OffsetDateTime>,
    pub source: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DecodedFeed {
    pub format: FeedFormat,
    pub rows: Vec<MenuRow>,
    pub published_at: Option<OffsetDateTime>,
    pub source: Option<String>,
}

pub fn detect_format(body: &str, content_type: Option<&str>) -> FeedFormat {
    let declared_json = content_type
        .map(|value| value.to_ascii_lowercase().contains("json"))
        .unwrap_or(false);
    if declared_json || strip_bom(body).trim_start().starts_with('{') {
        FeedFormat::JsonEnvelope
    } else {
        FeedFormat::Csv
    }
}

pub fn decode_feed(body: &str, content_type: Option<&str>) -> FeedResult<DecodedFeed> {
    match detect_format(body, content_type) {
        FeedFormat::Csv => Ok(DecodedFeed {
            format: FeedFormat::Csv,
            rows: parse_csv(body)?,
            published_at: None,
            source: None,
        }),
        FeedFormat::JsonEnvelope => parse_envelope(body),
    }
}

/// Header-keyed CSV. Headers are trimmed and rows may be ragged.
pub fn parse_csv(body: &str) -> FeedResult<Vec<MenuRow>> {
    let body = strip_bom(body);
    if body.trim_start().starts_with('<') {
        return Err(FeedError::Parse(
            "received HTML instead of CSV; is the sheet published to the web?".to_owned(),
        ));
    }

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(body.as_bytes());

    let headers = reader
        .headers()
        .map_err(|error| FeedError::Parse(format!("read CSV header: {error}")))?
        .clone();
    if !headers.iter().any(|header| FEED_COLUMNS.contains(&header)) {
        return Err(FeedError::Parse(format!(
            "CSV header has none of the menu columns ({})",
            FEED_COLUMNS.join(", ")
        )));
    }

    let mut rows = Vec::new();
    for (index, record) in reader.records().enumerate() {
        let record = record
            .map_err(|error| FeedError::Parse(format!("read CSV row {}: {error}", index + 2)))?;
        if record.iter().all(|cell| cell.trim().is_empty()) {
            continue;
        }
        rows.push(MenuRow::from_pairs(headers.iter().zip(record.iter())));
    }
    Ok(rows)
}

#[derive(Debug, Deserialize)]
struct Envelope {
    success: bool,
    #[serde(default)]
    data: Option<Vec<MenuRow>>,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    timestamp: Option<String>,
    #[serde(default)]
    source: Option<String>,
}

/// `{ success, data, error?, timestamp, source? }` as published by the
/// spreadsheet proxy. `success: false` is a source failure.
pub fn parse_envelope(body: &str) -> FeedResult<DecodedFeed> {
    let envelope: Envelope = serde_json::from_str(strip_bom(body))
        .map_err(|error| FeedError::Parse(format!("decode JSON envelope: {error}")))?;

    if !envelope.success {
        let message = envelope
            .error
            .filter(|message| !message.trim().is_empty())
            .unwrap_or_else(|| "no error message".to_owned());
        return Err(FeedError::Source(message));
    }

    let rows = envelope
        .data
        .ok_or_else(|| FeedError::Parse("JSON envelope has no data array".to_owned()))?;

    let published_at = envelope.timestamp.as_deref().and_then(|raw| {
        OffsetDateTime::parse(raw, &Rfc3339)
            .inspect_err(|error| {
                tracing::debug!(timestamp = raw, %error, "ignoring unparsable feed timestamp");
            })
            .ok()
    });

    Ok(DecodedFeed {
        format: FeedFormat::JsonEnvelope,
        rows,
        published_at,
        source: envelope.source,
    })
}

fn strip_bom(body: &str) -> &str {
    body.strip_prefix('\u{feff}').unwrap_or(body)
}

// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use url::Url;

use crate::ids::CategoryId;
use crate::model::Catalog;

pub const MENU_QUERY_PARAM: &str = "menu";

/// Reads the `menu=<category>` query parameter from a page URL.
///
/// Accepts absolute URLs as well as bare paths or query strings
/// (`/menu?menu=Food`, `?menu=Food`).
pub fn deep_link_category(page_url: &str) -> Option<String> {
    let trimmed = page_url.trim();
    if trimmed.is_empty() {
        return None;
    }

    let parsed = Url::parse(trimmed)
        .or_else(|_| Url::parse("http://localhost/").and_then(|base| base.join(trimmed)));
    let parsed = match parsed {
        Ok(url) => url,
        Err(error) => {
            tracing::debug!(page_url = trimmed, %error, "ignoring unparsable page URL");
            return None;
        }
    };

    parsed
        .query_pairs()
        .find(|(key, _)| key == MENU_QUERY_PARAM)
        .map(|(_, value)| value.into_owned())
        .filter(|value| !value.trim().is_empty())
}

/// Initial active tab: the deep-linked category when it names a known one,
/// otherwise the first tab.
pub fn initial_selection(catalog: &Catalog, requested: Option<&str>) -> CategoryId {
    requested
        .and_then(|name| catalog.find(name))
        .unwrap_or_else(|| catalog.first())
}

/// Link target for a category tab on another page.
pub fn category_link(menu_page: &str, category: &str) -> String {
    let encoded: String = url::form_urlencoded::Serializer::new(String::new())
        .append_pair(MENU_QUERY_PARAM, category)
        .finish();
    let separator = if menu_page.contains('?') { '&' } else { '?' };
    format!("{menu_page}{separator}{encoded}")
}

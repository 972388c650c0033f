// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::dom::Element;

/// Known search-engine and link-preview agents, matched as lowercase
/// substrings of the user agent.
pub const DEFAULT_CRAWLERS: [&str; 16] = [
    "googlebot",
    "bingbot",
    "slurp",
    "duckduckbot",
    "baiduspider",
    "yandexbot",
    "facebookexternalhit",
    "twitterbot",
    "rogerbot",
    "linkedinbot",
    "embedly",
    "quora link preview",
    "showyoubot",
    "outbrain",
    "pinterest",
    "developers.google.com/+/web/snippet",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlerPolicy {
    patterns: Vec<String>,
}

impl Default for CrawlerPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_CRAWLERS)
    }
}

impl CrawlerPolicy {
    pub fn new<I, S>(patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut policy = Self {
            patterns: Vec::new(),
        };
        policy.extend(patterns);
        policy
    }

    pub fn extend<I, S>(&mut self, patterns: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for pattern in patterns {
            let pattern = pattern.as_ref().trim().to_lowercase();
            if !pattern.is_empty() && !self.patterns.contains(&pattern) {
                self.patterns.push(pattern);
            }
        }
    }

    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    pub fn is_bot(&self, user_agent: &str) -> bool {
        let agent = user_agent.to_lowercase();
        self.patterns
            .iter()
            .any(|pattern| agent.contains(pattern.as_str()))
    }
}

/// Script-free "there is a menu here" content. Stands on its own when no
/// feed ever arrives.
pub fn static_fallback_markup() -> Element {
    Element::new("div")
        .with_class("static-menu-content")
        .with_child(Element::new("h1").with_text("Menu"))
        .with_child(Element::new("p").with_text("Explore our selection of food and beverages."))
        .with_child(section(
            Element::new("h2").with_text("Menu Categories"),
            "Our menu features various categories of items to choose from.",
        ))
        .with_child(section(
            Element::new("h3").with_text("Quality Food & Beverages"),
            "Browse our complete menu selection featuring various food and drink options.",
        ))
        .with_child(
            Element::new("noscript").with_child(
                Element::new("div")
                    .with_class("noscript-menu")
                    .with_child(Element::new("h3").with_text("Enable JavaScript for Full Menu"))
                    .with_child(Element::new("p").with_text(
                        "Please enable JavaScript in your browser to view our complete \
                         interactive menu with prices and detailed descriptions.",
                    )),
            ),
        )
}

fn section(heading: Element, body: &str) -> Element {
    Element::new("div")
        .with_class("menu-section")
        .with_child(heading)
        .with_child(Element::new("p").with_text(body))
}

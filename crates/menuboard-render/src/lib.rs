// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

pub mod crawler;
pub mod document;
pub mod dom;
pub mod engine;
pub mod seo;
pub mod view;

pub use crawler::{CrawlerPolicy, DEFAULT_CRAWLERS, static_fallback_markup};
pub use document::{host_container, page};
pub use dom::{Element, Node};
pub use engine::{Renderer, render_category, render_item, render_tabs, render_unavailable};
pub use seo::{Head, SeoOptions, emit as emit_seo, ensure_baseline, normalize_price};
pub use view::MenuView;

// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use menuboard_app::{
    Catalog, CategoryId, FeedError, FeedResult, TabCommand, TabController, TabStrip,
    deep_link_category, initial_selection,
};
use menuboard_render::{
    Element, Head, MenuView, emit_seo, ensure_baseline, host_container, page,
    static_fallback_markup,
};
use menuboard_source::{FeedFetcher, FeedFormat, FeedSnapshot, FetchCache};
use menuboard_testkit::MenuFaker;
use std::sync::Arc;
use std::thread::JoinHandle;
use time::OffsetDateTime;

use crate::config::{Config, MenuMode};

pub const DEMO_LOCATION: &str = "demo";
const PAGE_TITLE: &str = "Menu";

/// Serves a generated menu without touching the network.
#[derive(Debug, Clone, Copy)]
pub struct DemoFetcher {
    seed: u64,
}

impl Default for DemoFetcher {
    fn default() -> Self {
        Self { seed: 2026 }
    }
}

impl FeedFetcher for DemoFetcher {
    fn fetch(&self, location: &str) -> FeedResult<FeedSnapshot> {
        Ok(FeedSnapshot {
            location: location.to_owned(),
            format: FeedFormat::Csv,
            rows: MenuFaker::new(self.seed).menu(),
            published_at: Some(OffsetDateTime::now_utc()),
            source: Some("demo".to_owned()),
        })
    }
}

/// One page view. The feed fetch starts as soon as the session exists and is
/// adopted by the first `catalog` call.
pub struct Session<F> {
    cache: Arc<FetchCache<F>>,
    location: String,
    early: Option<JoinHandle<()>>,
}

impl<F: FeedFetcher + 'static> Session<F> {
    pub fn start(fetcher: F, location: &str) -> Self {
        let cache = Arc::new(FetchCache::new(fetcher));
        let early = cache.prefetch(location);
        tracing::debug!(location, "started early menu fetch");
        Self {
            cache,
            location: location.to_owned(),
            early,
        }
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn snapshot(&self) -> FeedResult<Arc<FeedSnapshot>> {
        self.cache.fetch(&self.location)
    }

    pub fn catalog(&self) -> FeedResult<(Arc<FeedSnapshot>, Catalog)> {
        let snapshot = self.snapshot()?;
        let catalog = Catalog::build(&snapshot.rows)?;
        Ok((snapshot, catalog))
    }
}

impl<F> Drop for Session<F> {
    fn drop(&mut self) {
        if let Some(handle) = self.early.take()
            && handle.join().is_err()
        {
            tracing::warn!("early menu fetch thread panicked");
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageRequest {
    pub page_url: Option<String>,
    pub menu: Option<String>,
    pub user_agent: Option<String>,
}

impl PageRequest {
    /// `--menu` wins over the page URL's `menu=` parameter.
    pub fn requested_category(&self) -> Option<String> {
        self.menu
            .clone()
            .filter(|name| !name.trim().is_empty())
            .or_else(|| self.page_url.as_deref().and_then(deep_link_category))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Disabled,
    Menu {
        active: String,
        categories: usize,
        items: usize,
    },
    Teaser {
        categories: usize,
    },
    Unavailable(FeedError),
}

#[derive(Debug, Clone, PartialEq)]
pub struct PageOutput {
    pub head: Head,
    pub container: Element,
    pub bot: bool,
    pub outcome: Outcome,
}

impl PageOutput {
    pub fn document(&self) -> String {
        page(PAGE_TITLE, &self.head, &self.container)
    }
}

/// Host has the menu switched off: crawler content only, nothing fetched.
pub fn render_disabled() -> PageOutput {
    PageOutput {
        head: Head::new(),
        container: host_container(static_fallback_markup()),
        bot: false,
        outcome: Outcome::Disabled,
    }
}

pub fn render_page<F: FeedFetcher + 'static>(
    config: &Config,
    session: &Session<F>,
    request: &PageRequest,
) -> PageOutput {
    let bot = request
        .user_agent
        .as_deref()
        .is_some_and(|agent| config.crawler_policy().is_bot(agent));
    let existing = bot.then(static_fallback_markup);
    let mut head = Head::new();

    let built = session.catalog();
    let (view, outcome) = match (config.mode(), built) {
        (MenuMode::Teaser, Ok((_, catalog))) => {
            let view = MenuView::teaser(&catalog, config.menu_page(), existing);
            emit_seo(&catalog, &mut head, &config.seo_options());
            (
                view,
                Outcome::Teaser {
                    categories: catalog.len(),
                },
            )
        }
        (MenuMode::Full, Ok((snapshot, catalog))) => {
            let mut view = MenuView::mount(config.style(), existing);
            let active = load_catalog(config, &catalog, &mut view, request);
            emit_seo(&catalog, &mut head, &config.seo_options());
            tracing::info!(
                location = %snapshot.location,
                categories = catalog.len(),
                items = catalog.item_count(),
                "rendered menu"
            );
            (
                view,
                Outcome::Menu {
                    active,
                    categories: catalog.len(),
                    items: catalog.item_count(),
                },
            )
        }
        (_, Err(error)) => {
            tracing::warn!(location = session.location(), %error, "menu unavailable");
            let mut view = MenuView::mount(config.style(), existing);
            view.show_unavailable();
            (view, Outcome::Unavailable(error))
        }
    };
    ensure_baseline(&mut head);

    PageOutput {
        head,
        container: host_container(view.into_element()),
        bot,
        outcome,
    }
}

fn load_catalog(
    config: &Config,
    catalog: &Catalog,
    view: &mut MenuView,
    request: &PageRequest,
) -> String {
    let requested = request.requested_category();
    let initial = initial_selection(catalog, requested.as_deref());
    let mut controller = controller_for(config);
    let events = controller.dispatch(TabCommand::Load {
        initial,
        strip: page_strip(config, catalog),
    });
    view.show_catalog(catalog, &events);
    active_name(catalog, controller.displayed().unwrap_or(initial))
}

pub fn controller_for(config: &Config) -> TabController {
    let delay = config.switch_delay().unwrap_or(menuboard_app::DEFAULT_SWITCH_DELAY);
    TabController::new(delay, config.scroll_offset_percent())
}

pub fn page_strip(config: &Config, catalog: &Catalog) -> TabStrip {
    TabStrip::full_width(
        config.tab_metrics().estimate(catalog.names()),
        config.viewport_width(),
    )
}

fn active_name(catalog: &Catalog, id: CategoryId) -> String {
    catalog
        .category(id)
        .map(|category| category.name.clone())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::{DemoFetcher, Outcome, PageRequest, Session, render_disabled, render_page};
    use crate::config::{Config, MenuMode};
    use anyhow::{Result, anyhow};
    use menuboard_app::{FeedError, FeedResult};
    use menuboard_source::{Client, FeedFetcher, FeedFormat, FeedSnapshot};
    use menuboard_testkit::{csv_feed, sample_rows};
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::thread;
    use std::time::Duration;
    use tiny_http::{Header, Response, Server};

    struct StaticFetcher {
        result: FeedResult<Vec<menuboard_app::MenuRow>>,
        calls: Arc<AtomicUsize>,
    }

    impl StaticFetcher {
        fn rows(rows: Vec<menuboard_app::MenuRow>) -> Self {
            Self {
                result: Ok(rows),
                calls: Arc::new(AtomicUsize::new(0)),
            }
        }

        fn failing(error: FeedError) -> Self {
            Self {
                result: Err(error),
                calls: Arc::new(AtomicUsize::new(0)),
            }
        }
    }

    impl FeedFetcher for StaticFetcher {
        fn fetch(&self, location: &str) -> FeedResult<FeedSnapshot> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let rows = self.result.clone()?;
            Ok(FeedSnapshot {
                location: location.to_owned(),
                format: FeedFormat::Csv,
                rows,
                published_at: None,
                source: None,
            })
        }
    }

    const BROWSER: &str =
        "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 Chrome/126.0 Safari/537.36";

    #[test]
    fn human_visitor_gets_interactive_menu() {
        let session = Session::start(StaticFetcher::rows(sample_rows()), "https://example.com/a");
        let output = render_page(
            &Config::default(),
            &session,
            &PageRequest {
                user_agent: Some(BROWSER.to_owned()),
                ..PageRequest::default()
            },
        );

        assert!(!output.bot);
        assert_eq!(
            output.outcome,
            Outcome::Menu {
                active: "Drinks".to_owned(),
                categories: 2,
                items: 5,
            }
        );
        let html = output.document();
        assert!(html.contains("layout--modern"));
        assert!(!html.contains("static-menu-content"));
        assert!(html.contains("application/ld+json"));
        assert!(html.contains("Our menu features: Drinks, Food."));
        assert!(html.contains("restaurant.menu"));
    }

    #[test]
    fn crawler_gets_static_content_alongside_menu() {
        let session = Session::start(StaticFetcher::rows(sample_rows()), "https://example.com/a");
        let output = render_page(
            &Config::default(),
            &session,
            &PageRequest {
                user_agent: Some("Mozilla/5.0 (compatible; bingbot/2.0)".to_owned()),
                ..PageRequest::default()
            },
        );
        assert!(output.bot);
        let html = output.document();
        assert!(html.contains("static-menu-content"));
        assert!(html.contains("menu-item"));
        assert!(!html.contains("Loading menu options..."));
    }

    #[test]
    fn deep_link_and_menu_flag_pick_the_initial_tab() {
        let session = Session::start(StaticFetcher::rows(sample_rows()), "https://example.com/a");
        let from_url = render_page(
            &Config::default(),
            &session,
            &PageRequest {
                page_url: Some("https://example.com/menu?menu=FOOD".to_owned()),
                ..PageRequest::default()
            },
        );
        assert!(matches!(from_url.outcome, Outcome::Menu { ref active, .. } if active == "Food"));

        let flag_wins = render_page(
            &Config::default(),
            &session,
            &PageRequest {
                page_url: Some("https://example.com/menu?menu=food".to_owned()),
                menu: Some("drinks".to_owned()),
                ..PageRequest::default()
            },
        );
        assert!(
            matches!(flag_wins.outcome, Outcome::Menu { ref active, .. } if active == "Drinks")
        );
    }

    #[test]
    fn failed_fetch_renders_unavailable_with_baseline_seo() {
        let error = FeedError::Fetch("cannot reach docs.google.com".to_owned());
        let session = Session::start(StaticFetcher::failing(error.clone()), "https://example.com/a");
        let output = render_page(
            &Config::default(),
            &session,
            &PageRequest {
                user_agent: Some("Googlebot/2.1".to_owned()),
                ..PageRequest::default()
            },
        );

        assert_eq!(output.outcome, Outcome::Unavailable(error));
        let html = output.document();
        assert!(html.contains("Menu Currently Unavailable"));
        assert!(html.contains("Explore our selection of food and beverages."));
        assert!(html.contains("Browse our menu featuring quality food and beverage options."));
        assert!(!html.contains("application/ld+json"));
    }

    #[test]
    fn failed_fetch_for_visitor_shows_only_unavailable_notice() {
        let error = FeedError::Fetch("cannot reach docs.google.com".to_owned());
        let session = Session::start(StaticFetcher::failing(error.clone()), "https://example.com/a");
        let output = render_page(
            &Config::default(),
            &session,
            &PageRequest {
                user_agent: Some(BROWSER.to_owned()),
                ..PageRequest::default()
            },
        );

        assert!(!output.bot);
        assert_eq!(output.outcome, Outcome::Unavailable(error));
        let fallback = output
            .container
            .by_class("menu-fallback-content")
            .expect("loading notice mounted");
        assert!(fallback.is_hidden());
        let spinner = output
            .container
            .by_class("sh-loading-spinner")
            .expect("spinner mounted");
        assert!(spinner.is_hidden());
        assert!(output.document().contains("Menu Currently Unavailable"));
    }

    #[test]
    fn empty_feed_renders_unavailable() {
        let session = Session::start(StaticFetcher::rows(Vec::new()), "https://example.com/a");
        let output = render_page(&Config::default(), &session, &PageRequest::default());
        assert_eq!(output.outcome, Outcome::Unavailable(FeedError::EmptyCatalog));
    }

    #[test]
    fn teaser_mode_links_tabs_to_menu_page() {
        let mut config = Config::default();
        config.menu.mode = Some(MenuMode::Teaser);
        config.menu.menu_page = Some("/food-and-drink".to_owned());
        let session = Session::start(StaticFetcher::rows(sample_rows()), "https://example.com/a");
        let output = render_page(&config, &session, &PageRequest::default());

        assert_eq!(output.outcome, Outcome::Teaser { categories: 2 });
        let html = output.document();
        assert!(html.contains("href=\"/food-and-drink?menu=Drinks\""));
        assert!(html.contains("View Our Menu"));
        assert!(!html.contains("menu-item"));
    }

    #[test]
    fn crawler_gets_static_content_in_teaser_mode() {
        let mut config = Config::default();
        config.menu.mode = Some(MenuMode::Teaser);
        let session = Session::start(StaticFetcher::rows(sample_rows()), "https://example.com/a");
        let output = render_page(
            &config,
            &session,
            &PageRequest {
                user_agent: Some("facebookexternalhit/1.1".to_owned()),
                ..PageRequest::default()
            },
        );

        assert!(output.bot);
        assert_eq!(output.outcome, Outcome::Teaser { categories: 2 });
        let html = output.document();
        assert!(html.contains("static-menu-content"));
        assert!(html.contains("href=\"/menu?menu=Food\""));
    }

    #[test]
    fn disabled_host_gets_static_content_only() {
        let output = render_disabled();
        assert_eq!(output.outcome, Outcome::Disabled);
        let html = output.document();
        assert!(html.contains("static-menu-content"));
        assert!(!html.contains("menuTabs"));
    }

    #[test]
    fn session_fetches_each_location_once() {
        let fetcher = StaticFetcher::rows(sample_rows());
        let calls = Arc::clone(&fetcher.calls);
        let session = Session::start(fetcher, "https://example.com/a");
        for _ in 0..3 {
            let _ = render_page(&Config::default(), &session, &PageRequest::default());
        }
        drop(session);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn demo_fetcher_builds_a_menu() {
        let session = Session::start(DemoFetcher::default(), super::DEMO_LOCATION);
        let (snapshot, catalog) = session.catalog().expect("demo catalog");
        assert_eq!(snapshot.source.as_deref(), Some("demo"));
        assert!(catalog.len() >= 2);
    }

    #[test]
    fn early_fetch_is_adopted_over_http() -> Result<()> {
        let server =
            Server::http("127.0.0.1:0").map_err(|error| anyhow!("start mock server: {error}"))?;
        let url = format!("http://{}/pub?output=csv", server.server_addr());
        let body = csv_feed(&sample_rows())?;
        let requests = Arc::new(AtomicUsize::new(0));

        let handle = {
            let requests = Arc::clone(&requests);
            thread::spawn(move || {
                let request = server.recv().expect("request expected");
                requests.fetch_add(1, Ordering::SeqCst);
                thread::sleep(Duration::from_millis(100));
                let response = Response::from_string(body).with_header(
                    Header::from_bytes("Content-Type", "text/csv")
                        .expect("valid content type header"),
                );
                request.respond(response).expect("response should succeed");
                if let Ok(Some(_)) = server.recv_timeout(Duration::from_millis(300)) {
                    requests.fetch_add(1, Ordering::SeqCst);
                }
            })
        };

        let session = Session::start(Client::new(Duration::from_secs(2))?, &url);
        let output = render_page(&Config::default(), &session, &PageRequest::default());
        drop(session);
        handle.join().expect("server thread should join");

        assert!(matches!(output.outcome, Outcome::Menu { .. }));
        assert_eq!(requests.load(Ordering::SeqCst), 1);
        Ok(())
    }
}

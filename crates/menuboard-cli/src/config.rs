// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow, bail};
use menuboard_app::{DEFAULT_SCROLL_OFFSET_PERCENT, TabMetrics};
use menuboard_render::{CrawlerPolicy, DEFAULT_CRAWLERS, SeoOptions};
use menuboard_source::DEMO_SHEET_URL;
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

const APP_NAME: &str = "menuboard";
const CONFIG_VERSION: i64 = 1;
const DEFAULT_STYLE: &str = "Modern";
const DEFAULT_MENU_PAGE: &str = "/menu";
const DEFAULT_TIMEOUT: &str = "10s";
const DEFAULT_SWITCH_DELAY: &str = "300ms";
const DEFAULT_VIEWPORT_WIDTH: f64 = 390.0;
const DEFAULT_CURRENCY: &str = "USD";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub version: i64,
    #[serde(default)]
    pub menu: Menu,
    #[serde(default)]
    pub source: Source,
    #[serde(default)]
    pub transition: Transition,
    #[serde(default)]
    pub layout: Layout,
    #[serde(default)]
    pub crawler: Crawler,
    #[serde(default)]
    pub seo: Seo,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            menu: Menu::default(),
            source: Source::default(),
            transition: Transition::default(),
            layout: Layout::default(),
            crawler: Crawler::default(),
            seo: Seo::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MenuMode {
    Full,
    Teaser,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Menu {
    pub enabled: Option<bool>,
    pub style: Option<String>,
    pub sheet_url: Option<String>,
    pub mode: Option<MenuMode>,
    pub menu_page: Option<String>,
}

impl Default for Menu {
    fn default() -> Self {
        Self {
            enabled: Some(true),
            style: Some(DEFAULT_STYLE.to_owned()),
            sheet_url: None,
            mode: Some(MenuMode::Full),
            menu_page: Some(DEFAULT_MENU_PAGE.to_owned()),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Source {
    pub timeout: Option<String>,
}

impl Default for Source {
    fn default() -> Self {
        Self {
            timeout: Some(DEFAULT_TIMEOUT.to_owned()),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Transition {
    pub switch_delay: Option<String>,
}

impl Default for Transition {
    fn default() -> Self {
        Self {
            switch_delay: Some(DEFAULT_SWITCH_DELAY.to_owned()),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Layout {
    pub viewport_width: Option<f64>,
    pub char_width: Option<f64>,
    pub tab_padding: Option<f64>,
    pub scroll_offset_percent: Option<f64>,
}

impl Default for Layout {
    fn default() -> Self {
        let metrics = TabMetrics::default();
        Self {
            viewport_width: Some(DEFAULT_VIEWPORT_WIDTH),
            char_width: Some(metrics.char_width),
            tab_padding: Some(metrics.tab_padding),
            scroll_offset_percent: Some(DEFAULT_SCROLL_OFFSET_PERCENT),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Crawler {
    pub user_agents: Option<Vec<String>>,
    pub extra_user_agents: Option<Vec<String>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Seo {
    pub currency: Option<String>,
    pub structured_data: Option<bool>,
}

impl Default for Seo {
    fn default() -> Self {
        Self {
            currency: Some(DEFAULT_CURRENCY.to_owned()),
            structured_data: Some(true),
        }
    }
}

impl Config {
    pub fn default_path() -> Result<PathBuf> {
        if let Some(path) = env::var_os("MENUBOARD_CONFIG_PATH") {
            return Ok(PathBuf::from(path));
        }

        let config_root = dirs::config_dir().ok_or_else(|| {
            anyhow!("cannot resolve config directory; set MENUBOARD_CONFIG_PATH to the config file")
        })?;
        Ok(config_root.join(APP_NAME).join("config.toml"))
    }

    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }

        let raw = fs::read_to_string(path)
            .with_context(|| format!("read config file {}", path.display()))?;
        let value: toml::Value = toml::from_str(&raw)
            .with_context(|| format!("parse TOML config {}", path.display()))?;

        let version = value
            .get("version")
            .and_then(toml::Value::as_integer)
            .ok_or_else(|| {
                anyhow!(
                    "config file {} is not versioned. Add `version = 1` and put values under [menu], [source], [transition], [layout], [crawler], and [seo]",
                    path.display()
                )
            })?;

        if version != CONFIG_VERSION {
            bail!(
                "unsupported config version {} in {}; expected version = 1",
                version,
                path.display()
            );
        }

        let config: Config = value
            .try_into()
            .with_context(|| format!("decode config {}", path.display()))?;
        config.validate(path)?;
        Ok(config)
    }

    fn validate(&self, path: &Path) -> Result<()> {
        if let Some(sheet_url) = &self.menu.sheet_url {
            validate_feed_url(sheet_url)
                .with_context(|| format!("menu.sheet_url in {}", path.display()))?;
        }

        if let Some(menu_page) = &self.menu.menu_page
            && menu_page.trim().is_empty()
        {
            bail!("menu.menu_page in {} must not be empty", path.display());
        }

        for (key, value) in [
            ("source.timeout", &self.source.timeout),
            ("transition.switch_delay", &self.transition.switch_delay),
        ] {
            if let Some(raw) = value {
                let parsed = parse_duration(raw)
                    .with_context(|| format!("{key} in {}", path.display()))?;
                if parsed <= Duration::ZERO {
                    bail!("{key} in {} must be positive, got {raw}", path.display());
                }
            }
        }

        for (key, value) in [
            ("layout.viewport_width", self.layout.viewport_width),
            ("layout.char_width", self.layout.char_width),
            ("layout.tab_padding", self.layout.tab_padding),
        ] {
            if let Some(width) = value
                && !(width.is_finite() && width > 0.0)
            {
                bail!("{key} in {} must be positive, got {width}", path.display());
            }
        }

        if let Some(percent) = self.layout.scroll_offset_percent
            && !(0.0..=50.0).contains(&percent)
        {
            bail!(
                "layout.scroll_offset_percent in {} must be between 0 and 50, got {percent}",
                path.display()
            );
        }

        if let Some(currency) = &self.seo.currency
            && !(currency.len() == 3 && currency.chars().all(|ch| ch.is_ascii_uppercase()))
        {
            bail!(
                "seo.currency in {} must be a three-letter ISO 4217 code such as USD, got {currency:?}",
                path.display()
            );
        }

        Ok(())
    }

    pub fn enabled(&self) -> bool {
        self.menu.enabled.unwrap_or(true)
    }

    pub fn style(&self) -> &str {
        self.menu.style.as_deref().unwrap_or(DEFAULT_STYLE)
    }

    /// Configured feed, else the demo sheet.
    pub fn sheet_url(&self) -> &str {
        self.menu
            .sheet_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .unwrap_or(DEMO_SHEET_URL)
    }

    pub fn mode(&self) -> MenuMode {
        self.menu.mode.unwrap_or(MenuMode::Full)
    }

    pub fn menu_page(&self) -> &str {
        self.menu.menu_page.as_deref().unwrap_or(DEFAULT_MENU_PAGE)
    }

    pub fn source_timeout(&self) -> Result<Duration> {
        parse_duration(self.source.timeout.as_deref().unwrap_or(DEFAULT_TIMEOUT))
    }

    pub fn switch_delay(&self) -> Result<Duration> {
        parse_duration(
            self.transition
                .switch_delay
                .as_deref()
                .unwrap_or(DEFAULT_SWITCH_DELAY),
        )
    }

    pub fn viewport_width(&self) -> f64 {
        self.layout.viewport_width.unwrap_or(DEFAULT_VIEWPORT_WIDTH)
    }

    pub fn tab_metrics(&self) -> TabMetrics {
        let defaults = TabMetrics::default();
        TabMetrics {
            char_width: self.layout.char_width.unwrap_or(defaults.char_width),
            tab_padding: self.layout.tab_padding.unwrap_or(defaults.tab_padding),
        }
    }

    pub fn scroll_offset_percent(&self) -> f64 {
        self.layout
            .scroll_offset_percent
            .unwrap_or(DEFAULT_SCROLL_OFFSET_PERCENT)
    }

    /// `user_agents` replaces the built-in list; `extra_user_agents` adds to
    /// whichever list is in effect.
    pub fn crawler_policy(&self) -> CrawlerPolicy {
        let mut policy = match &self.crawler.user_agents {
            Some(agents) => CrawlerPolicy::new(agents),
            None => CrawlerPolicy::new(DEFAULT_CRAWLERS),
        };
        if let Some(extra) = &self.crawler.extra_user_agents {
            policy.extend(extra);
        }
        policy
    }

    pub fn seo_options(&self) -> SeoOptions {
        SeoOptions {
            currency: self
                .seo
                .currency
                .clone()
                .unwrap_or_else(|| DEFAULT_CURRENCY.to_owned()),
            structured_data: self.seo.structured_data.unwrap_or(true),
        }
    }

    pub fn example_config(path: &Path) -> String {
        format!(
            "# menuboard config\n# Place this file at: {}\n\nversion = 1\n\n[menu]\nenabled = true\nstyle = \"{}\"\n# Published sheet (CSV) or JSON proxy URL. Default is the demo sheet.\n# sheet_url = \"https://docs.google.com/spreadsheets/d/e/<id>/pub?output=csv\"\n# \"full\" renders the tabbed menu; \"teaser\" renders tabs linking to menu_page.\nmode = \"full\"\nmenu_page = \"{}\"\n\n[source]\ntimeout = \"{}\"\n\n[transition]\nswitch_delay = \"{}\"\n\n[layout]\nviewport_width = {}\nchar_width = 9\ntab_padding = 32\nscroll_offset_percent = 6\n\n[crawler]\n# user_agents = [\"googlebot\", \"bingbot\"]\nextra_user_agents = []\n\n[seo]\ncurrency = \"{}\"\nstructured_data = true\n",
            path.display(),
            DEFAULT_STYLE,
            DEFAULT_MENU_PAGE,
            DEFAULT_TIMEOUT,
            DEFAULT_SWITCH_DELAY,
            DEFAULT_VIEWPORT_WIDTH,
            DEFAULT_CURRENCY,
        )
    }
}

fn validate_feed_url(raw: &str) -> Result<()> {
    let url = Url::parse(raw.trim()).with_context(|| format!("invalid feed URL {raw:?}"))?;
    if !matches!(url.scheme(), "http" | "https") {
        bail!(
            "feed URL {raw:?} uses scheme {:?}; publish the sheet and use its http(s) link",
            url.scheme()
        );
    }
    Ok(())
}

pub fn parse_duration(raw: &str) -> Result<Duration> {
    if let Some(value) = raw.strip_suffix("ms") {
        let millis: u64 = value
            .parse()
            .with_context(|| format!("invalid duration {raw:?}"))?;
        return Ok(Duration::from_millis(millis));
    }
    if let Some(value) = raw.strip_suffix('s') {
        let secs: u64 = value
            .parse()
            .with_context(|| format!("invalid duration {raw:?}"))?;
        return Ok(Duration::from_secs(secs));
    }
    if let Some(value) = raw.strip_suffix('m') {
        let mins: u64 = value
            .parse()
            .with_context(|| format!("invalid duration {raw:?}"))?;
        let secs = mins.checked_mul(60).ok_or_else(|| {
            anyhow!("duration {raw:?} is too large; use a smaller number of minutes")
        })?;
        return Ok(Duration::from_secs(secs));
    }

    bail!("invalid duration {raw:?}; use one of: <N>ms, <N>s, <N>m (for example 300ms or 10s)")
}

#[cfg(test)]
mod tests {
    use super::{Config, MenuMode, parse_duration};
    use anyhow::Result;
    use menuboard_source::DEMO_SHEET_URL;
    use std::path::PathBuf;
    use std::sync::{Mutex, OnceLock};
    use std::time::Duration;

    fn write_config(content: &str) -> Result<(tempfile::TempDir, PathBuf)> {
        let temp = tempfile::tempdir()?;
        let path = temp.path().join("config.toml");
        std::fs::write(&path, content)?;
        Ok((temp, path))
    }

    fn env_lock() -> std::sync::MutexGuard<'static, ()> {
        static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();
        match ENV_LOCK.get_or_init(|| Mutex::new(())).lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    #[test]
    fn missing_config_uses_defaults() -> Result<()> {
        let temp = tempfile::tempdir()?;
        let config = Config::load(&temp.path().join("missing.toml"))?;
        assert_eq!(config.version, 1);
        assert!(config.enabled());
        assert_eq!(config.style(), "Modern");
        assert_eq!(config.sheet_url(), DEMO_SHEET_URL);
        assert_eq!(config.mode(), MenuMode::Full);
        assert_eq!(config.switch_delay()?, Duration::from_millis(300));
        assert_eq!(config.source_timeout()?, Duration::from_secs(10));
        assert_eq!(config.scroll_offset_percent(), 6.0);
        Ok(())
    }

    #[test]
    fn unversioned_config_is_rejected_with_actionable_message() -> Result<()> {
        let (_temp, path) = write_config("[menu]\nstyle = \"Classic\"\n")?;
        let error = Config::load(&path).expect_err("unversioned config should fail");
        let message = error.to_string();
        assert!(message.contains("version = 1"));
        assert!(message.contains("[menu]"));
        Ok(())
    }

    #[test]
    fn unsupported_config_version_is_rejected() -> Result<()> {
        let (_temp, path) = write_config("version = 2\n")?;
        let error = Config::load(&path).expect_err("v2 config should fail");
        assert!(error.to_string().contains("unsupported config version 2"));
        Ok(())
    }

    #[test]
    fn malformed_config_returns_parse_error() -> Result<()> {
        let (_temp, path) = write_config("{{not toml")?;
        let error = Config::load(&path).expect_err("malformed config should fail");
        assert!(error.to_string().contains("parse TOML config"));
        Ok(())
    }

    #[test]
    fn full_config_parses() -> Result<()> {
        let (_temp, path) = write_config(
            "version = 1\n[menu]\nenabled = false\nstyle = \"Classic\"\nsheet_url = \" https://example.com/pub?output=csv \"\nmode = \"teaser\"\nmenu_page = \"/food\"\n[source]\ntimeout = \"2s\"\n[transition]\nswitch_delay = \"150ms\"\n[layout]\nviewport_width = 1024\nchar_width = 8.5\ntab_padding = 24\nscroll_offset_percent = 10\n[seo]\ncurrency = \"EUR\"\nstructured_data = false\n",
        )?;

        let config = Config::load(&path)?;
        assert!(!config.enabled());
        assert_eq!(config.style(), "Classic");
        assert_eq!(config.sheet_url(), "https://example.com/pub?output=csv");
        assert_eq!(config.mode(), MenuMode::Teaser);
        assert_eq!(config.menu_page(), "/food");
        assert_eq!(config.source_timeout()?, Duration::from_secs(2));
        assert_eq!(config.switch_delay()?, Duration::from_millis(150));
        assert_eq!(config.viewport_width(), 1024.0);
        assert_eq!(config.tab_metrics().char_width, 8.5);
        assert_eq!(config.tab_metrics().tab_padding, 24.0);
        assert_eq!(config.scroll_offset_percent(), 10.0);
        let seo = config.seo_options();
        assert_eq!(seo.currency, "EUR");
        assert!(!seo.structured_data);
        Ok(())
    }

    #[test]
    fn crawler_lists_replace_or_extend_defaults() -> Result<()> {
        let (_temp, path) =
            write_config("version = 1\n[crawler]\nextra_user_agents = [\"ExampleBot\"]\n")?;
        let extended = Config::load(&path)?.crawler_policy();
        assert!(extended.is_bot("examplebot/1.0"));
        assert!(extended.is_bot("Googlebot/2.1"));

        let (_temp, path) = write_config(
            "version = 1\n[crawler]\nuser_agents = [\"onlybot\"]\nextra_user_agents = [\"otherbot\"]\n",
        )?;
        let replaced = Config::load(&path)?.crawler_policy();
        assert!(replaced.is_bot("OnlyBot"));
        assert!(replaced.is_bot("otherbot"));
        assert!(!replaced.is_bot("Googlebot/2.1"));
        Ok(())
    }

    #[test]
    fn non_http_sheet_url_is_rejected() -> Result<()> {
        let (_temp, path) = write_config("version = 1\n[menu]\nsheet_url = \"ftp://example.com/menu.csv\"\n")?;
        let error = Config::load(&path).expect_err("ftp feed should fail");
        let message = format!("{error:#}");
        assert!(message.contains("menu.sheet_url"));
        assert!(message.contains("http(s)"));
        Ok(())
    }

    #[test]
    fn invalid_layout_and_delay_values_are_rejected() -> Result<()> {
        let (_temp, path) = write_config("version = 1\n[transition]\nswitch_delay = \"0ms\"\n")?;
        let error = Config::load(&path).expect_err("zero delay should fail");
        assert!(error.to_string().contains("must be positive"));

        let (_temp, path) = write_config("version = 1\n[layout]\nviewport_width = -5\n")?;
        let error = Config::load(&path).expect_err("negative width should fail");
        assert!(error.to_string().contains("layout.viewport_width"));

        let (_temp, path) = write_config("version = 1\n[layout]\nscroll_offset_percent = 75\n")?;
        let error = Config::load(&path).expect_err("large offset should fail");
        assert!(error.to_string().contains("between 0 and 50"));

        let (_temp, path) = write_config("version = 1\n[seo]\ncurrency = \"dollars\"\n")?;
        let error = Config::load(&path).expect_err("bad currency should fail");
        assert!(error.to_string().contains("ISO 4217"));
        Ok(())
    }

    #[test]
    fn unknown_mode_fails_to_decode() -> Result<()> {
        let (_temp, path) = write_config("version = 1\n[menu]\nmode = \"carousel\"\n")?;
        let error = Config::load(&path).expect_err("unknown mode should fail");
        assert!(error.to_string().contains("decode config"));
        Ok(())
    }

    #[test]
    fn default_path_honors_env_override() -> Result<()> {
        let _guard = env_lock();
        let temp = tempfile::tempdir()?;
        let override_path = temp.path().join("custom-config.toml");
        // SAFETY: test-only process-local env mutation.
        unsafe {
            std::env::set_var("MENUBOARD_CONFIG_PATH", &override_path);
        }
        let resolved = Config::default_path()?;
        // SAFETY: test cleanup for process-local env mutation.
        unsafe {
            std::env::remove_var("MENUBOARD_CONFIG_PATH");
        }
        assert_eq!(resolved, override_path);
        Ok(())
    }

    #[test]
    fn default_path_uses_config_toml_suffix_when_no_env_override() -> Result<()> {
        let _guard = env_lock();
        // SAFETY: test-only process-local env mutation.
        unsafe {
            std::env::remove_var("MENUBOARD_CONFIG_PATH");
        }
        let path = Config::default_path()?;
        assert!(path.ends_with("menuboard/config.toml"));
        Ok(())
    }

    #[test]
    fn durations_parse_ms_seconds_and_minutes() -> Result<()> {
        assert_eq!(parse_duration("300ms")?, Duration::from_millis(300));
        assert_eq!(parse_duration("10s")?, Duration::from_secs(10));
        assert_eq!(parse_duration("2m")?, Duration::from_secs(120));
        let error = parse_duration("soon").expect_err("invalid duration should fail");
        assert!(error.to_string().contains("invalid duration"));
        Ok(())
    }

    #[test]
    fn oversized_minute_duration_is_rejected() {
        let error = parse_duration("307445734561825861m").expect_err("overflow should fail");
        assert!(error.to_string().contains("too large"));
    }

    #[test]
    fn example_config_round_trips_through_load() -> Result<()> {
        let temp = tempfile::tempdir()?;
        let path = temp.path().join("config.toml");
        let example = Config::example_config(&path);
        std::fs::write(&path, &example)?;
        let config = Config::load(&path)?;
        assert_eq!(config.style(), "Modern");
        assert!(example.contains("[crawler]"));
        Ok(())
    }
}

// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

mod config;
mod runtime;

use anyhow::{Context, Result, anyhow};
use config::Config;
use menuboard_app::initial_selection;
use menuboard_source::{Client, FeedFetcher};
use runtime::{DEMO_LOCATION, DemoFetcher, PageRequest, Session};
use std::env;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use time::format_description::well_known::Rfc3339;
use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "MENUBOARD_LOG";

fn main() {
    if let Err(error) = run() {
        eprintln!("{error:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let options = parse_cli_args(env::args().skip(1), Config::default_path()?)?;
    if options.show_help {
        print_help();
        return Ok(());
    }

    if options.print_config_path {
        println!("{}", options.config_path.display());
        return Ok(());
    }

    if options.print_example {
        print!("{}", Config::example_config(&options.config_path));
        return Ok(());
    }

    init_logging(options.verbose)?;

    let config = Config::load(&options.config_path).with_context(|| {
        format!(
            "load config {}; run `menuboard --print-example-config` to generate a template",
            options.config_path.display()
        )
    })?;

    let request = PageRequest {
        page_url: options.page_url.clone(),
        menu: options.menu.clone(),
        user_agent: options.user_agent.clone(),
    };

    if !config.enabled() && !options.check_only && !options.browse {
        tracing::info!("menu disabled; writing static content only");
        return write_output(options.out.as_ref(), &runtime::render_disabled().document());
    }

    let (fetcher, location): (Arc<dyn FeedFetcher>, String) = if options.demo {
        (Arc::new(DemoFetcher::default()), DEMO_LOCATION.to_owned())
    } else {
        let client = Client::new(config.source_timeout()?).with_context(|| {
            format!(
                "invalid [source] config in {}; fix the timeout value",
                options.config_path.display()
            )
        })?;
        let location = options
            .feed
            .clone()
            .unwrap_or_else(|| config.sheet_url().to_owned());
        (Arc::new(client), location)
    };
    let session = Session::start(fetcher, &location);

    if options.check_only {
        return check_feed(&session);
    }

    if options.browse {
        let (_, catalog) = session
            .catalog()
            .with_context(|| format!("load menu from {location}"))?;
        let requested = request.requested_category();
        let initial = initial_selection(&catalog, requested.as_deref());
        let mut controller = runtime::controller_for(&config);
        return menuboard_tui::run_browser("menuboard", &catalog, &mut controller, initial);
    }

    let output = runtime::render_page(&config, &session, &request);
    tracing::debug!(bot = output.bot, outcome = ?output.outcome, "rendered page");
    write_output(options.out.as_ref(), &output.document())
}

fn init_logging(verbose: bool) -> Result<()> {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(if verbose { "info" } else { "warn" }));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|error| anyhow!("initialize logging: {error}"))
}

fn check_feed<F: FeedFetcher + 'static>(session: &Session<F>) -> Result<()> {
    let (snapshot, catalog) = session
        .catalog()
        .with_context(|| format!("check menu feed {}", session.location()))?;
    println!("feed: {}", snapshot.location);
    println!("format: {}", snapshot.format.as_str());
    println!("rows: {}", snapshot.rows.len());
    println!("categories: {}", catalog.len());
    println!("items: {}", catalog.item_count());
    if let Some(source) = &snapshot.source {
        println!("source: {source}");
    }
    if let Some(published_at) = snapshot.published_at {
        let published = published_at
            .format(&Rfc3339)
            .context("format feed timestamp")?;
        println!("published: {published}");
    }
    Ok(())
}

fn write_output(out: Option<&PathBuf>, document: &str) -> Result<()> {
    match out {
        Some(path) => fs::write(path, document)
            .with_context(|| format!("write page to {}", path.display())),
        None => {
            print!("{document}");
            Ok(())
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct CliOptions {
    config_path: PathBuf,
    feed: Option<String>,
    page_url: Option<String>,
    menu: Option<String>,
    user_agent: Option<String>,
    out: Option<PathBuf>,
    browse: bool,
    demo: bool,
    verbose: bool,
    print_config_path: bool,
    print_example: bool,
    check_only: bool,
    show_help: bool,
}

fn parse_cli_args<I, S>(args: I, default_config_path: PathBuf) -> Result<CliOptions>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut options = CliOptions {
        config_path: default_config_path,
        feed: None,
        page_url: None,
        menu: None,
        user_agent: None,
        out: None,
        browse: false,
        demo: false,
        verbose: false,
        print_config_path: false,
        print_example: false,
        check_only: false,
        show_help: false,
    };

    let mut iter = args.into_iter();
    while let Some(arg) = iter.next() {
        match arg.as_ref() {
            "--config" => {
                options.config_path =
                    PathBuf::from(next_value(&mut iter, "--config", "a file path")?);
            }
            "--feed" => {
                options.feed = Some(next_value(
                    &mut iter,
                    "--feed",
                    "a sheet URL or file path",
                )?);
            }
            "--page-url" => {
                options.page_url = Some(next_value(&mut iter, "--page-url", "a URL")?);
            }
            "--menu" => {
                options.menu = Some(next_value(&mut iter, "--menu", "a category name")?);
            }
            "--user-agent" => {
                options.user_agent = Some(next_value(
                    &mut iter,
                    "--user-agent",
                    "a user agent string",
                )?);
            }
            "--out" => {
                options.out = Some(PathBuf::from(next_value(
                    &mut iter,
                    "--out",
                    "a file path",
                )?));
            }
            "--browse" => {
                options.browse = true;
            }
            "--demo" => {
                options.demo = true;
            }
            "--verbose" | "-v" => {
                options.verbose = true;
            }
            "--print-config-path" => {
                options.print_config_path = true;
            }
            "--print-example-config" => {
                options.print_example = true;
            }
            "--check" => {
                options.check_only = true;
            }
            "--help" | "-h" => {
                options.show_help = true;
            }
            unknown => {
                return Err(anyhow!(
                    "unknown argument {unknown:?}; run with --help to see supported options"
                ));
            }
        }
    }

    Ok(options)
}

fn next_value<I, S>(iter: &mut I, flag: &str, what: &str) -> Result<String>
where
    I: Iterator<Item = S>,
    S: AsRef<str>,
{
    iter.next()
        .map(|value| value.as_ref().to_owned())
        .ok_or_else(|| anyhow!("{flag} requires {what}"))
}

fn print_help() {
    println!("menuboard");
    println!("  --config <path>          Use a specific config path");
    println!("  --feed <url|path>        Read the menu from this sheet URL or local file");
    println!("  --page-url <url>         Page URL; its menu= parameter picks the first tab");
    println!("  --menu <name>            Open this category first");
    println!("  --user-agent <ua>        Render as seen by this visitor");
    println!("  --out <path>             Write the page here instead of stdout");
    println!("  --browse                 Browse the menu in the terminal");
    println!("  --demo                   Use a generated menu instead of fetching");
    println!("  --check                  Validate config and fetch the feed once");
    println!("  --verbose                Log fetch and render progress to stderr");
    println!("  --print-config-path      Print resolved config path");
    println!("  --print-example-config   Print a config template");
    println!("  --help                   Show this help");
}

#[cfg(test)]
mod tests {
    use super::{CliOptions, parse_cli_args, write_output};
    use anyhow::Result;
    use std::fs;
    use std::path::PathBuf;

    fn default_options_path() -> PathBuf {
        PathBuf::from("/tmp/menuboard-config.toml")
    }

    #[test]
    fn parse_cli_args_defaults_to_provided_config_path() -> Result<()> {
        let options = parse_cli_args(Vec::<String>::new(), default_options_path())?;
        assert_eq!(
            options,
            CliOptions {
                config_path: default_options_path(),
                feed: None,
                page_url: None,
                menu: None,
                user_agent: None,
                out: None,
                browse: false,
                demo: false,
                verbose: false,
                print_config_path: false,
                print_example: false,
                check_only: false,
                show_help: false,
            }
        );
        Ok(())
    }

    #[test]
    fn parse_cli_args_sets_config_path_override() -> Result<()> {
        let options = parse_cli_args(
            ["--config", "/tmp/custom.toml"],
            default_options_path(),
        )?;
        assert_eq!(options.config_path, PathBuf::from("/tmp/custom.toml"));
        Ok(())
    }

    #[test]
    fn parse_cli_args_collects_page_request_values() -> Result<()> {
        let options = parse_cli_args(
            [
                "--feed",
                "./menu.csv",
                "--page-url",
                "https://example.com/menu?menu=Food",
                "--menu",
                "Drinks",
                "--user-agent",
                "Googlebot/2.1",
                "--out",
                "/tmp/menu.html",
            ],
            default_options_path(),
        )?;
        assert_eq!(options.feed.as_deref(), Some("./menu.csv"));
        assert_eq!(
            options.page_url.as_deref(),
            Some("https://example.com/menu?menu=Food")
        );
        assert_eq!(options.menu.as_deref(), Some("Drinks"));
        assert_eq!(options.user_agent.as_deref(), Some("Googlebot/2.1"));
        assert_eq!(options.out, Some(PathBuf::from("/tmp/menu.html")));
        Ok(())
    }

    #[test]
    fn parse_cli_args_errors_for_missing_values() {
        for flag in ["--config", "--feed", "--page-url", "--menu", "--user-agent", "--out"] {
            let error = parse_cli_args([flag], default_options_path())
                .expect_err("missing value should fail");
            assert!(
                error.to_string().starts_with(&format!("{flag} requires")),
                "{flag}: {error}"
            );
        }
    }

    #[test]
    fn parse_cli_args_errors_for_unknown_argument() {
        let error = parse_cli_args(["--wat"], default_options_path())
            .expect_err("unknown arg should fail");
        assert!(error.to_string().contains("unknown argument"));
        assert!(error.to_string().contains("--help"));
    }

    #[test]
    fn parse_cli_args_sets_mode_flags() -> Result<()> {
        let options = parse_cli_args(
            ["--browse", "--demo", "--check", "-v"],
            default_options_path(),
        )?;
        assert!(options.browse);
        assert!(options.demo);
        assert!(options.check_only);
        assert!(options.verbose);
        Ok(())
    }

    #[test]
    fn parse_cli_args_sets_print_flags() -> Result<()> {
        let options = parse_cli_args(
            ["--print-config-path", "--print-example-config"],
            default_options_path(),
        )?;
        assert!(options.print_config_path);
        assert!(options.print_example);
        Ok(())
    }

    #[test]
    fn parse_cli_args_sets_help_flag_for_long_and_short_variants() -> Result<()> {
        let long = parse_cli_args(["--help"], default_options_path())?;
        let short = parse_cli_args(["-h"], default_options_path())?;
        assert!(long.show_help);
        assert!(short.show_help);
        Ok(())
    }

    #[test]
    fn write_output_writes_to_file() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("menu.html");
        write_output(Some(&path), "<html></html>")?;
        assert_eq!(fs::read_to_string(&path)?, "<html></html>");
        Ok(())
    }

    #[test]
    fn write_output_reports_unwritable_path() {
        let path = PathBuf::from("/nonexistent-dir/menu.html");
        let error = write_output(Some(&path), "<html></html>").expect_err("write should fail");
        assert!(error.to_string().contains("write page to /nonexistent-dir/menu.html"));
    }
}

//! rfc-ui - review RFC pull requests with inline line comments
//!
//! Usage: rfc-ui [options]
//!
//! Talks to GitHub through the `gh` CLI; `--demo` runs against built-in data.

use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use std::sync::mpsc::TryRecvError;
use std::time::Duration;

use anyhow::{Context, Result};
use log::{info, warn};
use opentui::input::ParseError;
use opentui::{InputParser, Renderer, RendererOptions, enable_raw_mode, terminal_size};

use rfc_review_ui::config::{cache_db_path, load_ui_config, log_file_path, save_ui_config};
use rfc_review_ui::github::{DemoSource, GhCliClient, RepoRef, ResponseCache, RfcKey, RfcSource};
use rfc_review_ui::input::map_event_to_message;
use rfc_review_ui::markdown::parse_deep_link;
use rfc_review_ui::theme::{load_built_in_theme, load_theme_from_path};
use rfc_review_ui::update::after_render;
use rfc_review_ui::{Highlighter, Message, Model, Theme, Worker, logging, telemetry, update, view};

/// Upper bound on measure-and-repack passes per frame.
const MAX_LAYOUT_PASSES: usize = 4;

fn main() -> Result<()> {
    let args = parse_args()?;

    if let Err(e) = logging::init(log_file_path().as_deref()) {
        eprintln!("Logging disabled: {e:#}");
    }
    info!("Starting rfc-ui");

    // Load theme (optional)
    let mut config = load_ui_config()?.unwrap_or_default();
    let theme_override = args
        .theme
        .clone()
        .or_else(|| std::env::var("RFC_UI_THEME").ok());
    let theme_selection = theme_override.clone().or_else(|| config.theme.clone());

    let default_theme =
        load_built_in_theme("default-dark").unwrap_or_else(|| rfc_review_ui::theme::ThemeLoadResult {
            theme: Theme::default(),
            syntax_theme: None,
        });

    let mut selected_builtin: Option<String> = None;
    let (theme, syntax_theme) = if let Some(selection) = theme_selection {
        if let Some(loaded) = load_built_in_theme(&selection) {
            selected_builtin = Some(selection);
            (loaded.theme, loaded.syntax_theme)
        } else {
            let path = Path::new(&selection);
            if path.exists() {
                let loaded = load_theme_from_path(path)
                    .with_context(|| format!("Failed to load theme: {}", path.display()))?;
                (loaded.theme, loaded.syntax_theme)
            } else if theme_override.is_some() {
                anyhow::bail!("Unknown theme: {selection}");
            } else {
                warn!("Configured theme {selection} not found, using default");
                (default_theme.theme, default_theme.syntax_theme)
            }
        }
    } else {
        (default_theme.theme, default_theme.syntax_theme)
    };

    if theme_override.is_some() {
        if let Some(name) = selected_builtin {
            config.theme = Some(name);
            save_ui_config(&config)?;
        }
    }

    // Pick the data source
    let source: Arc<dyn RfcSource> = if args.demo {
        info!("Running in demo mode");
        Arc::new(DemoSource::seeded())
    } else {
        Arc::new(GhCliClient::new(open_cache()))
    };
    let (worker, results) = Worker::new(source);

    // Get terminal size
    let (term_width, height) = terminal_size().unwrap_or((80, 24));
    let width = term_width.saturating_sub(2).max(1);

    // Create model
    let mut model = Model::new(width as u16, height as u16, config);
    model.theme = theme;
    if let Some(theme_name) = syntax_theme {
        model.highlighter = Highlighter::with_theme(&theme_name);
    } else if model.theme.name.to_lowercase().contains("light") {
        model.highlighter = Highlighter::with_theme("base16-ocean.light");
    }
    if let Some(repo) = &args.repo {
        model.repo_filter = Some(repo.clone());
    }
    model.pending_line = args.line;

    // Load initial data
    update(&mut model, Message::Refresh);
    if let Some(number) = args.rfc {
        match &args.repo {
            Some(repo) => update(
                &mut model,
                Message::OpenRfc(RfcKey {
                    repo: repo.clone(),
                    number,
                }),
            ),
            None => model.pending_rfc = Some(number),
        }
    }

    // Enter raw mode for input handling
    let _raw_guard = enable_raw_mode().context("Failed to enable raw mode")?;

    // Initialize renderer
    let options = RendererOptions {
        use_alt_screen: true,
        hide_cursor: true,
        enable_mouse: false,
        query_capabilities: false,
    };
    let mut renderer = Renderer::new_with_options(width.into(), height.into(), options)
        .context("Failed to initialize renderer")?;
    let _wrap_guard = AutoWrapGuard::new().context("Failed to disable line wrap")?;

    // Input parser
    let mut input = InputParser::new();

    // Main loop
    loop {
        worker.spawn_all(model.effects.drain(..));

        // Detect external terminal resize even if no input events are received
        if let Ok((term_width, term_height)) = terminal_size() {
            let ui_width = term_width.saturating_sub(2).max(1);
            let term_width_u16 = ui_width as u16;
            let term_height_u16 = term_height as u16;
            if term_width_u16 != model.width || term_height_u16 != model.height {
                model.resize(term_width_u16, term_height_u16);
                renderer
                    .resize(ui_width.into(), term_height.into())
                    .context("Failed to resize renderer")?;
            }
        }

        // Draw, then repack the sidebar against what was measured until stable
        renderer.set_background(model.theme.background);
        for _ in 0..MAX_LAYOUT_PASSES {
            // Force a full redraw to avoid render artifacts
            renderer.invalidate();
            renderer.clear();
            view(&model, renderer.buffer());
            if !after_render(&mut model) {
                break;
            }
        }
        model.needs_redraw = false;
        renderer.present().context("Failed to present frame")?;

        if model.should_quit {
            break;
        }

        // Deliver finished background work
        loop {
            match results.try_recv() {
                Ok(msg) => update(&mut model, msg),
                Err(TryRecvError::Empty | TryRecvError::Disconnected) => break,
            }
        }

        // Poll for input (with timeout for background results)
        let mut buf = [0u8; 64];
        if let Ok(n) = read_with_timeout(&mut buf, Duration::from_millis(100)) {
            let mut offset = 0usize;
            while offset < n {
                match input.parse(&buf[offset..n]) {
                    Ok((event, consumed)) => {
                        offset = offset.saturating_add(consumed);
                        let msg = map_event_to_message(&model, &event);
                        let resize = if let Message::Resize { width, height } = msg {
                            Some((width, height))
                        } else {
                            None
                        };
                        update(&mut model, msg);

                        if let Some((width, height)) = resize {
                            renderer
                                .resize(width.into(), height.into())
                                .context("Failed to resize renderer")?;
                        }
                    }
                    Err(ParseError::Empty | ParseError::Incomplete) => break,
                    Err(_) => {
                        offset = offset.saturating_add(1);
                    }
                }
            }
        }
    }

    info!("Exiting");
    Ok(())
}

/// Open the response cache; run uncached when it is unavailable.
fn open_cache() -> Option<ResponseCache> {
    let path = cache_db_path()?;
    match ResponseCache::open(&path) {
        Ok(cache) => Some(cache),
        Err(e) => {
            warn!("Response cache unavailable: {e:#}");
            telemetry::capture_anyhow(&e, None, &[("function", "open_cache")]);
            None
        }
    }
}

struct AutoWrapGuard;

impl AutoWrapGuard {
    fn new() -> std::io::Result<Self> {
        let mut out = std::io::stdout();
        out.write_all(b"\x1b[?7l")?; // Disable line wrap
        out.flush()?;
        Ok(Self)
    }
}

impl Drop for AutoWrapGuard {
    fn drop(&mut self) {
        let mut out = std::io::stdout();
        let _ = out.write_all(b"\x1b[?7h"); // Re-enable line wrap
        let _ = out.flush();
    }
}

#[derive(Debug, Default)]
struct CliArgs {
    theme: Option<String>,
    repo: Option<RepoRef>,
    rfc: Option<u64>,
    line: Option<u32>,
    demo: bool,
}

fn parse_args() -> Result<CliArgs> {
    let args: Vec<String> = std::env::args().collect();
    let mut parsed = CliArgs::default();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" => {
                println!("Usage: rfc-ui [options]");
                println!();
                println!("Options:");
                println!("  --theme <name|path>   Load theme by name or JSON path");
                println!("  --repo <owner/name>   Show only this repository");
                println!("  --rfc <number>        Open this RFC on startup");
                println!("  --goto <line-N>       Jump to a source line once the RFC opens");
                println!("  --demo                Use built-in sample data instead of GitHub");
                println!();
                println!("Environment:");
                println!("  RFC_UI_THEME  Theme name or JSON path");
                println!("  RFC_UI_LOG    Log filter (default: info)");
                println!();
                println!("Requires an authenticated `gh` CLI unless --demo is given.");
                std::process::exit(0);
            }
            "--theme" => {
                i += 1;
                if i >= args.len() {
                    anyhow::bail!("--theme requires a name or path");
                }
                parsed.theme = Some(args[i].clone());
            }
            "--repo" => {
                i += 1;
                if i >= args.len() {
                    anyhow::bail!("--repo requires owner/name");
                }
                parsed.repo = Some(args[i].parse()?);
            }
            "--rfc" => {
                i += 1;
                if i >= args.len() {
                    anyhow::bail!("--rfc requires a number");
                }
                let number = args[i].trim_start_matches('#');
                parsed.rfc = Some(
                    number
                        .parse()
                        .with_context(|| format!("Invalid RFC number: {}", args[i]))?,
                );
            }
            "--goto" => {
                i += 1;
                if i >= args.len() {
                    anyhow::bail!("--goto requires a line");
                }
                let line = parse_deep_link(&args[i]).or_else(|| args[i].parse().ok());
                match line {
                    Some(line) if line > 0 => parsed.line = Some(line),
                    _ => anyhow::bail!("Invalid line: {}", args[i]),
                }
            }
            "--demo" => parsed.demo = true,
            arg => {
                anyhow::bail!("Unknown option: {arg}");
            }
        }
        i += 1;
    }

    Ok(parsed)
}

fn read_with_timeout(buf: &mut [u8], _timeout: Duration) -> std::io::Result<usize> {
    use std::io::Read;
    // Relies on the terminal being in raw mode with VMIN=0, VTIME=1
    std::io::stdin().read(buf)
}

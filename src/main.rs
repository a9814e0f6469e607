//! kdml - Main Entry Point
//!
//! Renders KDML documents to HTML once, or keeps an output file in sync with
//! a source file while it is being edited.

use clap::{Args, Parser, Subcommand};
use kdml::config::{get_config_file_path, load_config, save_config, Settings, Theme};
use kdml::document::{SyntaxHighlighter, Transformer};
use kdml::export::{ExportOptions, HtmlExporter};
use kdml::preview::{
    DisplaySurface, FileDisplay, FileSource, PreviewSession, SourceWatcher, StdinSource,
    StreamDisplay,
};
use kdml::Result;
use log::{debug, info, warn};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;

/// Application name constant.
const APP_NAME: &str = "kdml";

#[derive(Parser)]
#[command(name = "kdml")]
#[command(version, about = "Render KDML documents to HTML", long_about = None)]
#[command(after_help = "EXAMPLES:
    kdml render notes.kdml -o notes.html    Render once to a page
    kdml render - --fragment < notes.kdml   Render stdin to a fragment on stdout
    kdml watch notes.kdml -o notes.html     Re-render on every save")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Render a document once
    Render {
        /// Input file, or `-` for stdin
        #[arg(value_name = "INPUT")]
        input: String,

        /// Output file (stdout when omitted)
        #[arg(short, long, value_name = "OUTPUT")]
        output: Option<PathBuf>,

        #[command(flatten)]
        options: RenderArgs,
    },

    /// Render a document and re-render whenever it changes
    Watch {
        /// Input file
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Output file
        #[arg(short, long, value_name = "OUTPUT")]
        output: PathBuf,

        #[command(flatten)]
        options: RenderArgs,
    },

    /// List available syntax highlighting themes
    Themes,

    /// Show the user configuration path
    Config {
        /// Write the current effective settings to the user configuration
        #[arg(long)]
        init: bool,
    },
}

#[derive(Args)]
struct RenderArgs {
    /// Write only the body markup instead of a complete page
    #[arg(long)]
    fragment: bool,

    /// Page color theme (light or dark)
    #[arg(long)]
    theme: Option<Theme>,

    /// Syntax highlighting theme name
    #[arg(long, value_name = "NAME")]
    syntax_theme: Option<String>,

    /// Open the output in the system viewer after rendering
    #[arg(long)]
    open: bool,
}

impl RenderArgs {
    /// Apply command-line overrides on top of loaded settings.
    fn apply(&self, settings: &mut Settings) {
        if self.fragment {
            settings.standalone = false;
        }
        if let Some(theme) = self.theme {
            settings.theme = theme;
        }
        if let Some(name) = &self.syntax_theme {
            settings.syntax_theme = Some(name.clone());
        }
        if self.open {
            settings.open_after_render = true;
        }
        settings.sanitize();
    }
}

fn main() -> ExitCode {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    debug!("Starting {}", APP_NAME);

    let result = match cli.command {
        Command::Render {
            input,
            output,
            options,
        } => render(&input, output.as_deref(), &options),
        Command::Watch {
            input,
            output,
            options,
        } => watch(&input, &output, &options),
        Command::Themes => list_themes(),
        Command::Config { init } => show_config(init),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Load settings and build the transformer and exporter they describe.
fn prepare(options: &RenderArgs) -> Result<(Settings, Transformer, HtmlExporter)> {
    let mut settings = load_config();
    options.apply(&mut settings);

    let highlighter = SyntaxHighlighter::new();
    let exporter = HtmlExporter::new(&ExportOptions::from_settings(&settings), &highlighter)?;
    debug!("Output format: {}", exporter.format().label());

    Ok((settings, Transformer::with_highlighter(highlighter), exporter))
}

fn render(input: &str, output: Option<&Path>, options: &RenderArgs) -> Result<()> {
    let (settings, transformer, exporter) = prepare(options)?;

    match output {
        Some(path) => {
            render_into(input, FileDisplay::new(path, exporter), transformer)?;
            if settings.open_after_render {
                open_output(path);
            }
        }
        None => render_into(input, StreamDisplay::stdout(exporter), transformer)?,
    }
    Ok(())
}

fn render_into<D: DisplaySurface>(input: &str, display: D, transformer: Transformer) -> Result<()> {
    if input == "-" {
        PreviewSession::new(StdinSource, display, transformer).run_cycle()
    } else {
        PreviewSession::new(FileSource::new(input), display, transformer).run_cycle()
    }
}

fn watch(input: &Path, output: &Path, options: &RenderArgs) -> Result<()> {
    let (settings, transformer, exporter) = prepare(options)?;

    let mut session = PreviewSession::new(
        FileSource::new(input),
        FileDisplay::new(output, exporter),
        transformer,
    );
    session.refresh()?;
    if settings.open_after_render {
        open_output(output);
    }

    let poll_interval = Duration::from_millis(settings.watch_poll_interval_ms);
    let watcher = SourceWatcher::new(input, poll_interval)?;
    info!("Watching {} (press Ctrl+C to stop)", input.display());
    session.watch(&watcher)
}

fn list_themes() -> Result<()> {
    let highlighter = SyntaxHighlighter::new();
    let mut themes = highlighter.available_themes();
    themes.sort_unstable();
    for theme in themes {
        println!("{theme}");
    }
    Ok(())
}

fn show_config(init: bool) -> Result<()> {
    if init {
        let path = save_config(&load_config())?;
        println!("Wrote {}", path.display());
    } else {
        println!("{}", get_config_file_path()?.display());
    }
    Ok(())
}

fn open_output(path: &Path) {
    if let Err(e) = open::that(path) {
        warn!("Failed to open {}: {}", path.display(), e);
    }
}

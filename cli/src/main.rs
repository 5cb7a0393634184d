//! doxy CLI - chat text to styled HTML documents

use std::collections::HashSet;
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;

use doxy::render::wrap_container;
use doxy::{
    Bibliography, CleanupPreset, Config, CoverPage, JsonFormat, StyleContext, Transformer,
};

#[derive(Parser)]
#[command(name = "doxy")]
#[command(version)]
#[command(about = "Turn chat-assistant text into styled HTML documents", long_about = None)]
struct Cli {
    /// Input text file ("-" for stdin)
    #[arg(value_name = "FILE")]
    input: Option<PathBuf>,

    /// Output file (stdout if not specified)
    #[arg(value_name = "OUTPUT")]
    output: Option<PathBuf>,

    /// Style context: modern, academic or creative
    #[arg(long, global = true)]
    style: Option<StyleContext>,

    /// Configuration file (TOML)
    #[arg(long, global = true, env = "DOXY_CONFIG", value_name = "FILE")]
    config: Option<PathBuf>,

    /// Input cleanup preset
    #[arg(long, global = true, value_enum)]
    cleanup: Option<CleanupLevel>,

    /// Treat every `$..$` pair on a line as math, including currency
    #[arg(long, global = true)]
    compat_math: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Transform text to HTML markup
    #[command(alias = "html")]
    Render {
        /// Input text file ("-" for stdin)
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Wrap output in a styled document container
        #[arg(long)]
        container: bool,

        /// Keep the written number of the first ordered list item
        #[arg(long)]
        list_start: bool,

        /// Prepend a cover page with this title
        #[arg(long, value_name = "TITLE")]
        cover_title: Option<String>,

        /// Cover page institution line
        #[arg(long, requires = "cover_title")]
        cover_university: Option<String>,

        /// Cover page course line
        #[arg(long, requires = "cover_title")]
        cover_course: Option<String>,

        /// Cover page author line
        #[arg(long, requires = "cover_title")]
        cover_author: Option<String>,

        /// Append a reference list built from citation links
        #[arg(long)]
        bibliography: bool,
    },

    /// Dump the parsed document tree as JSON
    Json {
        /// Input text file ("-" for stdin)
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,
    },

    /// Strip all markup and print plain text
    Text {
        /// Input text file ("-" for stdin)
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Show document statistics
    Info {
        /// Input text file ("-" for stdin)
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Print statistics as JSON
        #[arg(long)]
        json: bool,
    },

    /// List citations as a numbered reference list
    Cite {
        /// Input text file, or produced markup (.html)
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Emit the reference list as HTML markup
        #[arg(long)]
        html: bool,
    },

    /// Transform many files in parallel
    Batch {
        /// Input text files
        #[arg(value_name = "FILES", required = true)]
        inputs: Vec<PathBuf>,

        /// Output directory
        #[arg(short, long, value_name = "DIR")]
        output: Option<PathBuf>,

        /// Wrap output in a styled document container
        #[arg(long)]
        container: bool,
    },

    /// Show version information
    Version,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum CleanupLevel {
    /// Line endings only (default)
    Minimal,
    /// NFC, zero-width and NBSP removal, trailing whitespace trim
    Standard,
}

impl From<CleanupLevel> for CleanupPreset {
    fn from(level: CleanupLevel) -> Self {
        match level {
            CleanupLevel::Minimal => CleanupPreset::Minimal,
            CleanupLevel::Standard => CleanupPreset::Standard,
        }
    }
}

/// Options shared by every command.
struct Globals {
    style: Option<StyleContext>,
    config: Option<PathBuf>,
    cleanup: Option<CleanupLevel>,
    compat_math: bool,
}

impl Globals {
    /// Build a transformer: config file first, then command-line overrides.
    fn transformer(&self) -> Result<Transformer, Box<dyn std::error::Error>> {
        let config = match &self.config {
            Some(path) => Config::load(path)?,
            None => Config::default(),
        };

        let mut transformer = Transformer::from_config(&config)?;
        if let Some(style) = self.style {
            transformer = transformer.with_style(style);
        }
        if let Some(level) = self.cleanup {
            transformer = transformer.with_cleanup(level.into());
        }
        if self.compat_math {
            transformer = transformer.compat_inline_math();
        }
        log::debug!("{:?}", transformer);
        Ok(transformer)
    }
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();
    let globals = Globals {
        style: cli.style,
        config: cli.config,
        cleanup: cli.cleanup,
        compat_math: cli.compat_math,
    };

    let result = match cli.command {
        Some(Commands::Render {
            input,
            output,
            container,
            list_start,
            cover_title,
            cover_university,
            cover_course,
            cover_author,
            bibliography,
        }) => {
            let cover = cover_title.map(|title| {
                CoverPage::new(title)
                    .with_university(cover_university.unwrap_or_default())
                    .with_course(cover_course.unwrap_or_default())
                    .with_student(cover_author.unwrap_or_default())
            });
            cmd_render(
                &globals,
                &input,
                output.as_deref(),
                RenderFlags {
                    container,
                    list_start,
                    cover,
                    bibliography,
                },
            )
        }
        Some(Commands::Json {
            input,
            output,
            compact,
        }) => cmd_json(&globals, &input, output.as_deref(), compact),
        Some(Commands::Text { input, output }) => cmd_text(&globals, &input, output.as_deref()),
        Some(Commands::Info { input, json }) => cmd_info(&globals, &input, json),
        Some(Commands::Cite { input, html }) => cmd_cite(&globals, &input, html),
        Some(Commands::Batch {
            inputs,
            output,
            container,
        }) => cmd_batch(&globals, &inputs, output.as_deref(), container),
        Some(Commands::Version) => {
            cmd_version();
            Ok(())
        }
        None => {
            // Default behavior: render if input is provided
            if let Some(input) = cli.input {
                cmd_render(
                    &globals,
                    &input,
                    cli.output.as_deref(),
                    RenderFlags::default(),
                )
            } else {
                println!("{}", "Usage: doxy <FILE> [OUTPUT]".yellow());
                println!("       doxy --help for more information");
                Ok(())
            }
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

/// Read input text from a file, or stdin for "-".
fn read_input(input: &Path) -> io::Result<String> {
    if input.as_os_str() == "-" {
        let mut text = String::new();
        io::stdin().read_to_string(&mut text)?;
        Ok(text)
    } else {
        fs::read_to_string(input)
    }
}

fn write_output(output: Option<&Path>, content: &str) -> io::Result<()> {
    if let Some(path) = output {
        fs::write(path, content)?;
        println!("{} {}", "Saved to".green(), path.display());
    } else {
        println!("{}", content);
    }
    Ok(())
}

#[derive(Default)]
struct RenderFlags {
    container: bool,
    list_start: bool,
    cover: Option<CoverPage>,
    bibliography: bool,
}

fn cmd_render(
    globals: &Globals,
    input: &Path,
    output: Option<&Path>,
    flags: RenderFlags,
) -> Result<(), Box<dyn std::error::Error>> {
    let text = read_input(input)?;

    let mut transformer = globals.transformer()?;
    if flags.list_start {
        transformer = transformer.with_list_start(true);
    }

    let html = render_page(&transformer, &text, &flags, today())?;
    write_output(output, &html)?;
    Ok(())
}

/// Render a full page: cover, body and references, then the container.
fn render_page(
    transformer: &Transformer,
    text: &str,
    flags: &RenderFlags,
    accessed: NaiveDate,
) -> doxy::Result<String> {
    let wrap = flags.container || transformer.render_options().wrap_container;
    let style = transformer.render_options().style;

    let result = transformer.clone().with_container(false).parse(text);
    let mut html = result.to_html()?;

    if flags.bibliography {
        let bibliography = result.bibliography();
        if bibliography.is_empty() {
            eprintln!("{}", "No citations found.".yellow());
        } else {
            html = bibliography.append_to(&html, accessed);
        }
    }

    if let Some(cover) = &flags.cover {
        html = cover.prepend_to(&html);
    }

    if wrap && !html.is_empty() {
        html = wrap_container(&html, style);
    }
    Ok(html)
}

fn cmd_json(
    globals: &Globals,
    input: &Path,
    output: Option<&Path>,
    compact: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let text = read_input(input)?;
    let result = globals.transformer()?.parse(&text);

    let format = if compact {
        JsonFormat::Compact
    } else {
        JsonFormat::Pretty
    };

    let json = result.to_json(format)?;
    write_output(output, &json)?;
    Ok(())
}

fn cmd_text(
    globals: &Globals,
    input: &Path,
    output: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let text = read_input(input)?;
    let plain = globals.transformer()?.parse(&text).to_text()?;
    write_output(output, &plain)?;
    Ok(())
}

fn cmd_info(globals: &Globals, input: &Path, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let text = read_input(input)?;
    let transformer = globals.transformer()?;
    let result = transformer.parse(&text).to_html_with_stats()?;
    let stats = &result.stats;

    if json {
        println!("{}", serde_json::to_string_pretty(stats)?);
        return Ok(());
    }

    println!("{}", "Document Information".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "File".bold(), input.display());
    println!("{}: {}", "Style".bold(), transformer.render_options().style);
    println!("{}: {}", "Characters".bold(), result.metadata.char_count);
    println!("{}: {}", "Words".bold(), stats.word_count);
    println!(
        "{}: {} min",
        "Reading time".bold(),
        stats.reading_minutes
    );

    println!();
    println!("{}", "Content Statistics".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "Headings".bold(), stats.heading_count);
    println!("{}: {}", "Paragraphs".bold(), stats.paragraph_count);
    println!(
        "{}: {} ({} items)",
        "Lists".bold(),
        stats.list_count,
        stats.list_item_count
    );
    println!("{}: {}", "Tables".bold(), stats.table_count);
    println!("{}: {}", "Math".bold(), stats.math_count);
    println!("{}: {}", "Code blocks".bold(), stats.code_block_count);
    println!("{}: {}", "Citations".bold(), stats.citation_count);
    println!("{}: {} bytes", "Markup".bold(), result.content_len());

    Ok(())
}

fn cmd_cite(globals: &Globals, input: &Path, html: bool) -> Result<(), Box<dyn std::error::Error>> {
    let text = read_input(input)?;

    let is_markup = input
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("html") || ext.eq_ignore_ascii_case("htm"));

    let bibliography = if is_markup {
        Bibliography::from_markup(&text)
    } else {
        globals.transformer()?.parse(&text).bibliography()
    };

    if bibliography.is_empty() {
        return Err("No citations found.".into());
    }

    if html {
        println!("{}", bibliography.render_html(today()));
    } else {
        println!("{}", bibliography.to_text());
    }
    Ok(())
}

fn cmd_batch(
    globals: &Globals,
    inputs: &[PathBuf],
    output: Option<&Path>,
    container: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut transformer = globals.transformer()?;
    if container {
        transformer = transformer.with_container(true);
    }

    let output_dir = output
        .map(|p| p.to_path_buf())
        .unwrap_or_else(|| PathBuf::from("doxy_output"));
    fs::create_dir_all(&output_dir)?;

    let names = output_names(inputs);
    for (input, name) in inputs.iter().zip(&names) {
        let stem = input.file_stem().unwrap_or_default().to_string_lossy();
        if name != &format!("{}.html", stem) {
            eprintln!(
                "{} {} shares its name with another input, writing {}",
                "Warning:".yellow(),
                input.display(),
                name
            );
        }
    }

    let pb = ProgressBar::new(inputs.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap()
            .progress_chars("#>-"),
    );

    let failures = AtomicUsize::new(0);
    inputs
        .par_iter()
        .zip(names.par_iter())
        .for_each(|(input, name)| {
            let result = batch_one(&transformer, input, &output_dir.join(name));
            if let Err(e) = result {
                failures.fetch_add(1, Ordering::Relaxed);
                pb.println(format!("{} {}: {}", "Failed".red(), input.display(), e));
            }
            pb.inc(1);
        });

    pb.finish_with_message("Done!");

    let failed = failures.load(Ordering::Relaxed);
    println!(
        "\n{} {} of {} files written to {}",
        "Done!".green().bold(),
        inputs.len() - failed,
        inputs.len(),
        output_dir.display()
    );

    if failed > 0 {
        return Err(format!("{} files failed", failed).into());
    }
    Ok(())
}

/// Output file names for batch inputs. Inputs sharing a file stem get a
/// numeric suffix so no output overwrites another.
fn output_names(inputs: &[PathBuf]) -> Vec<String> {
    let mut taken: HashSet<String> = HashSet::new();
    inputs
        .iter()
        .map(|input| {
            let stem = input.file_stem().unwrap_or_default().to_string_lossy();
            let mut name = format!("{}.html", stem);
            let mut n = 2;
            while !taken.insert(name.clone()) {
                name = format!("{}-{}.html", stem, n);
                n += 1;
            }
            name
        })
        .collect()
}

fn batch_one(transformer: &Transformer, input: &Path, output: &Path) -> io::Result<()> {
    let text = fs::read_to_string(input)?;
    fs::write(output, transformer.transform(&text))
}

fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

fn cmd_version() {
    println!("{} {}", "doxy".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("Chat text to styled HTML documents");
    println!();
    println!("License: MIT");
}

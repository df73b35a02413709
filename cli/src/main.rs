//! pagemark CLI - paginated PDF rendering tool

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;

use pagemark::{JsonFormat, PageGeometry, Pagemark, RenderConfig, RenderReport};

#[derive(Parser)]
#[command(name = "pagemark")]
#[command(author = "iyulab")]
#[command(version)]
#[command(about = "Render Markdown-style text to paginated PDF", long_about = None)]
struct Cli {
    /// Input text file
    #[arg(value_name = "FILE")]
    input: Option<PathBuf>,

    /// Output PDF file
    #[arg(value_name = "OUTPUT")]
    output: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a text file to PDF
    Render {
        /// Input text file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output PDF file (input name with .pdf if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        #[command(flatten)]
        style: StyleArgs,
    },

    /// Print the computed page layout as JSON
    Layout {
        /// Input text file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,

        #[command(flatten)]
        style: StyleArgs,
    },

    /// Show layout statistics for a text file
    Info {
        /// Input text file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        #[command(flatten)]
        style: StyleArgs,
    },

    /// Print the default configuration as JSON
    Config,

    /// Show version information
    Version,
}

/// Options shared by every command that lays out a document.
#[derive(clap::Args, Default)]
struct StyleArgs {
    /// JSON configuration file
    #[arg(short, long, value_name = "FILE", env = "PAGEMARK_CONFIG")]
    config: Option<PathBuf>,

    /// Directory image references are resolved against
    #[arg(long, value_name = "DIR")]
    image_dir: Option<PathBuf>,

    /// Page size
    #[arg(long, value_enum)]
    page_size: Option<PageSize>,

    /// Left-align body text instead of justifying it
    #[arg(long)]
    no_justify: bool,

    /// Maximum number of pages before giving up
    #[arg(long, value_name = "N")]
    max_pages: Option<usize>,

    /// Diagram image to insert at the placeholder line
    #[arg(long, value_name = "IMAGE")]
    diagram: Option<PathBuf>,

    /// Skip input preparation (fence unwrapping, Unicode normalization)
    #[arg(long)]
    raw: bool,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum PageSize {
    /// 595 x 842 points
    A4,
    /// 612 x 792 points
    Letter,
}

impl PageSize {
    fn geometry(self, margin: f32) -> PageGeometry {
        let page = match self {
            PageSize::A4 => PageGeometry::a4(),
            PageSize::Letter => PageGeometry::letter(),
        };
        page.with_margin(margin)
    }
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Render {
            input,
            output,
            style,
        }) => cmd_render(&input, output.as_deref(), &style),
        Some(Commands::Layout {
            input,
            output,
            compact,
            style,
        }) => cmd_layout(&input, output.as_deref(), compact, &style),
        Some(Commands::Info { input, style }) => cmd_info(&input, &style),
        Some(Commands::Config) => cmd_config(),
        Some(Commands::Version) => {
            cmd_version();
            Ok(())
        }
        None => {
            // Default behavior: render if input is provided
            if let Some(input) = cli.input {
                cmd_render(&input, cli.output.as_deref(), &StyleArgs::default())
            } else {
                println!("{}", "Usage: pagemark <FILE> [OUTPUT]".yellow());
                println!("       pagemark --help for more information");
                Ok(())
            }
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn builder(style: &StyleArgs) -> Result<Pagemark, Box<dyn std::error::Error>> {
    let config = match &style.config {
        Some(path) => RenderConfig::from_json_file(path)?,
        None => RenderConfig::default(),
    };
    let margin = config.layout.page.margin;
    let mut builder = Pagemark::from_config(config);

    if let Some(size) = style.page_size {
        builder = builder.with_page(size.geometry(margin));
    }
    if let Some(dir) = &style.image_dir {
        builder = builder.with_image_dir(dir);
    }
    if style.no_justify {
        builder = builder.with_justify(false);
    }
    if let Some(pages) = style.max_pages {
        builder = builder.with_max_pages(pages);
    }
    if style.raw {
        builder = builder.raw();
    }
    if let Some(diagram) = &style.diagram {
        builder = builder.with_diagram(diagram);
    }
    Ok(builder)
}

fn default_output(input: &Path) -> PathBuf {
    input.with_extension("pdf")
}

fn cmd_render(
    input: &Path,
    output: Option<&Path>,
    style: &StyleArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let output = output
        .map(|p| p.to_path_buf())
        .unwrap_or_else(|| default_output(input));

    let rendered = builder(style)?.layout_file(input)?;
    let report = rendered.save(&output)?;

    print_warnings(&report);
    println!(
        "{} {} ({} pages, {} bytes)",
        "Saved to".green(),
        report.output.display(),
        report.page_count,
        report.bytes_written
    );

    Ok(())
}

fn cmd_layout(
    input: &Path,
    output: Option<&Path>,
    compact: bool,
    style: &StyleArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let rendered = builder(style)?.layout_file(input)?;

    let format = if compact {
        JsonFormat::Compact
    } else {
        JsonFormat::Pretty
    };

    let json = rendered.to_json(format)?;

    if let Some(path) = output {
        fs::write(path, &json)?;
        println!("{} {}", "Saved to".green(), path.display());
    } else {
        println!("{}", json);
    }

    Ok(())
}

fn cmd_info(input: &Path, style: &StyleArgs) -> Result<(), Box<dyn std::error::Error>> {
    let rendered = builder(style)?.layout_file(input)?;
    let doc = rendered.document();

    println!("{}", "Document Information".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "File".bold(), input.display());
    if let Some(ref title) = doc.metadata.title {
        println!("{}: {}", "Title".bold(), title);
    }
    println!(
        "{}: {} x {} pt",
        "Page size".bold(),
        doc.geometry.width,
        doc.geometry.height
    );
    println!("{}: {}", "Pages".bold(), doc.page_count());

    println!();
    println!("{}", "Layout Statistics".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    let stats = &doc.stats;
    println!("{}: {}", "Headings".bold(), stats.heading_count);
    println!("{}: {}", "Paragraphs".bold(), stats.paragraph_count);
    println!("{}: {}", "List items".bold(), stats.list_item_count);
    println!("{}: {}", "Images".bold(), stats.image_count);
    println!("{}: {}", "Missing images".bold(), stats.missing_image_count);
    println!("{}: {}", "Code blocks".bold(), stats.code_block_count);
    println!("{}: {}", "Callouts".bold(), stats.callout_count);
    println!("{}: {}", "Text lines".bold(), stats.line_count);

    let words: usize = doc.plain_text().split_whitespace().count();
    println!("{}: {}", "Words".bold(), words);

    if !doc.warnings.is_empty() {
        println!();
        println!("{}", "Warnings".yellow().bold());
        println!("{}", "─".repeat(40).dimmed());
        for warning in &doc.warnings {
            println!("  {} {}", "-".dimmed(), warning);
        }
    }

    Ok(())
}

fn cmd_config() -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", RenderConfig::default().to_json_pretty()?);
    Ok(())
}

fn print_warnings(report: &RenderReport) {
    for warning in &report.warnings {
        eprintln!("{}: {}", "Warning".yellow().bold(), warning);
    }
}

fn cmd_version() {
    println!("{} {}", "pagemark".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("Paginated PDF rendering tool");
    println!();
    println!(
        "Repository: {}",
        "https://github.com/iyulab/pagemark".dimmed()
    );
    println!("License: MIT");
}

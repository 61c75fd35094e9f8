//! clipdown CLI - convert HTML clips to Markdown

use std::error::Error;
use std::fs::{self, OpenOptions};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use chrono::Utc;
use clap::Parser;
use log::{debug, info};

use clipdown::{
    render_append_entry, render_document, suggest_filename, validate_filename, validate_result,
    CodeBlockStyle, ConversionResult, ConvertOptions, Converter, HeadingStyle, LinkStyle,
    SelectedContent, SelectionMetadata, ValidationLimits,
};

type CliResult<T> = Result<T, Box<dyn Error>>;

#[derive(Parser)]
#[command(name = "clipdown")]
#[command(version)]
#[command(about = "Convert HTML fragments to Markdown", long_about = None)]
struct Cli {
    /// Input HTML file ("-" or omitted reads stdin)
    #[arg(value_name = "FILE", conflicts_with = "selection")]
    input: Option<PathBuf>,

    /// Read a JSON selection record (html, text, metadata) instead of bare HTML
    #[arg(long, value_name = "FILE")]
    selection: Option<PathBuf>,

    /// Write the Markdown to a new file; an existing file is never overwritten
    #[arg(short, long, value_name = "FILE", conflicts_with_all = ["append", "output_dir"])]
    output: Option<PathBuf>,

    /// Append the clip to a Markdown file, creating it when missing
    #[arg(long, value_name = "FILE", conflicts_with = "output_dir")]
    append: Option<PathBuf>,

    /// Write the clip to a new file in DIR, named after its title and time
    #[arg(long, value_name = "DIR")]
    output_dir: Option<PathBuf>,

    /// Print the conversion result with its metadata as JSON
    #[arg(long, conflicts_with_all = ["append", "output_dir"])]
    json: bool,

    /// Load conversion options from a JSON file; flags override it
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Heading style (atx)
    #[arg(long, value_name = "STYLE")]
    heading_style: Option<HeadingStyle>,

    /// Code block style (fenced)
    #[arg(long, value_name = "STYLE")]
    code_block_style: Option<CodeBlockStyle>,

    /// Link style (inlineLink)
    #[arg(long, value_name = "STYLE")]
    link_style: Option<LinkStyle>,

    /// Emphasis delimiter (_ or *)
    #[arg(long, value_name = "CHAR")]
    em_delimiter: Option<char>,

    /// Strong delimiter (** or __)
    #[arg(long, value_name = "DELIM")]
    strong_delimiter: Option<String>,

    /// Token emitted for <br>
    #[arg(long, value_name = "TOKEN")]
    br: Option<String>,

    /// Token emitted for <hr>
    #[arg(long, value_name = "TOKEN")]
    hr: Option<String>,

    /// Maximum element nesting depth
    #[arg(long, value_name = "N")]
    max_depth: Option<usize>,
}

/// What to convert, and the metadata to file it under
struct Clip {
    html: String,
    metadata: SelectionMetadata,
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    if let Err(e) = run(&cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> CliResult<()> {
    let options = load_options(cli)?;
    let converter = Converter::with_options(options)?;

    let clip = read_clip(cli)?;
    let result = converter.convert(&clip.html)?;

    for warning in validate_result(&result, &ValidationLimits::default()) {
        eprintln!("warning: {}", warning);
    }

    if let Some(path) = &cli.output {
        cmd_write_new(path, &render_output(&result, cli.json)?)
    } else if let Some(path) = &cli.append {
        cmd_append(path, &clip.metadata, &result)
    } else if let Some(dir) = &cli.output_dir {
        cmd_write_into_dir(dir, &clip.metadata, &result)
    } else {
        let mut stdout = io::stdout().lock();
        stdout.write_all(render_output(&result, cli.json)?.as_bytes())?;
        Ok(())
    }
}

fn load_options(cli: &Cli) -> CliResult<ConvertOptions> {
    let mut options = match &cli.config {
        Some(path) => {
            let text = fs::read_to_string(path)
                .map_err(|e| format!("cannot read config {}: {}", path.display(), e))?;
            serde_json::from_str::<ConvertOptions>(&text)
                .map_err(|e| format!("invalid config {}: {}", path.display(), e))?
        }
        None => ConvertOptions::default(),
    };

    if let Some(style) = cli.heading_style {
        options.heading_style = style;
    }
    if let Some(style) = cli.code_block_style {
        options.code_block_style = style;
    }
    if let Some(style) = cli.link_style {
        options.link_style = style;
    }
    if let Some(delimiter) = cli.em_delimiter {
        options.em_delimiter = delimiter;
    }
    if let Some(delimiter) = &cli.strong_delimiter {
        options.strong_delimiter = delimiter.clone();
    }
    if let Some(br) = &cli.br {
        options.br = br.clone();
    }
    if let Some(hr) = &cli.hr {
        options.hr = hr.clone();
    }
    if let Some(depth) = cli.max_depth {
        options.max_depth = Some(depth);
    }

    debug!("conversion options: {:?}", options);
    Ok(options)
}

fn read_clip(cli: &Cli) -> CliResult<Clip> {
    if let Some(path) = &cli.selection {
        let text = read_input(Some(path.as_path()))?;
        let selection: SelectedContent = serde_json::from_str(&text)
            .map_err(|e| format!("invalid selection {}: {}", path.display(), e))?;
        return Ok(Clip {
            html: selection.html,
            metadata: selection.metadata,
        });
    }

    let html = read_input(cli.input.as_deref())?;
    let (url, title) = match cli.input.as_deref().filter(|p| !is_stdin(p)) {
        Some(path) => (
            path.display().to_string(),
            path.file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
                .unwrap_or_default(),
        ),
        None => ("stdin".to_string(), String::new()),
    };

    Ok(Clip {
        html,
        metadata: SelectionMetadata {
            url,
            title,
            timestamp: Utc::now(),
            domain: String::new(),
            selection_info: None,
        },
    })
}

fn is_stdin(path: &Path) -> bool {
    path.as_os_str() == "-"
}

fn read_input(path: Option<&Path>) -> CliResult<String> {
    match path {
        Some(path) if !is_stdin(path) => fs::read_to_string(path)
            .map_err(|e| format!("cannot read {}: {}", path.display(), e).into()),
        _ => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            Ok(buffer)
        }
    }
}

fn render_output(result: &ConversionResult, json: bool) -> CliResult<String> {
    if json {
        Ok(format!("{}\n", serde_json::to_string_pretty(result)?))
    } else {
        Ok(format!("{}\n", result.markdown()))
    }
}

fn cmd_write_new(path: &Path, contents: &str) -> CliResult<()> {
    let mut file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .map_err(|e| match e.kind() {
            io::ErrorKind::AlreadyExists => {
                format!("{} already exists; refusing to overwrite", path.display())
            }
            _ => format!("cannot create {}: {}", path.display(), e),
        })?;
    file.write_all(contents.as_bytes())?;
    info!("wrote {}", path.display());
    Ok(())
}

fn cmd_append(
    path: &Path,
    metadata: &SelectionMetadata,
    result: &ConversionResult,
) -> CliResult<()> {
    let existing = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == io::ErrorKind::NotFound => String::new(),
        Err(e) => return Err(format!("cannot read {}: {}", path.display(), e).into()),
    };

    let entry = render_append_entry(&existing, metadata, result);
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    file.write_all(entry.as_bytes())?;
    info!("appended clip to {}", path.display());
    Ok(())
}

fn cmd_write_into_dir(
    dir: &Path,
    metadata: &SelectionMetadata,
    result: &ConversionResult,
) -> CliResult<()> {
    let name = suggest_filename(&metadata.title, metadata.timestamp);
    for warning in validate_filename(&name) {
        eprintln!("warning: {}", warning);
    }

    fs::create_dir_all(dir)?;
    let path = dir.join(&name);
    cmd_write_new(&path, &render_document(metadata, result))?;
    println!("{}", path.display());
    Ok(())
}

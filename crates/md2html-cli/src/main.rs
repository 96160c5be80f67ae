//! md2html: CLI tool to convert Markdown files to HTML

mod config;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};

use config::{CONFIG_FILE_NAME, Config};
use md_parser::Lexer;
use md2html_core::{Standalone, WriterOptions, markdown_to_html, parse};

#[derive(Parser, Debug)]
#[command(name = "md2html")]
#[command(about = "Convert Markdown files to HTML")]
#[command(version)]
#[command(args_conflicts_with_subcommands = true)]
#[command(subcommand_negates_reqs = true)]
#[command(after_help = "Examples:
  md2html file.md                   # Convert single file to file.html
  md2html file.md -o page.html      # Convert to specific output file
  md2html docs/ -o site/ -r         # Convert directory recursively
  md2html file.md --standalone      # Emit a complete HTML page
  md2html init                      # Write a sample _md2html.toml")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    #[command(flatten)]
    convert: ConvertArgs,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Quiet mode - only show errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write a sample configuration file
    Init {
        /// Output path for the configuration file
        #[arg(short, long, default_value = CONFIG_FILE_NAME)]
        output: PathBuf,

        /// Print the JSON schema of the configuration file instead
        #[arg(long)]
        schema: bool,
    },
    /// Print the token stream of a file as JSON
    Tokens {
        /// Input Markdown file
        input: PathBuf,
    },
    /// Print the syntax tree of a file as JSON
    Ast {
        /// Input Markdown file
        input: PathBuf,
    },
}

#[derive(Args, Debug)]
struct ConvertArgs {
    /// Input Markdown file or directory
    #[arg(required = true)]
    input: Option<PathBuf>,

    /// Output file or directory
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Process directories recursively
    #[arg(short, long)]
    recursive: bool,

    /// Wrap the output in a complete HTML page
    #[arg(long)]
    standalone: bool,

    /// Emit HTML fragments only
    #[arg(long, conflicts_with = "standalone")]
    no_standalone: bool,

    /// Page title for standalone output (defaults to the first header)
    #[arg(long)]
    title: Option<String>,

    /// Language attribute for standalone output
    #[arg(long)]
    lang: Option<String>,

    /// Stylesheet URL for standalone output
    #[arg(long)]
    stylesheet: Option<String>,

    /// Configuration file (defaults to _md2html.toml next to the input)
    #[arg(short, long)]
    config: Option<PathBuf>,
}

/// Settings resolved from the command line and the configuration file
#[derive(Debug)]
struct Settings {
    writer: WriterOptions,
    extension: String,
    quiet: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose, cli.quiet);

    match cli.command {
        Some(Command::Init { output, schema }) => run_init(&output, schema),
        Some(Command::Tokens { input }) => run_tokens(&input),
        Some(Command::Ast { input }) => run_ast(&input),
        None => run_convert(&cli.convert, cli.quiet),
    }
}

fn init_logging(verbose: bool, quiet: bool) {
    let default_filter = if verbose {
        "debug"
    } else if quiet {
        "error"
    } else {
        "warn"
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .init();
}

fn run_init(output: &Path, schema: bool) -> Result<()> {
    if schema {
        println!("{}", Config::json_schema_string()?);
        return Ok(());
    }

    if output.exists() {
        anyhow::bail!("Config file already exists: {}", output.display());
    }

    let content = Config::sample().to_toml_with_schema()?;
    fs::write(output, content)
        .with_context(|| format!("Failed to write: {}", output.display()))?;
    println!("Created {}", output.display());

    Ok(())
}

fn run_tokens(input: &Path) -> Result<()> {
    let content = read_input(input)?;
    let tokens = Lexer::tokenize(&content);
    println!(
        "{}",
        serde_json::to_string_pretty(&tokens).context("Failed to serialize tokens")?
    );
    Ok(())
}

fn run_ast(input: &Path) -> Result<()> {
    let content = read_input(input)?;
    let doc = parse(&content).map_err(|e| anyhow::anyhow!("{}:{}", input.display(), e))?;
    println!(
        "{}",
        doc.to_json_pretty().context("Failed to serialize syntax tree")?
    );
    Ok(())
}

fn run_convert(args: &ConvertArgs, quiet: bool) -> Result<()> {
    let Some(input) = args.input.as_deref() else {
        anyhow::bail!("No input file or directory given");
    };

    if !input.exists() {
        anyhow::bail!("Input path does not exist: {}", input.display());
    }

    let config = load_config(args, input)?;
    let settings = resolve_settings(args, config, quiet);
    log::debug!("settings: {:?}", settings);

    if input.is_file() {
        convert_file(input, args.output.as_deref(), &settings)
    } else {
        convert_directory(input, args.output.as_deref(), args.recursive, &settings)
    }
}

/// Load the explicit config file, or `_md2html.toml` from the input's directory
fn load_config(args: &ConvertArgs, input: &Path) -> Result<Config> {
    if let Some(path) = &args.config {
        return Config::load(path);
    }

    let dir = if input.is_dir() {
        input
    } else {
        input
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or(Path::new("."))
    };
    Ok(Config::load_from_dir(dir)?.unwrap_or_default())
}

/// Command-line flags take precedence over the configuration file
fn resolve_settings(args: &ConvertArgs, config: Config, quiet: bool) -> Settings {
    let standalone = if args.no_standalone {
        false
    } else {
        args.standalone || config.output.standalone.unwrap_or(false)
    };

    let page = config.page;
    let writer = WriterOptions {
        standalone: standalone.then(|| Standalone {
            title: args.title.clone().or(page.title),
            lang: args.lang.clone().or(page.lang),
            stylesheet: args.stylesheet.clone().or(page.stylesheet),
        }),
    };

    Settings {
        writer,
        extension: config
            .output
            .extension
            .unwrap_or_else(|| "html".to_string()),
        quiet,
    }
}

/// Convert a single Markdown file to HTML
fn convert_file(input: &Path, output: Option<&Path>, settings: &Settings) -> Result<()> {
    let output_path = match output {
        Some(p) => p.to_path_buf(),
        None => input.with_extension(&settings.extension),
    };

    log::info!(
        "converting {} -> {}",
        input.display(),
        output_path.display()
    );

    write_html(input, &output_path, settings)?;

    if !settings.quiet {
        println!("{}", output_path.display());
    }

    Ok(())
}

/// Convert a directory of Markdown files
fn convert_directory(
    input: &Path,
    output: Option<&Path>,
    recursive: bool,
    settings: &Settings,
) -> Result<()> {
    let output_dir = output.unwrap_or(input);

    let mut files = collect_md_files(input, recursive)?;
    files.sort();

    if files.is_empty() {
        if !settings.quiet {
            eprintln!("No Markdown files found in {}", input.display());
        }
        return Ok(());
    }

    log::info!("found {} Markdown files", files.len());

    let mut success = 0;
    let mut errors = Vec::new();

    for file in &files {
        let relative = file.strip_prefix(input).unwrap_or(file);
        let output_file = output_dir.join(relative).with_extension(&settings.extension);

        match write_html(file, &output_file, settings) {
            Ok(()) => {
                success += 1;
                if !settings.quiet {
                    println!("{}", output_file.display());
                }
            }
            Err(e) => errors.push((file, e)),
        }
    }

    for (file, e) in &errors {
        eprintln!("Error converting {}: {}", file.display(), e);
    }

    if !settings.quiet {
        eprintln!("Converted {} files, {} failed", success, errors.len());
    }

    if !errors.is_empty() {
        anyhow::bail!("{} files failed to convert", errors.len());
    }

    Ok(())
}

/// Read, convert and write one file; nothing is written when parsing fails
fn write_html(input: &Path, output: &Path, settings: &Settings) -> Result<()> {
    if is_same_file(input, output)? {
        anyhow::bail!(
            "Output would overwrite the input file: {}",
            output.display()
        );
    }

    let content = read_input(input)?;

    let html = markdown_to_html(&content, &settings.writer)
        .map_err(|e| anyhow::anyhow!("{}:{}", input.display(), e))?;

    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    fs::write(output, &html).with_context(|| format!("Failed to write: {}", output.display()))?;

    Ok(())
}

/// Whether `output` names the same file as the existing `input`
fn is_same_file(input: &Path, output: &Path) -> Result<bool> {
    if input == output {
        return Ok(true);
    }
    if !output.exists() {
        return Ok(false);
    }
    let input = fs::canonicalize(input)
        .with_context(|| format!("Failed to resolve: {}", input.display()))?;
    let output = fs::canonicalize(output)
        .with_context(|| format!("Failed to resolve: {}", output.display()))?;
    Ok(input == output)
}

fn read_input(input: &Path) -> Result<Vec<u8>> {
    fs::read(input).with_context(|| format!("Failed to read: {}", input.display()))
}

/// Collect all Markdown files in a directory
fn collect_md_files(dir: &Path, recursive: bool) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for entry in
        fs::read_dir(dir).with_context(|| format!("Failed to read directory: {}", dir.display()))?
    {
        let entry = entry?;
        let path = entry.path();

        if path.is_file() {
            if let Some(ext) = path.extension() {
                if ext.eq_ignore_ascii_case("md") || ext.eq_ignore_ascii_case("markdown") {
                    files.push(path);
                }
            }
        } else if path.is_dir() && recursive {
            files.extend(collect_md_files(&path, recursive)?);
        }
    }

    Ok(files)
}

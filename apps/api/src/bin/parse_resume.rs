//! Converts a PDF resume to markdown with YAML frontmatter.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use applywise::resume::ResumeParser;

#[derive(Parser)]
#[command(name = "parse-resume")]
#[command(about = "Convert a PDF resume to structured markdown")]
struct Cli {
    /// PDF resume to parse
    input: PathBuf,

    /// Markdown output path (defaults to the input with an .md extension)
    output: Option<PathBuf>,
}

fn output_path(input: &Path, output: Option<PathBuf>) -> PathBuf {
    output.unwrap_or_else(|| input.with_extension("md"))
}

fn write_markdown(path: &Path, markdown: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("creating {}", parent.display()))?;
    }
    std::fs::write(path, markdown).with_context(|| format!("writing {}", path.display()))
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let output = output_path(&cli.input, cli.output);

    let parsed = ResumeParser.parse_pdf_path(&cli.input)?;
    write_markdown(&output, &parsed.to_markdown())?;

    info!(
        sections = parsed.sections.len(),
        "Wrote {}",
        output.display()
    );
    Ok(())
}

//! mailrender - print fetched mail messages as readable text.
//!
//! Reads raw RFC 5322 messages (for example `.eml` files saved from an IMAP
//! `FETCH BODY[]`) and prints the best available plain-text rendering.

use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use mailrender_mime::encoding::decode_rfc2047;
use mailrender_mime::{HeaderMap, RenderOptions, Renderer, parse_block, split_header_body};
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Render raw mail messages as plain text.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Message files to render; reads standard input when empty or `-`.
    files: Vec<PathBuf>,

    /// Text encoding used to reinterpret decoded bytes (WHATWG label).
    #[arg(short, long, env = "MAILRENDER_CHARSET", default_value = "utf-8")]
    charset: String,

    /// Print a From/To/Subject/Date summary before each body.
    #[arg(long)]
    headers: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mailrender=info,mailrender_mime=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let args = Args::parse();

    let options = RenderOptions::builder()
        .charset_label(&args.charset)
        .with_context(|| format!("Invalid --charset {:?}", args.charset))?
        .build();
    let renderer = Renderer::new(options);
    info!(charset = options.charset.name(), "Starting mailrender");

    let sources: Vec<Option<&Path>> = if args.files.is_empty() {
        vec![None]
    } else {
        args.files
            .iter()
            .map(|path| (path.as_os_str() != "-").then_some(path.as_path()))
            .collect()
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();

    for (index, source) in sources.iter().enumerate() {
        let raw = read_source(*source)?;
        debug!(source = ?source, len = raw.len(), "Rendering message");

        if index > 0 {
            writeln!(out)?;
        }
        if args.headers {
            let text = options.decode_lossy(&raw);
            let head = split_header_body(&text).map_or(&*text, |(head, _)| head);
            write!(out, "{}", summary(&parse_block(head)))?;
        }
        writeln!(out, "{}", renderer.render_raw(&raw))?;
    }

    Ok(())
}

fn read_source(source: Option<&Path>) -> Result<Vec<u8>> {
    match source {
        Some(path) => {
            std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))
        }
        None => {
            let mut raw = Vec::new();
            io::stdin()
                .read_to_end(&mut raw)
                .context("Failed to read standard input")?;
            Ok(raw)
        }
    }
}

/// Formats the envelope headers followed by a blank line.
fn summary(headers: &HeaderMap) -> String {
    let fields = [
        ("From", headers.from()),
        ("To", headers.to()),
        ("Subject", headers.subject()),
        ("Date", headers.date()),
    ];

    let mut summary = String::new();
    for (name, value) in fields {
        if let Some(value) = value {
            summary.push_str(name);
            summary.push_str(": ");
            summary.push_str(&decode_rfc2047(value));
            summary.push('\n');
        }
    }
    summary.push('\n');
    summary
}

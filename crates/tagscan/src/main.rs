//! tagscan - Main Entry Point

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tagscan::html::{escape_text, Attribute, ErrorPolicy, Tag};
use tagscan::{Config, Session};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "tagscan")]
#[command(about = "Parse HTML into a flat tag list and search it", long_about = None)]
#[command(version)]
struct Cli {
    /// HTML file path or http(s) URL
    source: String,

    /// Tag type to search for (case-insensitive)
    #[arg(short, long)]
    find: Option<String>,

    /// Exact attribute, repeat in document order: --attr id=main --attr class=x
    #[arg(short, long = "attr", value_parser = parse_pair)]
    attributes: Vec<(String, String)>,

    /// Exact tag text
    #[arg(short, long)]
    text: Option<String>,

    /// List every match instead of the first one
    #[arg(long)]
    all: bool,

    /// Form field to POST to the URL: --post q=rust
    #[arg(long = "post", value_parser = parse_pair)]
    form: Vec<(String, String)>,

    /// Continue past malformed markup
    #[arg(long)]
    lenient: bool,

    /// Fail instead of waiting when the rate limit applies
    #[arg(long)]
    no_wait: bool,

    /// JSON configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print the whole flat tag list
    #[arg(long)]
    dump: bool,
}

fn parse_pair(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("expected key=value, got `{raw}`")),
    }
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::from_json_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => Config::default(),
    };
    if cli.lenient {
        config.error_policy = ErrorPolicy::Lenient;
    }

    let mut session = Session::new(config)?;
    let wait = !cli.no_wait;
    let is_url = cli.source.starts_with("http://") || cli.source.starts_with("https://");
    if is_url && !cli.form.is_empty() {
        session.parse_url_with_post_form(&cli.source, &cli.form, wait)?;
    } else if is_url {
        session.parse_url(&cli.source, wait)?;
    } else if !cli.form.is_empty() {
        bail!("--post needs an http(s) URL source");
    } else {
        session.parse_file(&cli.source)?;
    }
    tracing::info!("{} tags parsed", session.tags().len());

    if cli.dump {
        for (index, tag) in session.tags().iter().enumerate() {
            println!("{}", format_tag(index, tag));
        }
    }

    let Some(kind) = cli.find.as_deref() else {
        return Ok(());
    };
    let attributes: Vec<Attribute> = cli.attributes.iter().cloned().map(Attribute::from).collect();
    let attributes = (!attributes.is_empty()).then_some(attributes.as_slice());
    let text = cli.text.as_deref();

    let mut next = session.find_first_tag(kind, attributes, text);
    if next.is_none() {
        bail!("no <{kind}> tag matched");
    }
    while let Some(index) = next {
        if let Some(tag) = session.get_tag(index) {
            println!("{}", format_tag(index, tag));
        }
        if !cli.all {
            break;
        }
        next = session.find_next_tag(kind, attributes, text, index + 1);
    }
    Ok(())
}

fn format_tag(index: usize, tag: &Tag) -> String {
    let mut line = format!("{index}\t<{}", tag.name);
    for attr in tag.attributes.iter().flatten() {
        line.push_str(&format!(" {}=\"{}\"", attr.name, escape_text(&attr.value)));
    }
    line.push('>');
    if let Some(text) = &tag.text {
        line.push('\t');
        line.push_str(text);
    }
    line
}

use std::{
    fs::File,
    io::{self, Read},
    path::PathBuf,
};

use anyhow::{bail, Context, Result};
use bqlex::{Scanner, Token, TokenKind, TokenStream};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Print the tokens of a SQL statement.
#[derive(Parser, Debug)]
#[command(name = "bqlex", version)]
struct Cli {
    /// SQL source text
    sql: Option<String>,

    /// Read the source from a file instead (`-` for stdin)
    #[arg(short, long, conflicts_with = "sql")]
    file: Option<PathBuf>,

    /// Scan on a separate thread and pull tokens over a channel
    #[arg(long)]
    threaded: bool,

    /// Increase logging (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // RUST_LOG wins over -v
    let level = match cli.verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(io::stderr)
        .init();

    let source: Box<dyn Read + Send> = match (&cli.sql, &cli.file) {
        (Some(sql), None) => Box::new(io::Cursor::new(sql.clone().into_bytes())),
        (None, Some(path)) if path.as_os_str() == "-" => Box::new(io::stdin()),
        (None, Some(path)) => Box::new(
            File::open(path).with_context(|| format!("open {}", path.display()))?,
        ),
        _ => bail!("Missing <sql> or --file <path>"),
    };

    let last = if cli.threaded {
        info!("scanning on worker thread");
        let stream = TokenStream::spawn(source).context("spawn scanner thread")?;
        print_tokens(stream)
    } else {
        print_tokens(Scanner::new(source))
    };

    match last {
        Some(token) if token.kind == TokenKind::Illegal => bail!(
            "{} at line {}, column {}",
            token.literal,
            token.line,
            token.column
        ),
        Some(_) => Ok(()),
        None => bail!("scanner produced no tokens"),
    }
}

fn print_tokens(tokens: impl Iterator<Item = Token>) -> Option<Token> {
    let mut last = None;
    for token in tokens {
        println!("{token}");
        last = Some(token);
    }
    last
}

//! spkctl CLI
//!
//! Queries a soundbar over its control port and prints the responses.

use std::io::{self, Write};

use clap::Parser;
use spkctl::{
    Client, Config, LabelAssociations, MessageKind, ResponseRenderer, ResponseValidator, SpkError,
};
use tracing_subscriber::{fmt, EnvFilter};

/// spkctl
#[derive(Parser, Debug)]
#[command(name = "spkctl")]
#[command(about = "Read state from a soundbar over its encrypted control port")]
#[command(version)]
struct Args {
    /// Device address (host, IPv4, or IPv6; may include a port)
    #[arg(required_unless_present = "list_kinds")]
    host: Option<String>,

    /// Control port used when the address has none
    #[arg(short, long, default_value = "9741")]
    port: u16,

    /// Message kind to query (repeatable). Default: every read-only kind
    #[arg(short, long = "kind", value_name = "KIND")]
    kinds: Vec<MessageKind>,

    /// Send a raw JSON request and print the reply verbatim (repeatable)
    #[arg(long, value_name = "JSON")]
    raw: Vec<String>,

    /// List known message kinds and exit
    #[arg(long)]
    list_kinds: bool,

    /// Largest decoded response accepted, in bytes
    #[arg(long, default_value = "4096")]
    max_response: usize,

    /// Connect/read/write timeout in milliseconds (0 = wait forever)
    #[arg(long, default_value = "0")]
    timeout_ms: u64,

    /// Verbose logging
    #[arg(short, long, conflicts_with = "quiet")]
    verbose: bool,

    /// Only log errors
    #[arg(short, long)]
    quiet: bool,
}

fn main() {
    let args = Args::parse();

    // Initialize tracing/logging
    let default_filter = if args.verbose {
        "info,spkctl=debug"
    } else if args.quiet {
        "error"
    } else {
        "warn,spkctl=info"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(io::stderr)
        .init();

    if args.list_kinds {
        for kind in MessageKind::ALL {
            let note = if kind.is_query() { "" } else { " (not in default sweep)" };
            println!("{}{}", kind, note);
        }
        return;
    }

    if let Err(e) = run(&args) {
        tracing::error!("{}", e);
        std::process::exit(1);
    }
}

fn run(args: &Args) -> spkctl::Result<()> {
    let host = args
        .host
        .as_deref()
        .ok_or_else(|| SpkError::InvalidArgument("no device address given".to_string()))?;

    let config = Config::builder()
        .host(host)
        .port(args.port)
        .max_response_size(args.max_response)
        .connect_timeout_ms(args.timeout_ms)
        .read_timeout_ms(args.timeout_ms)
        .write_timeout_ms(args.timeout_ms)
        .build();

    tracing::info!("spkctl v{}", spkctl::VERSION);
    tracing::info!("Device address: {}", config.socket_addr_string());

    let mut client = Client::connect(&config)?;

    let stdout = io::stdout();
    let mut out = stdout.lock();

    for raw in &args.raw {
        let reply = client.exchange(raw.as_bytes())?;
        writeln!(out, "{}", String::from_utf8_lossy(&reply))?;
        writeln!(out)?;
    }

    // Raw requests alone do not trigger the default sweep
    let kinds: Vec<MessageKind> = if !args.kinds.is_empty() {
        args.kinds.clone()
    } else if args.raw.is_empty() {
        MessageKind::queries().collect()
    } else {
        Vec::new()
    };

    let associations = LabelAssociations::default();
    for kind in kinds {
        match query_and_render(&mut client, kind, &associations, &mut out) {
            Ok(()) => {}
            Err(e) if !e.is_transport() => {
                tracing::warn!("{}: {}", kind, e);
            }
            Err(e) => return Err(e),
        }
        writeln!(out)?;
    }

    Ok(())
}

fn query_and_render<W: Write>(
    client: &mut Client<std::net::TcpStream>,
    kind: MessageKind,
    associations: &LabelAssociations,
    out: &mut W,
) -> spkctl::Result<()> {
    let envelope = client.query(kind)?;
    writeln!(out, "{}", kind)?;

    let data = ResponseValidator::validate(kind.as_str(), &envelope)?;
    ResponseRenderer::new(kind, associations).render(data, out)?;
    out.flush()?;
    Ok(())
}

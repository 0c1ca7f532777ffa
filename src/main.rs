use clap::Parser;
use reportdeck::{
    ContentSource,
    ReportFeed,
    Settings,
    cli::{Cli, Command},
    error,
    ingestion,
    mcp,
    render::{self, Listing},
    server,
};
use tracing_subscriber::EnvFilter;

fn init_tracing(verbose: u8, quiet: bool) {
    let filter = if let Ok(env) = std::env::var("REPORTDECK_LOG") {
        EnvFilter::new(env)
    } else if quiet {
        EnvFilter::new("warn")
    } else {
        match verbose {
            0 => EnvFilter::new("info"),
            1 => EnvFilter::new("debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .init();
}

fn main() -> error::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    // Completions need no report source.
    if let Command::Completions(args) = &cli.command {
        args.generate();
        return Ok(());
    }

    let settings = Settings::resolve(&cli.overrides())?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    runtime.block_on(run(cli.command, settings))
}

async fn run(command: Command, settings: Settings) -> error::Result<()> {
    let source = settings.open_source()?;

    match command {
        Command::Search(args) => {
            print_listing(&source, &args.query, args.limit, args.json).await?;
        }
        Command::List(args) => {
            print_listing(&source, "", args.limit, args.json).await?;
        }
        Command::Rebuild => {
            let regeneration =
                ingestion::rebuild(&source, settings.revalidate).await;
            println!("{}", serde_json::to_string_pretty(&regeneration)?);
        }
        Command::Serve(args) => {
            server::serve(args.addr, ReportFeed::new(source, settings.revalidate))
                .await?;
        }
        Command::Mcp => {
            mcp::serve_stdio(ReportFeed::new(source, settings.revalidate))
                .await?;
        }
        Command::Completions(args) => args.generate(),
    }

    Ok(())
}

async fn print_listing<S: ContentSource>(
    source: &S,
    query: &str,
    limit: Option<usize>,
    json: bool,
) -> error::Result<()> {
    let reports = ingestion::ingest(source).await;
    let listing = Listing::new(&reports, query).limit(limit);

    if json {
        println!("{}", serde_json::to_string_pretty(&listing.body())?);
    } else {
        println!("{}", render::format_human(&listing));
    }
    Ok(())
}

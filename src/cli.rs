use std::{net::SocketAddr, path::PathBuf};

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;

use crate::settings::Overrides;

#[derive(Debug, Parser)]
#[command(
    name = "reportdeck",
    about = "Search Markdown reports published in a repository"
)]
pub struct Cli {
    /// GitHub repository holding the reports (owner/name)
    #[arg(long, global = true)]
    pub repo: Option<String>,

    /// Directory inside the repository (default: reports)
    #[arg(long, global = true)]
    pub path: Option<String>,

    /// Branch, tag or commit to read from
    #[arg(long, global = true)]
    pub branch: Option<String>,

    /// Read reports from a local directory instead of GitHub
    #[arg(long, global = true)]
    pub source_dir: Option<PathBuf>,

    /// Seconds a listing is served before it is rebuilt
    #[arg(long, global = true)]
    pub revalidate: Option<u64>,

    /// Increase log verbosity (can be repeated: -v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only log warnings and errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    pub fn overrides(&self) -> Overrides {
        Overrides {
            repo: self.repo.clone(),
            path: self.path.clone(),
            branch: self.branch.clone(),
            source_dir: self.source_dir.clone(),
            revalidate: self.revalidate,
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Search reports by title, description, author or tag
    Search(SearchArgs),
    /// List every report
    List(ListArgs),
    /// Run one regeneration cycle and print its output as JSON
    Rebuild,
    /// Serve the listing over HTTP
    Serve(ServeArgs),
    /// Start MCP server for AI agent integration
    Mcp,
    /// Generate shell completions
    #[command(hide = true)]
    Completions(CompletionsArgs),
}

// -- Search --

#[derive(Debug, Parser)]
pub struct SearchArgs {
    /// Case-insensitive text to look for
    pub query: String,

    /// Maximum number of reports to print
    #[arg(short = 'n', long)]
    pub limit: Option<usize>,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

// -- List --

#[derive(Debug, Parser)]
pub struct ListArgs {
    /// Maximum number of reports to print
    #[arg(short = 'n', long)]
    pub limit: Option<usize>,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

// -- Serve --

#[derive(Debug, Parser)]
pub struct ServeArgs {
    /// Address to listen on
    #[arg(long, default_value = "127.0.0.1:3000")]
    pub addr: SocketAddr,
}

// -- Completions --

#[derive(Debug, Parser)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

impl CompletionsArgs {
    /// Generate shell completions and print to stdout.
    pub fn generate(&self) {
        let mut cmd = Cli::command();
        clap_complete::generate(
            self.shell,
            &mut cmd,
            "reportdeck",
            &mut std::io::stdout(),
        );
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    #[test]
    fn parse_search_defaults() {
        let cli = Cli::parse_from(["reportdeck", "search", "infra"]);
        match cli.command {
            Command::Search(args) => {
                assert_eq!(args.query, "infra");
                assert_eq!(args.limit, None);
                assert!(!args.json);
            }
            _ => panic!("expected search command"),
        }
        assert_eq!(cli.verbose, 0);
        assert!(!cli.quiet);
    }

    #[test]
    fn global_source_flags_after_subcommand() {
        let cli = Cli::parse_from([
            "reportdeck",
            "list",
            "--repo",
            "acme/postmortems",
            "--branch",
            "main",
            "--revalidate",
            "60",
            "-vv",
        ]);
        let overrides = cli.overrides();

        assert_eq!(overrides.repo.as_deref(), Some("acme/postmortems"));
        assert_eq!(overrides.branch.as_deref(), Some("main"));
        assert_eq!(overrides.revalidate, Some(60));
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn serve_default_addr() {
        let cli = Cli::parse_from(["reportdeck", "serve"]);
        match cli.command {
            Command::Serve(args) => {
                assert_eq!(args.addr, "127.0.0.1:3000".parse().unwrap());
            }
            _ => panic!("expected serve command"),
        }
    }

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }
}

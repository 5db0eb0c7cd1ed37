use crate::commands::{run_analyze, run_rewrite, AnalyzeArgs, RewriteArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use tone_guard::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "tone-guard",
    about = "Score the tone of written messages and rewrite the ones that need it",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Score text and print the analysis as JSON
    Analyze(AnalyzeArgs),
    /// Run a rewrite session on one message and print the outcome as JSON
    Rewrite(RewriteArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Analyze(args) => run_analyze(args).await,
        Command::Rewrite(args) => run_rewrite(args).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_serve_without_subcommand() {
        let cli = Cli::try_parse_from(["tone-guard"]).expect("parses");
        assert!(cli.command.is_none());
    }

    #[test]
    fn analyze_requires_exactly_one_source() {
        assert!(Cli::try_parse_from(["tone-guard", "analyze"]).is_err());
        assert!(Cli::try_parse_from([
            "tone-guard",
            "analyze",
            "--text",
            "hi",
            "--file",
            "notes.txt"
        ])
        .is_err());

        let cli = Cli::try_parse_from([
            "tone-guard",
            "analyze",
            "--jsonl",
            "comments.jsonl",
            "--text-field",
            "body",
            "--pretty",
        ])
        .expect("parses");
        match cli.command {
            Some(Command::Analyze(args)) => {
                assert_eq!(args.text_field, "body");
                assert!(args.pretty);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn serve_accepts_overrides() {
        let cli = Cli::try_parse_from(["tone-guard", "serve", "--port", "8080"]).expect("parses");
        match cli.command {
            Some(Command::Serve(args)) => assert_eq!(args.port, Some(8080)),
            other => panic!("unexpected command: {other:?}"),
        }
    }
}

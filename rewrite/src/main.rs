use clap::{Parser, Subcommand};
use rewrite_core::cli::{RewriteCmd, run};
use rewrite_core::logging::{self, LogMode};

#[derive(Parser, Debug)]
#[command(
    name = "rewrite",
    version,
    about = "rewrite: declarative URL rewrite rules, checked and evaluated offline"
)]
struct Cli {
    /// Emit logs as JSON instead of human-readable lines
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    #[command(flatten)]
    Rules(RewriteCmd),
}

fn main() {
    let cli = Cli::parse();

    let mode = if cli.json_logs {
        LogMode::Json
    } else {
        LogMode::Pretty
    };
    logging::init(mode);

    match cli.command {
        Command::Rules(cmd) => {
            tracing::debug!(?cmd, "running command");
            if let Err(e) = run(cmd) {
                eprintln!("rewrite error: {e:#}");
                std::process::exit(1);
            }
        }
    }
}

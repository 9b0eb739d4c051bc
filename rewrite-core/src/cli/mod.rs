mod check;
mod dump;
mod eval;

pub use check::*;
pub use dump::*;
pub use eval::*;

use clap::Subcommand;
use std::path::PathBuf;

#[derive(Subcommand, Debug)]
pub enum RewriteCmd {
    /// Compile a rules file and report what it contains
    Check {
        /// Path to the rules file
        #[arg(default_value = "rules.hcl")]
        path: PathBuf,

        /// Print errors without decoration
        #[arg(short, long, default_value = "false")]
        plain: bool,
    },

    /// Evaluate one request URL against a rules file
    Eval(EvalArgs),

    /// Print the compiled rule tree
    Dump {
        #[arg(default_value = "rules.hcl")]
        path: PathBuf,

        /// Output the parsed document as JSON
        #[arg(long)]
        json: bool,
    },
}

pub fn run(cmd: RewriteCmd) -> anyhow::Result<()> {
    match cmd {
        RewriteCmd::Check { path, plain } => check(path, plain),
        RewriteCmd::Eval(args) => eval(args),
        RewriteCmd::Dump { path, json } => dump(path, json),
    }
}

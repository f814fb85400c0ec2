use crate::demo::{run_analyze, run_demo, AnalyzeArgs, DemoArgs};
use crate::server;
use aqua_verify::error::AppError;
use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "aqua-verify",
    about = "Check permit dossiers for missing pieces and stormwater compliance",
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
    /// Analyse a dossier from extracted text files
    Analyze(AnalyzeArgs),
    /// Analyse a built-in sample dossier
    Demo(DemoArgs),
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
        Command::Analyze(args) => run_analyze(args),
        Command::Demo(args) => run_demo(args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aqua_verify::workflows::dossier::CaseFamily;
    use std::path::PathBuf;

    #[test]
    fn analyze_accepts_files_and_sources() {
        let cli = Cli::try_parse_from([
            "aqua-verify",
            "analyze",
            "pc1.txt",
            "pc2.txt",
            "--dir",
            "dossier",
            "--case-type",
            "pa",
            "--json",
        ])
        .expect("arguments parse");

        match cli.command {
            Some(Command::Analyze(args)) => {
                assert_eq!(
                    args.files,
                    vec![PathBuf::from("pc1.txt"), PathBuf::from("pc2.txt")]
                );
                assert_eq!(args.dir, Some(PathBuf::from("dossier")));
                assert_eq!(args.case_type, Some(CaseFamily::Subdivision));
                assert!(args.json);
                assert!(args.manifest.is_none());
            }
            other => panic!("expected analyze command, got {other:?}"),
        }
    }

    #[test]
    fn unknown_case_type_is_rejected() {
        assert!(Cli::try_parse_from(["aqua-verify", "analyze", "--case-type", "DP"]).is_err());
    }

    #[test]
    fn serve_is_the_default_command() {
        let cli = Cli::try_parse_from(["aqua-verify"]).expect("no arguments parse");
        assert!(cli.command.is_none());
    }
}

use crate::commands::{
    run_batch_file, run_calculate, run_demo, run_describe, run_list, BatchArgs, CalculateArgs,
    DescribeArgs, ListArgs,
};
use crate::server;
use clap::{Args, Parser, Subcommand};
use clinical_scores::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Clinical Score Catalog",
    about = "Serve, browse and run clinical scoring calculators",
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
    /// List registered scores
    List(ListArgs),
    /// Print the full definition of one score as JSON
    Describe(DescribeArgs),
    /// Run one calculation and print the output record
    Calculate(CalculateArgs),
    /// Run one calculation per CSV row
    Batch(BatchArgs),
    /// Run every score's worked example through the pipeline
    Demo,
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
        Command::List(args) => run_list(args),
        Command::Describe(args) => run_describe(args),
        Command::Calculate(args) => run_calculate(args),
        Command::Batch(args) => run_batch_file(args),
        Command::Demo => run_demo(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_line_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn serve_is_the_default_command() {
        let cli = Cli::try_parse_from(["clinical-scores-api"]).expect("parses");
        assert!(cli.command.is_none());

        let cli = Cli::try_parse_from(["clinical-scores-api", "serve", "--port", "8080"])
            .expect("parses");
        assert!(matches!(
            cli.command,
            Some(Command::Serve(ServeArgs { port: Some(8080), .. }))
        ));
    }

    #[test]
    fn calculate_needs_exactly_one_input_source() {
        assert!(Cli::try_parse_from(["clinical-scores-api", "calculate", "chads2"]).is_err());
        assert!(Cli::try_parse_from([
            "clinical-scores-api",
            "calculate",
            "chads2",
            "--input",
            "{}",
            "--input-file",
            "inputs.json",
        ])
        .is_err());

        let cli = Cli::try_parse_from([
            "clinical-scores-api",
            "calculate",
            "chads2",
            "--input-file",
            "inputs.json",
        ])
        .expect("parses");
        assert!(matches!(cli.command, Some(Command::Calculate(_))));
    }
}

mod commands;
mod terminal;

use commands::{CommandLine, Commands, info, scan, timeout_from_secs};
use probr_common::config::Config;
use terminal::{logging, print};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let commands = CommandLine::parse_args();

    if commands.no_color {
        colored::control::set_override(false);
    }
    logging::init_logging(commands.quiet, commands.verbose);
    print::banner(commands.quiet);

    match commands.command {
        Commands::Info { probe } => {
            let cfg: Config = probe.to_config(commands.quiet);
            print::header("probe configuration", cfg.quiet);
            info::info(&cfg)
        }
        Commands::Scan {
            targets,
            probe,
            jobs,
            timeout,
        } => {
            let cfg: Config = Config {
                jobs,
                timeout: timeout_from_secs(timeout),
                ..probe.to_config(commands.quiet)
            };
            print::header("starting scanner", cfg.quiet);
            scan::scan(targets, &cfg).await
        }
    }
}

use clap::Parser;
use click_audit::cli::commands::{cmd_audit, cmd_discover};
use click_audit::cli::config::{load_config, Cli, Commands};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref());

    match cli.command {
        Commands::Audit(args) => {
            let clean = cmd_audit(&args, cli.verbose, cli.trace.as_deref(), &config)?;
            if !clean {
                std::process::exit(1);
            }
        }
        Commands::Discover(args) => {
            cmd_discover(&args, cli.verbose, &config)?;
        }
    }

    Ok(())
}

//! cql2pg: CQL to PostgreSQL on the command line.

use clap::Parser;
use pgcql_cli::{CliConfig, init_logging, run};

fn main() -> anyhow::Result<()> {
    let config = CliConfig::parse();
    init_logging(&config.log_level);

    if let Err(errors) = config.validate() {
        for error in &errors {
            eprintln!("Configuration error: {}", error);
        }
        std::process::exit(2);
    }

    println!("{}", run(&config)?);
    Ok(())
}

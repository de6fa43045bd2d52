mod adapters;
mod cli;
mod config;
mod core;

use clap::{CommandFactory, Parser};

use cli::context::RunContext;
use cli::{Cli, Commands};

fn main() {
    let args = match Cli::try_parse() {
        Ok(args) => args,
        Err(e) => {
            // Help and version go to stdout and are not failures.
            let code = if e.use_stderr() { 1 } else { 0 };
            let _ = e.print();
            std::process::exit(code);
        }
    };

    let Some(command) = &args.command else {
        let _ = Cli::command().print_help();
        println!();
        return;
    };

    cli::output::init(args.verbose, args.quiet);
    cli::interrupt::install();

    let result = RunContext::from_args(&args).and_then(|ctx| match command {
        Commands::Encrypt {
            input_file,
            recipient,
        } => cli::commands::encrypt::execute(&ctx, input_file, recipient),
        Commands::Decrypt { encrypted_file } => {
            cli::commands::decrypt::execute(&ctx, encrypted_file)
        }
        Commands::Verify { encrypted_file } => cli::commands::verify::execute(&ctx, encrypted_file),
        Commands::Checksum {
            file,
            algorithm,
            expected,
            sums,
        } => cli::commands::checksum::execute(
            &ctx,
            file,
            *algorithm,
            expected.as_deref(),
            sums.as_deref(),
        ),
        Commands::Log { since, last } => cli::commands::log::execute(&ctx, since.as_deref(), *last),
    });

    if let Err(e) = result {
        cli::output::error(&format!("Error ({}): {e}", e.class().label()));
        std::process::exit(1);
    }
}

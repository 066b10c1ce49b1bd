use clap::Parser;
use tfat::cli::{Cli, CodeArgs, Commands};
use tracing_subscriber::EnvFilter;

fn main() {
    init_logging();

    let cli = Cli::parse();

    let result = match cli.command {
        None => tfat::cli::commands::code::execute(&cli, &CodeArgs::default()),
        Some(Commands::Add {
            ref name,
            ref secret,
        }) => tfat::cli::commands::add::execute(&cli, name, secret.as_deref()),
        Some(Commands::Delete { ref name, force }) => {
            tfat::cli::commands::delete::execute(&cli, name, force)
        }
        Some(Commands::List) => tfat::cli::commands::list::execute(&cli),
        Some(Commands::Code(ref args)) => tfat::cli::commands::code::execute(&cli, args),
        Some(Commands::Password) => tfat::cli::commands::password::execute(&cli),
        Some(Commands::Audit { last, ref since }) => {
            tfat::cli::commands::audit_cmd::execute(&cli, last, since.as_deref())
        }
        Some(Commands::Completions { shell }) => tfat::cli::commands::completions::execute(shell),
    };

    if let Err(e) = result {
        tracing::debug!(error = ?e, "command failed");
        tfat::cli::output::error(&e.to_string());
        std::process::exit(1);
    }
}

/// Diagnostics go to stderr, filtered by `TFAT_LOG` (default: warn).
fn init_logging() {
    let filter = EnvFilter::try_from_env("TFAT_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

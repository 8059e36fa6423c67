use clap::Parser;
use miette::Result;
use rtm::cli::{Cli, Commands};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    // Reset SIGPIPE so piping the preview to `head` exits quietly
    #[cfg(unix)]
    {
        unsafe {
            libc::signal(libc::SIGPIPE, libc::SIG_DFL);
        }
    }
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(2)
                .tab_width(4)
                .build(),
        )
    }))?;

    let cli = Cli::parse();
    let global = cli.global;
    init_logging(global.verbose, global.quiet);

    match cli.command {
        Commands::Build(args) => rtm::cli::commands::build::run(args, &global),
        Commands::Fetch(args) => rtm::cli::commands::fetch::run(args, &global),
        Commands::Config(cmd) => rtm::cli::commands::config::run(cmd, &global),
        Commands::Completions(args) => rtm::cli::commands::completions::run(args),
    }
}

/// Log to stderr; `RUST_LOG` wins over the -v/-q flags
fn init_logging(verbose: bool, quiet: bool) {
    let default_level = if verbose {
        "rtm=debug"
    } else if quiet {
        "error"
    } else {
        "warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

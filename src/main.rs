use clap::Parser;
use miette::Result;
use tracing_subscriber::EnvFilter;

use academia::cli::commands::{
    classes, completions, config, enrollments, go, home, rooms, students, subjects,
};
use academia::cli::screens::AppContext;
use academia::cli::{Cli, Commands, GlobalOpts};

#[tokio::main]
async fn main() -> Result<()> {
    // Reset SIGPIPE to default behavior (terminate silently) for proper Unix piping.
    // Without this, piping to `head`, `grep -q`, etc. causes a panic on broken pipe.
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
    init_tracing(&cli.global);
    let global = cli.global;

    match cli.command {
        Commands::Home => home::run(),
        Commands::Go(args) => go::run(args, &global).await,
        Commands::Students(cmd) => students::run(cmd, &context(&global)?).await,
        Commands::Subjects(cmd) => subjects::run(cmd, &context(&global)?).await,
        Commands::Rooms(cmd) => rooms::run(cmd, &context(&global)?).await,
        Commands::Classes(cmd) => classes::run(cmd, &context(&global)?).await,
        Commands::Enrollments(cmd) => enrollments::run(cmd, &context(&global)?).await,
        Commands::Config(cmd) => config::run(cmd, &global),
        Commands::Completions(args) => completions::run(args),
    }
}

fn context(global: &GlobalOpts) -> Result<AppContext> {
    AppContext::new(global.clone())
}

/// Logs go to stderr. `RUST_LOG` wins over `--verbose`.
fn init_tracing(global: &GlobalOpts) {
    let default = if global.verbose { "academia=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

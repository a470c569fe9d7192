use clap::Parser;
use devscen::cli::{Cli, Commands};
use miette::Result;

fn main() -> Result<()> {
    // Reset SIGPIPE to default behavior so piping into `head` exits quietly
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

    match cli.command {
        Commands::Generate(args) => devscen::cli::commands::generate::run(args, &global),
        Commands::Estimate(args) => devscen::cli::commands::estimate::run(args, &global),
        Commands::Validate(args) => devscen::cli::commands::validate::run(args, &global),
        Commands::Catalog(args) => devscen::cli::commands::catalog::run(args, &global),
        Commands::Summary(args) => devscen::cli::commands::summary::run(args, &global),
        Commands::Completions(args) => devscen::cli::commands::completions::run(args),
    }
}

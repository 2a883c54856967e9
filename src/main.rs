use clap::Parser;
use miette::Result;
use reckoning::cli::Cli;

fn main() -> Result<()> {
    // Reset SIGPIPE to default behavior (terminate silently) for proper Unix piping.
    // Without this, piping to `head`, `grep -q`, etc. causes a panic on broken pipe.
    // This is standard practice for CLI tools that output to stdout.
    #[cfg(unix)]
    {
        unsafe {
            libc::signal(libc::SIGPIPE, libc::SIG_DFL);
        }
    }
    // Install miette's fancy error handler for beautiful diagnostics
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

    let dest = cli.destination().ok_or_else(|| {
        miette::miette!(
            code = "reckoning::cli::destination",
            help = "every invocation targets exactly one collection",
            "please select a --local or --mega destination"
        )
    })?;

    match cli.send.clone() {
        Some(file) => reckoning::cli::commands::send::run(&cli, dest, &file),
        None => reckoning::cli::commands::query::run(&cli, dest),
    }
}

use describe_gen::cli;

fn main() -> anyhow::Result<()> {
    // Logs go to stderr; stdout carries generated text only
    let _ = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .try_init();

    let command_line_interface = cli::CommandLineInterface::load();
    command_line_interface.run()
}

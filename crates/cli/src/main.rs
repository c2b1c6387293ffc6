mod commands;
mod exit_code;

use clap::{Parser, Subcommand};
use commands::convert::ConvertArgs;
pub use exit_code::ExitCode;

#[derive(Parser)]
#[command(name = "graphql-karate")]
#[command(about = "Generate Karate API tests from a GraphQL schema", long_about = None)]
#[command(version)]
struct Cli {
    /// Force colored output even when not a TTY
    #[arg(long, global = true, conflicts_with = "no_color")]
    color: bool,

    /// Disable colored output
    #[arg(long, global = true, conflicts_with = "color")]
    no_color: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Log filter used when `RUST_LOG` is not set (e.g. `debug`, `graphql_karate=trace`)
    #[arg(long, global = true, value_name = "FILTER", default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

/// Output verbosity options
#[derive(Debug, Clone, Copy)]
pub struct OutputOptions {
    /// Whether to show informational output (success messages, summaries)
    pub show_info: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a GraphQL schema file into a Karate feature file
    ///
    /// Emits one response schema per object and interface type and one
    /// scenario per query (and optionally mutation) field.
    Convert(ConvertArgs),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_tracing(&cli.log_level);
    configure_colors(cli.color, cli.no_color);

    let output_opts = OutputOptions {
        show_info: !cli.quiet,
    };

    match cli.command {
        Commands::Convert(args) => commands::convert::run(&args, output_opts),
    }
}

/// Initialize tracing on stderr. `RUST_LOG` takes precedence over `--log-level`.
fn init_tracing(default_filter: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();
}

/// Decide whether status lines are colored.
///
/// Flags win over the environment. Then `NO_COLOR` (any value) disables,
/// `CLICOLOR_FORCE` (non-empty, not `0`) enables and `CLICOLOR=0` disables.
/// `None` leaves the decision to `colored`'s TTY detection.
/// See <https://no-color.org/> and <https://bixense.com/clicolors/>.
fn color_choice(
    force_color: bool,
    no_color: bool,
    env: impl Fn(&str) -> Option<String>,
) -> Option<bool> {
    if force_color {
        return Some(true);
    }
    if no_color || env("NO_COLOR").is_some() {
        return Some(false);
    }
    if let Some(force) = env("CLICOLOR_FORCE") {
        return (!force.is_empty() && force != "0").then_some(true);
    }
    env("CLICOLOR")
        .is_some_and(|val| val == "0")
        .then_some(false)
}

fn configure_colors(force_color: bool, no_color: bool) {
    let process_env = |key: &str| {
        std::env::var_os(key).map(|val| val.to_string_lossy().into_owned())
    };
    if let Some(colorize) = color_choice(force_color, no_color, process_env) {
        colored::control::set_override(colorize);
    }
}

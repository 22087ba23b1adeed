use clap::{Parser, Subcommand};

use commands::GlobalArgs;

mod commands;
mod output;

use commands::{config, oauth_app, schema_app};

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Parser)]
#[command(name = "item-input")]
#[command(version = VERSION)]
#[command(about = "Collect structured JSON values through interactive forms")]
struct Cli {
    /// Never prompt; answer every question with its default or fail
    #[arg(long, global = true)]
    non_interactive: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create or edit an ST Schema connector app
    SchemaApp(schema_app::SchemaAppArgs),
    /// Create or edit an OAuth-In app
    OauthApp(oauth_app::OauthAppArgs),
    /// Inspect item-input configuration
    Config(config::ConfigArgs),
}

fn main() -> std::process::ExitCode {
    let cli = Cli::parse();
    let global = GlobalArgs {
        non_interactive: cli.non_interactive,
    };

    let reply = commands::execute(cli.command, &global);
    if let Err(err) = reply.print() {
        item_input::log_status!("output", "{}", err);
        return std::process::ExitCode::from(1);
    }

    std::process::ExitCode::from(reply.exit_code)
}

mod config;
mod graphql;
mod http;

use std::{path::PathBuf, sync::Arc};

use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use clap::{Args, Parser, Subcommand};
use platform_authz::can_assign_tasks;
use platform_obs::{ObsConfig, init_tracing};
use products_hr::HrModule;
use tokio::sync::RwLock;
use tracing::info;

use crate::{
    config::AppConfig,
    graphql::{Clock, GraphqlData},
    http::{AppState, ServeConfig},
};

#[derive(Parser, Debug)]
#[command(name = "staffdesk-server", version, about = "Role-based employee dashboard")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP + GraphQL server over the demo organisation.
    Serve(ServeCommand),
    /// Print the GraphQL schema snapshot.
    #[command(name = "schema:print")]
    SchemaPrint {
        #[arg(long, value_name = "FILE", help = "Destination file path")]
        output: Option<PathBuf>,
    },
    /// List the role hierarchy with ranks.
    Roles,
}

#[derive(Args, Debug)]
struct ServeCommand {
    #[arg(long, default_value = "0.0.0.0")]
    host: std::net::IpAddr,
    #[arg(long, default_value_t = 8080)]
    port: u16,
    #[arg(
        long,
        value_name = "YYYY-MM-DDTHH:MM:SS",
        help = "Pin the server clock, e.g. to the last seeded day"
    )]
    now: Option<NaiveDateTime>,
}

impl ServeCommand {
    fn clock(&self) -> Clock {
        self.now.map_or(Clock::System, Clock::Fixed)
    }
}

impl From<ServeCommand> for ServeConfig {
    fn from(value: ServeCommand) -> Self {
        ServeConfig::new(value.host, value.port)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing(ObsConfig::from_env())?;
    let cli = Cli::parse();
    match cli.command {
        Command::Serve(cmd) => run_server(cmd).await,
        Command::SchemaPrint { output } => schema_print(output),
        Command::Roles => {
            print_roles();
            Ok(())
        }
    }
}

fn schema_print(path: Option<PathBuf>) -> Result<()> {
    let sdl = graphql::sdl();
    match path {
        Some(target) => {
            std::fs::write(&target, sdl)
                .with_context(|| format!("failed to write {}", target.display()))?;
            info!(path = %target.display(), "schema snapshot written");
        }
        None => println!("{sdl}"),
    }
    Ok(())
}

fn print_roles() {
    for role in platform_authz::Role::ALL {
        let assigns = if can_assign_tasks(role) { "assigns tasks" } else { "" };
        println!("{:>2}  {:<20} {assigns}", role.rank(), role.as_str());
    }
}

async fn run_server(cmd: ServeCommand) -> Result<()> {
    let config = Arc::new(AppConfig::load()?);
    let clock = cmd.clock();
    if let Clock::Fixed(at) = clock {
        info!(%at, "server clock pinned");
    }
    let hr = Arc::new(RwLock::new(HrModule::demo()));
    let schema = graphql::build_schema(GraphqlData {
        hr: hr.clone(),
        clock,
    });
    let state = AppState {
        hr,
        schema,
        cookie_key: config.cookie_key.clone(),
        config,
    };
    http::serve(cmd.into(), state).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serve_accepts_a_pinned_clock() {
        let cli = Cli::try_parse_from(["staffdesk-server", "serve", "--now", "2024-12-09T10:00:00"])
            .unwrap();
        let Command::Serve(cmd) = cli.command else {
            panic!("expected serve");
        };
        match cmd.clock() {
            Clock::Fixed(at) => assert_eq!(at.to_string(), "2024-12-09 10:00:00"),
            Clock::System => panic!("clock should be pinned"),
        }
    }

    #[test]
    fn serve_defaults_to_the_system_clock() {
        let cli = Cli::try_parse_from(["staffdesk-server", "serve"]).unwrap();
        let Command::Serve(cmd) = cli.command else {
            panic!("expected serve");
        };
        assert!(matches!(cmd.clock(), Clock::System));
        assert!(Cli::try_parse_from(["staffdesk-server", "serve", "--now", "tomorrow"]).is_err());
    }
}

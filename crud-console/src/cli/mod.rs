//! Command-line surface
//!
//! A thin driver over [`ViewController`](crate::view::ViewController): every command builds
//! a controller for the chosen entity, sends it the same messages a screen would, and
//! renders the resulting state.

pub mod commands;
pub mod context;
pub mod notifier;
pub mod output;

pub use context::AppContext;
pub use notifier::ConsoleNotifier;

use anyhow::Result;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::config::Config;
use crate::models::{Cliente, TipoCliente, Usuario};

#[derive(Parser, Debug)]
#[command(name = "crud-console", author, version, about, long_about = None)]
pub struct Cli {
    /// Config file (defaults to <config dir>/crud-console/config.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Log in and keep the session for later commands
    Login {
        #[arg(short, long)]
        username: Option<String>,
    },
    /// Forget the stored session
    Logout,
    /// List records one page at a time
    List(ListArgs),
    /// Show one record
    Show { entity: EntityKind, id: i64 },
    /// Create a record from field assignments
    Create {
        entity: EntityKind,
        /// field=value, repeatable
        #[arg(short, long = "set", value_name = "FIELD=VALUE")]
        set: Vec<String>,
    },
    /// Update a record from field assignments
    Update {
        entity: EntityKind,
        id: i64,
        #[arg(short, long = "set", value_name = "FIELD=VALUE")]
        set: Vec<String>,
    },
    /// Delete a record after confirmation
    Delete {
        entity: EntityKind,
        id: i64,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Type-ahead lookup for an entity-valued field
    Suggest {
        entity: EntityKind,
        field: String,
        text: String,
    },
}

#[derive(Args, Debug, Default, Clone)]
pub struct ListArgs {
    pub entity: EntityKind,

    /// 1-based page number
    #[arg(short, long, default_value_t = 1)]
    pub page: u64,

    /// field=value equality filter, repeatable
    #[arg(short, long = "filter", value_name = "FIELD=VALUE")]
    pub filter: Vec<String>,

    /// Sort field, prefix with '-' for descending; repeatable
    #[arg(short, long = "sort", value_name = "FIELD", allow_hyphen_values = true)]
    pub sort: Vec<String>,

    /// Start from the filters and sort saved by the previous listing
    #[arg(short, long)]
    pub resume: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EntityKind {
    #[default]
    Cliente,
    TipoCliente,
    Usuario,
}

/// Run `$body` with `$E` bound to the model type of `$kind`
macro_rules! with_entity {
    ($kind:expr, $E:ident => $body:expr) => {
        match $kind {
            EntityKind::Cliente => {
                type $E = Cliente;
                $body
            }
            EntityKind::TipoCliente => {
                type $E = TipoCliente;
                $body
            }
            EntityKind::Usuario => {
                type $E = Usuario;
                $body
            }
        }
    };
}

/// Execute one parsed command
pub async fn run(cli: Cli, config: Config) -> Result<()> {
    let ctx = AppContext::open(config).await?;

    match cli.command {
        Commands::Login { username } => commands::auth::login(&ctx, username).await,
        Commands::Logout => commands::auth::logout(&ctx).await,
        Commands::List(args) => with_entity!(args.entity, E => {
            let mut controller = ctx.view_controller::<E>();
            commands::records::list(&mut controller, &args, Some(&ctx.pool)).await
        }),
        Commands::Show { entity, id } => with_entity!(entity, E => {
            commands::records::show(&mut ctx.view_controller::<E>(), id).await
        }),
        Commands::Create { entity, set } => with_entity!(entity, E => {
            commands::records::save(&mut ctx.view_controller::<E>(), None, &set).await
        }),
        Commands::Update { entity, id, set } => with_entity!(entity, E => {
            commands::records::save(&mut ctx.view_controller::<E>(), Some(id), &set).await
        }),
        Commands::Delete { entity, id, yes } => with_entity!(entity, E => {
            commands::records::delete(&mut ctx.view_controller::<E>(), id, yes).await
        }),
        Commands::Suggest {
            entity,
            field,
            text,
        } => with_entity!(entity, E => {
            commands::records::suggest(&ctx.view_controller::<E>(), &field, &text).await
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_list_command() {
        let cli = Cli::try_parse_from([
            "crud-console",
            "list",
            "tipo-cliente",
            "--page",
            "2",
            "--filter",
            "codigo=01",
            "--sort",
            "-descripcion",
        ])
        .unwrap();

        match cli.command {
            Commands::List(args) => {
                assert_eq!(args.entity, EntityKind::TipoCliente);
                assert_eq!(args.page, 2);
                assert_eq!(args.filter, vec!["codigo=01"]);
                assert_eq!(args.sort, vec!["-descripcion"]);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_parse_update_command() {
        let cli = Cli::try_parse_from([
            "crud-console",
            "update",
            "cliente",
            "7",
            "--set",
            "nombre=Ana",
            "--set",
            "tipo_cliente=3",
        ])
        .unwrap();
        assert!(matches!(cli.command, Commands::Update { id: 7, ref set, .. } if set.len() == 2));
    }
}

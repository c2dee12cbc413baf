use crate::Config;
use crate::database::DatabaseManagerImpl;
use crate::database::migration::Migrator;
use clap::Subcommand;
use sea_orm_migration::MigratorTrait;
use tracing::info;

#[derive(Subcommand)]
pub enum MigrateAction {
    /// Run all pending migrations
    Up,
    /// Rollback the last migration
    Down {
        #[arg(
            short,
            long,
            help = "Number of migrations to rollback",
            default_value = "1"
        )]
        steps: u32,
    },
    /// Show migration status
    Status,
}

pub async fn handle_migrate_command(
    action: MigrateAction,
    config: &Config,
) -> Result<(), Box<dyn std::error::Error>> {
    let database = DatabaseManagerImpl::new_from_config(config).await?;
    let connection = &database.connection;

    match action {
        MigrateAction::Up => {
            info!("Running pending migrations...");
            Migrator::up(connection, None).await?;
            info!("All migrations completed successfully");
        }
        MigrateAction::Down { steps } => {
            info!(steps, "Rolling back migrations...");
            Migrator::down(connection, Some(steps)).await?;
            info!("Rollback completed successfully");
        }
        MigrateAction::Status => {
            for migration in Migrator::get_migration_with_status(connection).await? {
                println!("{:<45} {}", migration.name(), migration.status());
            }
        }
    }

    Ok(())
}

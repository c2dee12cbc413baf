use crate::Config;
use crate::database::{DatabaseManager, DatabaseManagerImpl};
use crate::stats::{DateRange, StatsService};
use clap::Args;
use std::sync::Arc;

#[derive(Args)]
pub struct StatsArgs {
    /// User whose expenses are summarised
    #[arg(short, long)]
    user_id: String,
    /// Inclusive start date (YYYY-MM-DD)
    #[arg(long)]
    start_date: Option<String>,
    /// Inclusive end date (YYYY-MM-DD)
    #[arg(long)]
    end_date: Option<String>,
}

/// Print the statistics report for a user as JSON
pub async fn handle_stats_command(
    args: StatsArgs,
    config: &Config,
) -> Result<(), Box<dyn std::error::Error>> {
    let range = DateRange::parse(args.start_date.as_deref(), args.end_date.as_deref())?;

    let database: Arc<dyn DatabaseManager> =
        Arc::new(DatabaseManagerImpl::new_from_config(config).await?);
    let service = StatsService::new(database.clone());

    let stats = service
        .compute_stats(&args.user_id, range.start, range.end)
        .await;
    database.close().await?;

    println!("{}", serde_json::to_string_pretty(&stats?)?);
    Ok(())
}

//! Reset database command.

use anyhow::Result;
use tickerflow_config::AppConfig;
use tickerflow_store::Store;

use crate::cli::ResetDbArgs;

pub async fn run(args: ResetDbArgs, config: &AppConfig) -> Result<()> {
    if !args.confirm {
        anyhow::bail!("refusing to drop tables without --confirm");
    }

    let store = Store::connect(&config.database).await?;
    store.reset(args.bars).await?;

    if args.bars {
        println!("Dropped all pipeline tables, including raw bars.");
    } else {
        println!("Dropped derived pipeline tables. Raw bars kept.");
    }
    Ok(())
}

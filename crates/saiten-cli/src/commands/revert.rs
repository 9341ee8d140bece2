//! Revert command: undoes an entire import.

use anyhow::Result;

use saiten_core::Context;
use saiten_core::mutation::revert_import;

pub async fn run(ctx: &Context, import_id: &str) -> Result<()> {
    revert_import(ctx, import_id).await?;
    println!("Reverted {import_id}.");
    Ok(())
}

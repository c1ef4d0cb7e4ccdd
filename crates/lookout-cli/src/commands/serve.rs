use anyhow::Result;
use lookout_server::TriggerServer;

/// Run the HTTP trigger endpoint until interrupted.
pub fn execute(port: u16) -> Result<()> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    runtime.block_on(async {
        tracing::info!(port, "starting trigger server");
        TriggerServer::new(port).start().await?;
        Ok(())
    })
}

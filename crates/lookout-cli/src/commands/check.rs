use anyhow::Result;
use console::style;
use lookout_core::{RunConfig, RunStatus};
use lookout_server::run_invocation_with;

/// Run one check invocation and print the full JSON response to stdout.
///
/// The process exits 0 even for a `KO` run: like the HTTP trigger, failure
/// is communicated through the body. A nonzero exit means the configuration
/// itself was unusable.
pub fn execute(headed: bool, screenshot: bool) -> Result<()> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    let result = runtime.block_on(async {
        let mut config = RunConfig::from_env()?;
        if headed {
            config.headless = false;
        }
        if screenshot {
            config.capture_screenshot = true;
        }

        let response = run_invocation_with(&config).await;

        println!("{}", serde_json::to_string_pretty(&response)?);

        let status = match response.status {
            RunStatus::Ok => style("OK - listing found").green().bold(),
            RunStatus::Ko => style("KO - listing not found").yellow().bold(),
        };
        let webhook = if response.webhook_sent {
            style("webhook delivered").green()
        } else {
            style("webhook NOT delivered").red()
        };
        eprintln!("\n{status} ({webhook})");

        Ok::<_, anyhow::Error>(())
    });

    // Blocking tasks (the browser process wait) must not hang the exit.
    runtime.shutdown_timeout(std::time::Duration::from_millis(100));

    result
}

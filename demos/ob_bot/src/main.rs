//! ob-bot
//!
//! The obot command bot wired to a console: type commands on stdin, replies
//! appear on stdout.
//!
//! ```text
//! ob help
//! ob explain nasa
//! astron notext today
//! xmoji 🥳 + 🥵
//! ```
//!
//! # Usage
//!
//! ```bash
//! cargo run --package ob-bot -- --config demos/ob_bot/obot.toml
//! ```

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use obot::prelude::*;
use obot_actions::{Emo, Inspiro, Nasa, build_client};
use obot_adapter_console::ConsoleAdapter;
use tracing::info;

/// (shortcut, action)
const SHORTCUTS: [(&str, &str); 3] = [("ainspire", "inspiro"), ("xmoji", "emo"), ("astron", "nasa")];

#[derive(Debug, Parser)]
#[command(name = "ob-bot", version, about = "Chat command bot on the console")]
struct Cli {
    /// Configuration file (default: obot.toml in the current directory)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Configuration profile, e.g. "production"
    #[arg(short, long)]
    profile: Option<String>,

    /// HTTP timeout for actions, in seconds
    #[arg(long, default_value_t = 30)]
    http_timeout: u64,
}

fn register_actions(runtime: &mut ObotRuntime, http_timeout: Duration) -> Result<()> {
    let config = runtime.config();
    let prefix = config.router.prefix.clone();
    let client = build_client(http_timeout)?;

    let inspiro = Inspiro::new(client.clone(), config.action_config("inspiro")?, &prefix)?;
    let emo = Emo::new(client.clone(), config.action_config("emo")?, &prefix)?;
    let nasa = Nasa::new(client, config.action_config("nasa")?, &prefix)?;

    // Rejections are logged by the router and are not fatal.
    let router = runtime.router_mut();
    let _ = router.register("inspiro", inspiro, Some("AI generated inspirational quotes"));
    let _ = router.register("emo", emo, Some("Mash up two emojis"));
    let _ = router.register("nasa", nasa, Some("NASA Astronomy Picture Of the Day"));

    for (shortcut, action) in SHORTCUTS {
        let _ = router.bind_shortcut(shortcut, action);
    }

    info!(actions = router.len(), "Actions registered");
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut builder = ObotRuntime::builder();
    if let Some(path) = &cli.config {
        builder = builder.config_file(path);
    }
    if let Some(profile) = &cli.profile {
        builder = builder.profile(profile);
    }
    let mut runtime = builder.build()?;

    register_actions(&mut runtime, Duration::from_secs(cli.http_timeout))?;
    runtime.register_adapter::<ConsoleAdapter>()?;

    runtime.run().await?;
    Ok(())
}

// Copyright 2025 Servus Altissimi (Pseudonym)

// Permission is hereby granted, free of charge, to any person obtaining a copy of this software and associated documentation files (the "Software"), to deal in the Software without restriction, including without limitation the rights to use, copy, modify, merge, publish, distribute, sublicense, and/or sell copies of the Software, and to permit persons to whom the Software is furnished to do so, subject to the following conditions:
// The above copyright notice and this permission notice shall be included in all copies or substantial portions of the Software.
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

use inetgate::prelude::*;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{Level, debug, info, warn};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(short, long, global = true)]
    verbose: bool,

    /// Turn simulation on regardless of the environment
    #[arg(long, global = true)]
    enable: bool,

    #[arg(long, global = true)]
    dns_addr: Option<String>,

    #[arg(long, global = true)]
    http_addr: Option<String>,

    /// Liveness timeout in whole seconds
    #[arg(long, global = true)]
    timeout: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the effective configuration as JSON
    Config,

    /// Print the resolvers the sandbox should use
    DnsServers,

    CheckUrl {
        url: String,
    },

    CheckHost {
        host: String,
    },

    /// Decide, for each URL, whether it goes to INetSim
    Redirect {
        #[arg(required = true)]
        urls: Vec<String>,
    },

    /// Check that the INetSim appliance answers on both addresses
    Validate,
}

impl Cli {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            enabled: self.enable.then_some(true),
            dns_addr: self.dns_addr.clone(),
            http_addr: self.http_addr.clone(),
            liveness_timeout_secs: self.timeout.clone(),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let program_start = Instant::now();

    let cli = Cli::parse();

    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::from_level(level).into())
                .from_env_lossy(),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config = SimulationConfig::default().merge(ConfigOverrides::from_env().or(cli.overrides()));

    let shutdown = CancellationToken::new();
    {
        let shutdown = shutdown.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("Interrupted, cancelling in-flight checks");
                shutdown.cancel();
            }
        });
    }

    let simulator = NetworkSimulator::new(config)?.with_shutdown(shutdown);

    match cli.command {
        Commands::Config => {
            println!("{}", serde_json::to_string_pretty(simulator.config())?);
        }

        Commands::DnsServers => {
            for server in simulator.dns_servers() {
                println!("{}", server);
            }
        }

        Commands::CheckUrl { url } => {
            let alive = simulator.is_url_alive(&url).await;
            println!("{} {}", url, if alive { "alive" } else { "dead" });
        }

        Commands::CheckHost { host } => {
            let alive = simulator.is_host_alive(&host).await;
            println!("{} {}", host, if alive { "resolved" } else { "unresolved" });
        }

        Commands::Redirect { urls } => {
            decide_redirects(&simulator, urls).await?;
        }

        Commands::Validate => {
            if !simulator.is_enabled() {
                info!("Network simulation disabled, nothing to validate");
            }
            simulator.validate_connection().await?;
            println!("ok");
        }
    }

    debug!("Total runtime: {:.2}s", program_start.elapsed().as_secs_f64());

    Ok(())
}

async fn decide_redirects(simulator: &NetworkSimulator, urls: Vec<String>) -> Result<()> {
    info!("Deciding {} URL(s), enabled: {}", urls.len(), simulator.is_enabled());

    let handles: Vec<_> = urls
        .into_iter()
        .map(|url| {
            let simulator = simulator.clone();
            tokio::spawn(async move {
                let redirect = simulator.should_redirect(&url).await;
                (url, redirect)
            })
        })
        .collect();

    for handle in handles {
        let (url, redirect) = handle.await?;
        let target = if redirect { simulator.http_addr() } else { "direct" };
        println!("{} -> {}", url, target);
    }

    Ok(())
}

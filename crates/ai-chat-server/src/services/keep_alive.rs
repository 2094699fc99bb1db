//! Self-ping loop that keeps the host from idling the service out.
//!
//! Pings `{public_base_url}/health` after a jittered wait, and after a fixed
//! backoff when the previous ping failed. Failures are only logged.

use anyhow::{anyhow, Context, Result};
use rand::Rng;
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::config::KeepAliveConfig;
use crate::utils::task::{stopped, TaskHandle};

#[async_trait::async_trait]
pub trait HealthProbe: Send + Sync {
    async fn probe(&self) -> Result<()>;
}

/// `GET {base}/health`, any 2xx counts as alive
pub struct HttpHealthProbe {
    client: Client,
    url: String,
}

impl HttpHealthProbe {
    pub fn new(public_base_url: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .context("Failed to create keep-alive HTTP client")?;

        Ok(Self {
            client,
            url: format!("{}/health", public_base_url.trim_end_matches('/')),
        })
    }
}

#[async_trait::async_trait]
impl HealthProbe for HttpHealthProbe {
    async fn probe(&self) -> Result<()> {
        let response = self.client.get(&self.url).send().await?;
        if !response.status().is_success() {
            return Err(anyhow!("{} answered {}", self.url, response.status()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct KeepAliveSchedule {
    pub min_interval: Duration,
    pub max_interval: Duration,
    pub retry_backoff: Duration,
}

impl KeepAliveSchedule {
    pub fn from_config(config: &KeepAliveConfig) -> Self {
        Self {
            min_interval: Duration::from_secs(config.min_interval_seconds),
            max_interval: Duration::from_secs(config.max_interval_seconds),
            retry_backoff: Duration::from_secs(config.retry_backoff_seconds),
        }
    }

    /// Uniformly random wait within `[min_interval, max_interval]`
    pub fn next_interval(&self) -> Duration {
        let lo = self.min_interval.min(self.max_interval).as_millis() as u64;
        let hi = self.min_interval.max(self.max_interval).as_millis() as u64;
        Duration::from_millis(rand::rng().random_range(lo..=hi))
    }
}

/// Start the loop when a public URL is configured
pub fn spawn_from_config(config: &KeepAliveConfig) -> Result<Option<TaskHandle>> {
    let Some(base_url) = config.public_base_url.as_deref().filter(|u| !u.trim().is_empty()) else {
        info!("Keep-alive disabled (no public base URL)");
        return Ok(None);
    };

    let probe = Arc::new(HttpHealthProbe::new(base_url)?);
    info!("Keep-alive enabled for {}", base_url);
    Ok(Some(spawn(probe, KeepAliveSchedule::from_config(config))))
}

pub fn spawn(probe: Arc<dyn HealthProbe>, schedule: KeepAliveSchedule) -> TaskHandle {
    TaskHandle::spawn("keep-alive", move |rx| run(probe, schedule, rx))
}

async fn run(
    probe: Arc<dyn HealthProbe>,
    schedule: KeepAliveSchedule,
    mut shutdown: watch::Receiver<bool>,
) {
    let mut wait = schedule.next_interval();

    loop {
        debug!("Next keep-alive ping in {:?}", wait);
        tokio::select! {
            _ = tokio::time::sleep(wait) => {}
            _ = stopped(&mut shutdown) => break,
        }

        let outcome = tokio::select! {
            outcome = probe.probe() => outcome,
            _ = stopped(&mut shutdown) => break,
        };

        wait = match outcome {
            Ok(()) => {
                debug!("Keep-alive ping succeeded");
                schedule.next_interval()
            }
            Err(e) => {
                warn!("Keep-alive ping failed, retrying in {:?}: {}", schedule.retry_backoff, e);
                schedule.retry_backoff
            }
        };
    }

    info!("Keep-alive loop stopped");
}

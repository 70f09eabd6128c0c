//! Connected session against the calendar service.

use std::time::Duration;

use anyhow::{Context, Result};
use commcal_core::{CommcalConfig, HttpStore, ShareLinkCodec, SyncController};
use indicatif::ProgressBar;
use owo_colors::OwoColorize;
use tracing::{debug, warn};

use crate::utils::tui::create_spinner;

const WAKING_POLL: Duration = Duration::from_millis(50);

pub struct Session {
    pub config: CommcalConfig,
    pub controller: SyncController<HttpStore>,
}

impl Session {
    /// Load config, probe the service and load all events.
    ///
    /// Free-tier hosts sleep when idle; while the first probe is slow a
    /// "Waking up the server..." spinner is shown.
    pub async fn connect() -> Result<Self> {
        let config = CommcalConfig::load()?;
        debug!(api = %config.api_base_url, "connecting to calendar service");
        let store = HttpStore::from_config(&config)?;
        let controller =
            SyncController::new(store).with_startup_probe_delay(config.startup_probe_delay());

        {
            let connecting = controller.connect();
            tokio::pin!(connecting);
            let mut ticker = tokio::time::interval(WAKING_POLL);
            let mut spinner: Option<ProgressBar> = None;

            let result = loop {
                tokio::select! {
                    result = &mut connecting => break result,
                    _ = ticker.tick() => {
                        if spinner.is_none() && controller.is_waking() {
                            debug!("calendar service is waking up");
                            spinner = Some(create_spinner("Waking up the server..."));
                        }
                    }
                }
            };

            if let Some(spinner) = spinner {
                spinner.finish_and_clear();
            }
            result.with_context(|| {
                format!("Could not connect to the calendar service at {}", config.api_base_url)
            })?;
        }

        Ok(Session { config, controller })
    }

    pub fn share_codec(&self) -> Result<ShareLinkCodec> {
        Ok(ShareLinkCodec::new(self.config.share_base_url()?))
    }

    /// Print the refresh warning left by the last mutation, if any.
    pub fn report_warning(&self) {
        if let Some(warning) = self.controller.warning() {
            warn!(error = %warning, "refresh after change failed");
            println!(
                "{}",
                format!("Saved, but the calendar could not be refreshed: {}", warning).yellow()
            );
        }
    }
}

use crate::config::HarvestConfig;
use crate::flags::FlagMap;
use bandeiras_scanner::error::Result;
use bandeiras_scanner::{Fetcher, MunicipalityLink, extract_flag_url, extract_municipality_links};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

/// Progress notifications emitted while a harvest runs
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HarvestEvent {
    /// The index page yielded `total` municipalities
    Discovered { total: usize },
    /// About to fetch the `index`-th (1-based) municipality
    Fetching {
        index: usize,
        total: usize,
        name: String,
    },
    Found { name: String, url: String },
    /// The page was fetched but carried no flag or coat of arms
    Missing { name: String },
    FetchFailed { name: String, reason: String },
    Saved { count: usize, path: PathBuf },
}

/// Callback for reporting harvest progress
pub type HarvestProgressCallback = Arc<dyn Fn(HarvestEvent) + Send + Sync>;

/// Counters describing a finished harvest
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HarvestSummary {
    pub discovered: usize,
    pub saved: usize,
    pub missing: usize,
    pub failed: usize,
    /// Entries that replaced an earlier municipality with the same display name
    pub overwritten: usize,
    pub output_path: PathBuf,
}

fn emit(callback: &Option<HarvestProgressCallback>, event: HarvestEvent) {
    if let Some(cb) = callback {
        cb(event);
    }
}

/// Fetch and parse the index page.
///
/// An unreachable index yields an empty list rather than an error.
pub async fn discover_municipalities(
    fetcher: &Fetcher,
    config: &HarvestConfig,
) -> Result<Vec<MunicipalityLink>> {
    let index_url = config.index_url();
    info!("Fetching municipality index {}", index_url);

    let html = match fetcher.fetch(&index_url).await {
        Ok(html) => html,
        Err(_) => return Ok(Vec::new()),
    };

    let links = extract_municipality_links(&html, &config.base_url)?;
    info!("Found {} municipalities", links.len());
    Ok(links)
}

/// Visit each municipality in order and collect its flag URL.
///
/// The configured delay is taken after every municipality, including the
/// last one and those whose page could not be fetched.
pub async fn collect_flags(
    fetcher: &Fetcher,
    config: &HarvestConfig,
    links: &[MunicipalityLink],
    progress_callback: &Option<HarvestProgressCallback>,
) -> Result<(FlagMap, HarvestSummary)> {
    let total = links.len();
    let mut flags = FlagMap::new();
    let mut summary = HarvestSummary {
        discovered: total,
        output_path: config.output_path.clone(),
        ..Default::default()
    };

    for (i, link) in links.iter().enumerate() {
        let index = i + 1;
        emit(
            progress_callback,
            HarvestEvent::Fetching {
                index,
                total,
                name: link.name.clone(),
            },
        );

        match fetcher.fetch(&link.url).await {
            Ok(html) => match extract_flag_url(&html, &config.base_url)? {
                Some(url) => {
                    if let Some(previous) = flags.insert(link.name.clone(), url.clone()) {
                        warn!(
                            "Duplicate municipality name {}: replacing {} with {}",
                            link.name, previous, url
                        );
                        summary.overwritten += 1;
                    }
                    emit(
                        progress_callback,
                        HarvestEvent::Found {
                            name: link.name.clone(),
                            url,
                        },
                    );
                }
                None => {
                    warn!("No flag or coat of arms found for {}", link.name);
                    summary.missing += 1;
                    emit(
                        progress_callback,
                        HarvestEvent::Missing {
                            name: link.name.clone(),
                        },
                    );
                }
            },
            Err(e) => {
                summary.failed += 1;
                emit(
                    progress_callback,
                    HarvestEvent::FetchFailed {
                        name: link.name.clone(),
                        reason: e.to_string(),
                    },
                );
            }
        }

        config.delay.wait().await;
    }

    summary.saved = flags.len();
    Ok((flags, summary))
}

/// Run a full harvest: discover municipalities, collect their flags and
/// write the map to `config.output_path`.
///
/// Fetch failures are skipped; only a failure to write the output aborts.
pub async fn execute_harvest(
    config: &HarvestConfig,
    progress_callback: Option<HarvestProgressCallback>,
) -> Result<HarvestSummary> {
    let fetcher = Fetcher::with_timeout(config.timeout)?;

    let links = discover_municipalities(&fetcher, config).await?;
    emit(
        &progress_callback,
        HarvestEvent::Discovered { total: links.len() },
    );

    let (flags, summary) = collect_flags(&fetcher, config, &links, &progress_callback).await?;

    flags.write_json(&config.output_path)?;
    info!(
        "Saved {} flags to {}",
        flags.len(),
        config.output_path.display()
    );
    emit(
        &progress_callback,
        HarvestEvent::Saved {
            count: flags.len(),
            path: config.output_path.clone(),
        },
    );

    Ok(summary)
}

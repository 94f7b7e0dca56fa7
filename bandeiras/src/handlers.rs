use bandeiras_core::{
    DelayPolicy, HarvestConfig, HarvestEvent, HarvestProgressCallback, HarvestSummary,
    execute_harvest,
};
use clap::ArgMatches;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::debug;
use tracing_subscriber::EnvFilter;
use url::Url;

/// Build the harvest configuration from parsed command line arguments
pub fn config_from_matches(args: &ArgMatches) -> Result<HarvestConfig, String> {
    let base_url = args.get_one::<Url>("base-url").ok_or("Missing --base-url")?;
    let index_path = args
        .get_one::<String>("index-path")
        .ok_or("Missing --index-path")?;
    let output = args.get_one::<PathBuf>("output").ok_or("Missing --output")?;
    let timeout = *args.get_one::<u64>("timeout").unwrap_or(&15);
    let delay_ms = *args.get_one::<u64>("delay-ms").unwrap_or(&1200);

    if !index_path.starts_with('/') {
        return Err(format!("Index path must start with '/': {}", index_path));
    }

    Ok(HarvestConfig::new()
        .with_base_url(base_url.as_str())
        .with_index_path(index_path.as_str())
        .with_output_path(output.clone())
        .with_timeout(Duration::from_secs(timeout))
        .with_delay(DelayPolicy::from_millis(delay_ms)))
}

/// Console line for a progress event, if it has one
pub fn render_event(event: &HarvestEvent) -> Option<String> {
    match event {
        HarvestEvent::Discovered { total } => Some(format!(
            "{} Found {} municipalities to process.",
            "→".blue().bold(),
            total.to_string().cyan()
        )),
        HarvestEvent::Fetching { index, total, name } => Some(format!(
            "[{}/{}] Fetching image for {}...",
            index,
            total,
            name.bright_white()
        )),
        HarvestEvent::Found { url, .. } => Some(format!("   {} {}", "✓".green().bold(), url)),
        HarvestEvent::Missing { .. } => Some(format!(
            "   {} {}",
            "⚠".yellow().bold(),
            "No image found.".yellow()
        )),
        HarvestEvent::FetchFailed { reason, .. } => Some(format!(
            "   {} Fetch failed: {}",
            "✗".red().bold(),
            reason
        )),
        HarvestEvent::Saved { .. } => None,
    }
}

/// Final report printed after the output file is written
pub fn format_summary(summary: &HarvestSummary) -> String {
    let mut report = String::new();
    report.push_str(&format!(
        "\n{} Done! {} flags saved to '{}'.\n",
        "✓".green().bold(),
        summary.saved,
        summary.output_path.display()
    ));
    report.push_str(&format!("  Municipalities found: {}\n", summary.discovered));
    report.push_str(&format!("  Without image: {}\n", summary.missing));
    report.push_str(&format!("  Fetch failures: {}\n", summary.failed));
    if summary.overwritten > 0 {
        report.push_str(&format!(
            "  {} Duplicate names overwritten: {}\n",
            "⚠".yellow(),
            summary.overwritten
        ));
    }
    report
}

/// Install the stderr log subscriber. `RUST_LOG` takes precedence.
pub fn init_logging(verbose: bool) {
    let default_filter = if verbose {
        "info,bandeiras=debug,bandeiras_core=debug,bandeiras_scanner=debug"
    } else {
        "warn"
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn progress_callback(quiet: bool) -> HarvestProgressCallback {
    let bar: Arc<Mutex<Option<ProgressBar>>> = Arc::new(Mutex::new(None));

    Arc::new(move |event: HarvestEvent| {
        let Ok(mut guard) = bar.lock() else {
            return;
        };

        if let HarvestEvent::Discovered { total } = event
            && !quiet
        {
            let pb = ProgressBar::new(total as u64);
            if let Ok(style) = ProgressStyle::default_bar()
                .template("{spinner:.cyan} [{bar:30.cyan/blue}] {pos}/{len} {msg}")
            {
                pb.set_style(style.progress_chars("=> "));
            }
            *guard = Some(pb);
        }

        if quiet {
            return;
        }

        if let Some(line) = render_event(&event) {
            match guard.as_ref() {
                Some(pb) => pb.println(line),
                None => println!("{}", line),
            }
        }

        if let Some(pb) = guard.as_ref() {
            match &event {
                HarvestEvent::Fetching { name, .. } => pb.set_message(name.clone()),
                HarvestEvent::Found { .. }
                | HarvestEvent::Missing { .. }
                | HarvestEvent::FetchFailed { .. } => pb.inc(1),
                HarvestEvent::Saved { .. } => pb.finish_and_clear(),
                HarvestEvent::Discovered { .. } => {}
            }
        }
    })
}

pub async fn handle_harvest(args: &ArgMatches) {
    let quiet = args.get_flag("quiet");
    let verbose = args.get_flag("verbose");
    init_logging(verbose);

    let config = match config_from_matches(args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{} {}", "✗".red().bold(), e);
            std::process::exit(1);
        }
    };

    debug!("Harvest configuration: {:?}", config);

    if !quiet {
        println!(
            "{} Harvesting {}",
            "→".blue().bold(),
            config.index_url().bright_white()
        );
        println!(
            "{} Output: {}\n",
            "→".blue().bold(),
            config.output_path.display().to_string().bright_white()
        );
    }

    match execute_harvest(&config, Some(progress_callback(quiet))).await {
        Ok(summary) => print!("{}", format_summary(&summary)),
        Err(e) => {
            eprintln!("{} Harvest failed: {}", "✗".red().bold(), e);
            std::process::exit(1);
        }
    }
}

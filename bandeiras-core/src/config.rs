use std::path::PathBuf;
use std::time::Duration;

pub use bandeiras_scanner::fetcher::DEFAULT_TIMEOUT;

pub const DEFAULT_BASE_URL: &str = "https://www.mbi.com.br";
pub const DEFAULT_INDEX_PATH: &str =
    "/mbi/biblioteca/simbolopedia/municipios-estado-mato-grosso-br/";
pub const DEFAULT_OUTPUT_FILE: &str = "bandeiras_mt.json";
pub const DEFAULT_DELAY: Duration = Duration::from_millis(1200);

/// Pause taken after each municipality is processed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DelayPolicy {
    /// Sleep for a fixed duration
    Fixed(Duration),
    /// Never sleep
    Disabled,
}

impl DelayPolicy {
    /// `0` disables the delay.
    pub fn from_millis(millis: u64) -> Self {
        if millis == 0 {
            DelayPolicy::Disabled
        } else {
            DelayPolicy::Fixed(Duration::from_millis(millis))
        }
    }

    pub async fn wait(&self) {
        if let DelayPolicy::Fixed(duration) = self {
            tokio::time::sleep(*duration).await;
        }
    }
}

impl Default for DelayPolicy {
    fn default() -> Self {
        DelayPolicy::Fixed(DEFAULT_DELAY)
    }
}

/// Everything a harvest run needs to know about where to read and write.
#[derive(Debug, Clone)]
pub struct HarvestConfig {
    pub base_url: String,
    pub index_path: String,
    pub output_path: PathBuf,
    pub timeout: Duration,
    pub delay: DelayPolicy,
}

impl HarvestConfig {
    pub fn new() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            index_path: DEFAULT_INDEX_PATH.to_string(),
            output_path: PathBuf::from(DEFAULT_OUTPUT_FILE),
            timeout: DEFAULT_TIMEOUT,
            delay: DelayPolicy::default(),
        }
    }

    /// Trailing slashes are dropped, since page paths are appended verbatim.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    pub fn with_index_path(mut self, index_path: impl Into<String>) -> Self {
        self.index_path = index_path.into();
        self
    }

    pub fn with_output_path(mut self, output_path: impl Into<PathBuf>) -> Self {
        self.output_path = output_path.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_delay(mut self, delay: DelayPolicy) -> Self {
        self.delay = delay;
        self
    }

    pub fn index_url(&self) -> String {
        format!("{}{}", self.base_url, self.index_path)
    }
}

impl Default for HarvestConfig {
    fn default() -> Self {
        Self::new()
    }
}

pub mod error;
pub mod fetcher;
pub mod parser;
pub mod result;

pub use error::ScanError;
pub use fetcher::Fetcher;
pub use parser::{
    COAT_OF_ARMS_MARKER, FLAG_MARKER, MUNICIPALITY_PREFIX, STATE_AGGREGATE_MARKER,
    extract_flag_url, extract_municipality_links, title_case,
};
pub use result::MunicipalityLink;

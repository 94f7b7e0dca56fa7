use bandeiras_core::config::{DEFAULT_BASE_URL, DEFAULT_INDEX_PATH, DEFAULT_OUTPUT_FILE};
use clap::arg;
use url::Url;

pub const CLAP_STYLING: clap::builder::styling::Styles = clap::builder::styling::Styles::styled()
    .header(clap_cargo::style::HEADER)
    .usage(clap_cargo::style::USAGE)
    .literal(clap_cargo::style::LITERAL)
    .placeholder(clap_cargo::style::PLACEHOLDER)
    .error(clap_cargo::style::ERROR)
    .valid(clap_cargo::style::VALID)
    .invalid(clap_cargo::style::INVALID);

pub fn command_argument_builder() -> clap::Command {
    clap::Command::new("bandeiras")
        .version(env!("CARGO_PKG_VERSION"))
        .bin_name("bandeiras")
        .about(
            "Harvests municipal flag (or coat-of-arms) thumbnails from the MBI simbolopedia \
            into a JSON map of municipality name to image URL.",
        )
        .styles(CLAP_STYLING)
        .arg(arg!(-q --"quiet" "Suppress banner and per-municipality output").required(false))
        .arg(arg!(-v --"verbose" "Log request details to stderr").required(false))
        .arg(
            arg!(--"base-url" <URL>)
                .required(false)
                .help("Origin the index and municipality paths are appended to")
                .value_parser(clap::value_parser!(Url))
                .default_value(DEFAULT_BASE_URL),
        )
        .arg(
            arg!(--"index-path" <PATH>)
                .required(false)
                .help("Path of the state's municipality listing page")
                .default_value(DEFAULT_INDEX_PATH),
        )
        .arg(
            arg!(-o --"output" <PATH>)
                .required(false)
                .help("Where to write the JSON map (overwritten if present)")
                .value_parser(clap::value_parser!(std::path::PathBuf))
                .default_value(DEFAULT_OUTPUT_FILE),
        )
        .arg(
            arg!(--"timeout" <SECONDS>)
                .required(false)
                .help("Per-request timeout in seconds")
                .value_parser(clap::value_parser!(u64).range(1..))
                .default_value("15"),
        )
        .arg(
            arg!(--"delay-ms" <MILLIS>)
                .required(false)
                .help("Pause after each municipality, in milliseconds (0 disables)")
                .value_parser(clap::value_parser!(u64))
                .default_value("1200"),
        )
}

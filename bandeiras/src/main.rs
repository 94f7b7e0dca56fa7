use bandeiras::{command_argument_builder, handle_harvest};
use colored::Colorize;

fn print_banner() {
    println!("{}", "═".repeat(60).bright_blue().bold());
    println!(
        "{}  {}",
        "  BANDEIRAS".bright_white().bold(),
        format!("v{}", env!("CARGO_PKG_VERSION")).bright_black()
    );
    println!("  municipal flags from the MBI simbolopedia");
    println!("{}", "═".repeat(60).bright_blue().bold());
    println!();
}

#[tokio::main]
async fn main() {
    let matches = command_argument_builder().get_matches();

    if !matches.get_flag("quiet") {
        print_banner();
    }

    handle_harvest(&matches).await;
}

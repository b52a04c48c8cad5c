use colored::*;
use std::path::Path;

// Header printed before each command runs.
pub fn command_banner(title: &str, db: &Path) {
    let bar = "=".repeat(46);
    println!("{}", bar.color(Color::BrightBlue));
    println!("{}", format!("  {title}").color(Color::BrightYellow).bold());
    println!("{}", format!("  store: {}", db.display()).color(Color::White));
    println!("{}", bar.color(Color::BrightBlue));
}

// Print an error and its cause chain.
pub fn print_error(err: &anyhow::Error) {
    eprintln!("{} {}", "Error:".red().bold(), err);
    for cause in err.chain().skip(1) {
        eprintln!("  {} {}", "caused by:".red(), cause);
    }
}

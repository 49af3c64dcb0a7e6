use clap::Parser;
use clap::builder::styling::{AnsiColor, Effects, Styles};

fn get_styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::Cyan.on_default().effects(Effects::BOLD))
        .usage(AnsiColor::Cyan.on_default().effects(Effects::BOLD))
        .literal(AnsiColor::Green.on_default())
        .placeholder(AnsiColor::Yellow.on_default())
        .error(AnsiColor::Red.on_default().effects(Effects::BOLD))
        .valid(AnsiColor::Green.on_default())
        .invalid(AnsiColor::Red.on_default())
}

/// Retrofeed
///
/// A perpetual terminal feed in the style of an old cable-TV info channel.
/// Weather, headlines, market numbers and more are typed out one character
/// at a time, forever, in the order the config's playlist gives.
///
/// Stop it with Ctrl+C.
#[derive(Parser, Debug)]
#[command(author = "Jeff Jetton", about, long_about = None)]
#[command(disable_version_flag = true)]
#[command(styles = get_styles())]
pub struct Args {
    /// Path to the TOML config file.
    /// Defaults to retrofeed.toml in the working directory, then the platform config directory.
    #[arg(value_name = "CONFIG")]
    pub config: Option<String>,

    /// Speed up all pacing, for checking a playlist by eye.
    #[arg(short = 'f', long = "fast", help_heading = "Display Options")]
    pub fast: bool,

    /// Show version information
    #[arg(short = 'V', long = "version", help_heading = "Info")]
    pub version: bool,

    /// Also write logs to stderr.
    /// The feed owns stdout, so by default logs only go to the log file.
    #[arg(long = "debug", help_heading = "Debug")]
    pub debug: bool,

    /// Specify a custom log file path. If not provided, logs will be written to the default location.
    #[arg(long = "log-file", help_heading = "Debug")]
    pub log_file: Option<String>,
}

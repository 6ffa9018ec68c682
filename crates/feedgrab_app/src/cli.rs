use std::path::PathBuf;

use clap::{Parser, ValueEnum};

/// Download every media item between two marker messages of a channel.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// RON configuration file; missing is fine unless given explicitly
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Channel username or id (prompted for when absent)
    #[arg(long, value_parser = non_blank)]
    pub channel: Option<String>,

    /// Number of recent messages to fetch (prompted for when absent)
    #[arg(short, long)]
    pub limit: Option<usize>,

    /// Base directory for downloads
    #[arg(long)]
    pub base_dir: Option<PathBuf>,

    /// Base URL of the message feed service
    #[arg(long)]
    pub api_url: Option<String>,

    /// Where log output goes
    #[arg(long, value_enum, default_value_t = LogTarget::File)]
    pub log: LogTarget,

    /// Log at debug level
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogTarget {
    File,
    Terminal,
    Both,
}

fn non_blank(value: &str) -> Result<String, String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err("channel must not be empty".to_string());
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_channel_is_rejected() {
        assert!(Args::try_parse_from(["feedgrab", "--channel", ""]).is_err());
        assert!(Args::try_parse_from(["feedgrab", "--channel", "   "]).is_err());
    }

    #[test]
    fn channel_is_trimmed() {
        let args = Args::try_parse_from(["feedgrab", "--channel", " @demo "]).unwrap();
        assert_eq!(args.channel.as_deref(), Some("@demo"));
        assert_eq!(args.log, LogTarget::File);
    }
}

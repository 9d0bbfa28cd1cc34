//! Command-line argument parsing

use std::path::PathBuf;

use clap::Parser;

/// Remap mouse and keyboard chords to media, volume and screenshot actions
#[derive(Parser, Debug)]
#[command(name = "chordkey-daemon", version, about)]
pub struct CliArgs {
    /// Config file to use instead of the discovered one
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Validate the config, print the active bindings and exit
    #[arg(long)]
    pub check: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = CliArgs::parse_from(["chordkey-daemon"]);
        assert!(args.config.is_none());
        assert!(!args.check);
    }

    #[test]
    fn test_config_and_check() {
        let args = CliArgs::parse_from(["chordkey-daemon", "--check", "-c", "chords.json"]);
        assert_eq!(args.config, Some(PathBuf::from("chords.json")));
        assert!(args.check);
    }
}

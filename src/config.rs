//! Command-line options.

use std::path::PathBuf;

use clap::Parser;

/// Dodge the bombs, shoot down the aliens.
#[derive(Debug, Clone, Parser)]
#[command(name = "kokaton_barrage", version, about)]
pub struct Cli {
    /// Seed for enemy and bomb randomness (random if omitted)
    #[arg(long)]
    pub seed: Option<u64>,

    /// Where log output goes; the terminal itself is taken by the game
    #[arg(long, default_value = "kokaton_barrage.log")]
    pub log_file: PathBuf,
}

impl Cli {
    /// The seed to use, drawing a fresh one from entropy if none was given.
    pub fn resolve_seed(&self) -> u64 {
        self.seed.unwrap_or_else(rand::random)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let cli = Cli::parse_from(["kokaton_barrage"]);
        assert_eq!(cli.seed, None);
        assert_eq!(cli.log_file, PathBuf::from("kokaton_barrage.log"));
    }

    #[test]
    fn explicit_seed_is_kept() {
        let cli = Cli::parse_from(["kokaton_barrage", "--seed", "7", "--log-file", "/tmp/k.log"]);
        assert_eq!(cli.resolve_seed(), 7);
        assert_eq!(cli.log_file, PathBuf::from("/tmp/k.log"));
    }
}

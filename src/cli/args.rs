//! CLI argument definitions using Clap

use clap::{Args, Parser, Subcommand};

use crate::domain::config::AppConfig;

/// Duplex Recorder - record microphone and system audio into one file
#[derive(Parser, Debug)]
#[command(name = "duplex-recorder")]
#[command(version)]
#[command(about = "Record microphone and system audio at once and save the mix as WAV or MP3")]
#[command(long_about = None)]
pub struct Cli {
    /// Subcommand (interactive menu when omitted)
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List available audio sources
    Devices,
    /// Record both sources without the interactive menu
    Record(RecordArgs),
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Options for a non-interactive recording
#[derive(Args, Debug, Clone, Default)]
pub struct RecordArgs {
    /// Microphone device index (input)
    #[arg(short = 'm', long, value_name = "INDEX")]
    pub mic: Option<usize>,

    /// System audio device index (output)
    #[arg(short = 's', long, value_name = "INDEX")]
    pub system: Option<usize>,

    /// Recording duration (e.g., 30, 10s, 1m, 1m30s)
    #[arg(short = 'd', long, value_name = "TIME")]
    pub duration: Option<String>,

    /// Output format (wav or mp3)
    #[arg(short = 'f', long, value_name = "FORMAT")]
    pub format: Option<String>,

    /// Output file name
    #[arg(short = 'o', long, value_name = "PATH")]
    pub output: Option<String>,
}

impl RecordArgs {
    /// Config overrides given on the command line
    pub fn to_config(&self) -> AppConfig {
        AppConfig {
            duration: self.duration.clone(),
            format: self.format.clone(),
            mic_device: self.mic,
            system_device: self.system,
            output_dir: None,
        }
    }
}

/// Config action subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Create config file with defaults
    Init,
    /// Set a config value
    Set {
        /// Config key
        key: String,
        /// Config value
        value: String,
    },
    /// Get a config value
    Get {
        /// Config key
        key: String,
    },
    /// List all config values
    List,
    /// Show config file path
    Path,
}

/// Valid config keys
pub const VALID_CONFIG_KEYS: &[&str] = &[
    "duration",
    "format",
    "mic_device",
    "system_device",
    "output_dir",
];

/// Check if a config key is valid
pub fn is_valid_config_key(key: &str) -> bool {
    VALID_CONFIG_KEYS.contains(&key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_without_subcommand_is_interactive() {
        let cli = Cli::parse_from(["duplex-recorder"]);
        assert!(cli.command.is_none());
    }

    #[test]
    fn cli_parses_devices() {
        let cli = Cli::parse_from(["duplex-recorder", "devices"]);
        assert!(matches!(cli.command, Some(Commands::Devices)));
    }

    #[test]
    fn cli_parses_record_options() {
        let cli = Cli::parse_from([
            "duplex-recorder",
            "record",
            "--mic",
            "1",
            "-s",
            "4",
            "-d",
            "30s",
            "--format",
            "mp3",
            "-o",
            "call.mp3",
        ]);

        let Some(Commands::Record(args)) = cli.command else {
            panic!("Expected Record command");
        };
        assert_eq!(args.mic, Some(1));
        assert_eq!(args.system, Some(4));
        assert_eq!(args.duration, Some("30s".to_string()));
        assert_eq!(args.format, Some("mp3".to_string()));
        assert_eq!(args.output, Some("call.mp3".to_string()));
    }

    #[test]
    fn cli_rejects_non_numeric_index() {
        let result = Cli::try_parse_from(["duplex-recorder", "record", "--mic", "first"]);
        assert!(result.is_err());
    }

    #[test]
    fn record_args_to_config() {
        let args = RecordArgs {
            mic: Some(2),
            format: Some("wav".to_string()),
            ..Default::default()
        };
        let config = args.to_config();
        assert_eq!(config.mic_device, Some(2));
        assert_eq!(config.format, Some("wav".to_string()));
        assert!(config.system_device.is_none());
        assert!(config.output_dir.is_none());
    }

    #[test]
    fn cli_parses_config_set() {
        let cli = Cli::parse_from(["duplex-recorder", "config", "set", "format", "mp3"]);
        if let Some(Commands::Config {
            action: ConfigAction::Set { key, value },
        }) = cli.command
        {
            assert_eq!(key, "format");
            assert_eq!(value, "mp3");
        } else {
            panic!("Expected Config Set command");
        }
    }

    #[test]
    fn valid_config_keys() {
        assert!(is_valid_config_key("duration"));
        assert!(is_valid_config_key("mic_device"));
        assert!(is_valid_config_key("output_dir"));
        assert!(!is_valid_config_key("api_key"));
    }

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }
}

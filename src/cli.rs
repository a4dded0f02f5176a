//! CLI definitions: argument parsing, subcommands, and help text.

use clap::{ArgAction, Parser, Subcommand};
use clap_complete::Shell;

use crate::core::probe::{DEFAULT_DELAY, DEFAULT_MAX_OUTPUT_TOKENS, DEFAULT_PROMPT};

pub use clap_complete::generate;

const AFTER_HELP: &str = "\
ENVIRONMENT:
  GOOGLE_API_KEY      API key (also read from .env; GEMINI_API_KEY is a fallback)
  GEMINI_BASE_URL     API root (default: https://generativelanguage.googleapis.com/v1beta)
  A .env file in the working directory is loaded first, but variables already
  set in the shell take precedence over it.

EXAMPLES:
  gemini-probe                          Probe every text model visible to your key
  gemini-probe --filter flash           Probe only models whose name matches 'flash'
  gemini-probe --json > probe.json      Write the full run as JSON
  gemini-probe list                     List text models without probing them
  gemini-probe config                   Show config paths and API key status
  gemini-probe config set-api-key       Store an API key (reads stdin)
  gemini-probe completions bash         Generate bash completions
";

/// Command-line arguments for the application.
#[derive(Parser)]
#[command(
    author,
    version,
    about = "Check which Gemini models your API key can actually use",
    after_help = AFTER_HELP
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Prompt sent to each model
    #[arg(long, default_value = DEFAULT_PROMPT)]
    pub prompt: String,

    /// Cap on generated tokens per probe
    #[arg(long, default_value_t = DEFAULT_MAX_OUTPUT_TOKENS)]
    pub max_output_tokens: u32,

    /// Pause between probes, in milliseconds
    #[arg(long, default_value_t = DEFAULT_DELAY.as_millis() as u64)]
    pub delay_ms: u64,

    /// Only include models whose name or display name contains this text
    #[arg(long, global = true)]
    pub filter: Option<String>,

    /// Print JSON instead of a table
    #[arg(long, global = true)]
    pub json: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Per-request timeout in seconds (default: none)
    #[arg(long, global = true, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// API root URL (overrides GEMINI_BASE_URL)
    #[arg(long, global = true, value_name = "URL")]
    pub base_url: Option<String>,

    /// Increase log verbosity (use multiple times for debug)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Reduce log output (errors only)
    #[arg(short = 'q', long = "quiet", global = true)]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List text models visible to the key, without probing them
    List,
    /// Show config paths, base URL, and API key status
    Config {
        #[command(subcommand)]
        subcommand: Option<ConfigSubcommand>,
    },
    /// Generate shell completion script
    Completions {
        /// Shell to generate completions for (bash, zsh, fish, powershell, elvish)
        #[arg(value_parser = clap::value_parser!(Shell))]
        shell: Shell,
    },
}

#[derive(Subcommand)]
pub enum ConfigSubcommand {
    /// Store the API key in the config directory (reads stdin if KEY is omitted)
    SetApiKey {
        /// The API key
        key: Option<String>,
    },
}

impl Args {
    /// Log level based on -v/-q flags: error, warn, info, or debug.
    pub fn log_level(&self) -> &'static str {
        if self.quiet {
            "error"
        } else if self.verbose >= 2 {
            "debug"
        } else if self.verbose >= 1 {
            "info"
        } else {
            "warn"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Args::command().debug_assert();
    }

    #[test]
    fn help_states_dotenv_precedence() {
        let help = Args::command().render_long_help().to_string();
        assert!(help.contains("take precedence over it"));
    }

    #[test]
    fn defaults_match_probe_settings() {
        let args = Args::try_parse_from(["gemini-probe"]).unwrap();
        assert!(args.command.is_none());
        assert_eq!(args.prompt, "Hi");
        assert_eq!(args.max_output_tokens, 1);
        assert_eq!(args.delay_ms, 500);
        assert_eq!(args.timeout, None);
        assert_eq!(args.log_level(), "warn");
    }

    #[test]
    fn global_flags_after_subcommand() {
        let argv = ["gemini-probe", "list", "--filter", "flash", "--json", "-vv"];
        let args = Args::try_parse_from(argv).unwrap();
        assert!(matches!(args.command, Some(Commands::List)));
        assert_eq!(args.filter.as_deref(), Some("flash"));
        assert!(args.json);
        assert_eq!(args.log_level(), "debug");
    }

    #[test]
    fn quiet_wins_over_verbose() {
        let args = Args::try_parse_from(["gemini-probe", "-v", "-q"]).unwrap();
        assert_eq!(args.log_level(), "error");
    }

    #[test]
    fn set_api_key_takes_optional_key() {
        let argv = ["gemini-probe", "config", "set-api-key", "AIza"];
        let args = Args::try_parse_from(argv).unwrap();
        match args.command {
            Some(Commands::Config {
                subcommand: Some(ConfigSubcommand::SetApiKey { key }),
            }) => assert_eq!(key.as_deref(), Some("AIza")),
            _ => panic!("expected config set-api-key"),
        }
    }
}

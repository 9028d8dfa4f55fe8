use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "sentry-youtrack",
    version,
    about = "Link error-tracker issue groups to YouTrack issues"
)]
pub struct Cli {
    /// Output format
    #[arg(long, short = 'o', value_enum, global = true, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// When to colorize output
    #[arg(long, value_enum, global = true, default_value_t = ColorChoice::Auto)]
    pub color: ColorChoice,

    /// Path to the plugin settings TOML file
    #[arg(long, env = "SENTRY_YOUTRACK_SETTINGS", global = true, value_name = "PATH")]
    pub settings: Option<PathBuf>,

    /// JSON file holding project options and group links
    #[arg(
        long,
        env = "SENTRY_YOUTRACK_STORE",
        global = true,
        value_name = "PATH",
        default_value = ".sentry-youtrack.json"
    )]
    pub store: PathBuf,

    /// Host project whose options are used
    #[arg(
        long,
        short = 'p',
        env = "SENTRY_YOUTRACK_PROJECT",
        global = true,
        default_value = "default"
    )]
    pub project: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(ValueEnum, Clone, Debug, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(ValueEnum, Clone, Debug, Copy, Default)]
pub enum ColorChoice {
    /// Colorize output if stdout is a terminal
    #[default]
    Auto,
    /// Always colorize output
    Always,
    /// Never colorize output
    Never,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Project configuration
    #[command(visible_alias = "cfg")]
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },
    /// List YouTrack projects
    Projects,
    /// List the custom fields of the linked project
    Fields,
    /// List priority values
    Priorities,
    /// List issue type values
    IssueTypes,
    /// Search issues of the linked project
    Issues {
        /// Search query
        #[arg(long, short = 'q')]
        query: Option<String>,

        /// Page number, starting at 1
        #[arg(long, default_value_t = 1)]
        page: usize,

        /// Issues per page
        #[arg(long, default_value_t = 15)]
        page_limit: usize,
    },
    /// Create an issue for a group and link it
    Create {
        /// Group id
        #[arg(long, short = 'g')]
        group: String,

        #[arg(long, short = 't')]
        title: Option<String>,

        #[arg(long, short = 'd')]
        description: Option<String>,

        /// Comma separated tags (defaults to the project's default tags)
        #[arg(long)]
        tags: Option<String>,

        /// Custom field value as NAME=VALUE; repeat for multi-value fields
        #[arg(long = "field", short = 'f', value_name = "NAME=VALUE")]
        fields: Vec<String>,
    },
    /// Link a group to an existing issue
    Assign {
        #[arg(long, short = 'g')]
        group: String,

        /// Issue id, e.g. SB-12
        #[arg(long, short = 'i')]
        issue: String,
    },
    /// Store a default value for a custom field
    DefaultField {
        #[arg(long)]
        field: String,

        /// Value to store; empty clears the default
        #[arg(long, default_value = "")]
        value: String,
    },
    /// Show the url of the issue linked to a group
    Url {
        #[arg(long, short = 'g')]
        group: String,

        /// Open the url in a browser
        #[arg(long)]
        open: bool,
    },
    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show stored options and the configuration form
    Show,
    /// Validate and store options
    Set {
        /// YouTrack instance url
        #[arg(long)]
        url: Option<String>,

        #[arg(long)]
        username: Option<String>,

        /// API key; omit to keep the stored one
        #[arg(long)]
        api_key: Option<String>,

        /// YouTrack project id to link
        #[arg(long = "youtrack-project")]
        youtrack_project: Option<String>,

        /// Field hidden from the issue form; repeatable
        #[arg(long = "ignore-field")]
        ignore_fields: Vec<String>,

        /// Comma separated tags added to new issues
        #[arg(long)]
        default_tags: Option<String>,
    },
    /// Forget the stored options
    Reset,
    /// Print the settings file path
    Path,
}

impl Cli {
    /// Generate shell completions and write to stdout
    pub fn generate_completions(shell: Shell) {
        let mut cmd = Cli::command();
        clap_complete::generate(shell, &mut cmd, "sentry-youtrack", &mut std::io::stdout());
    }
}

use clap::{ArgAction, Parser, Subcommand, ValueHint};

#[derive(Parser)]
#[command(
    author,
    version,
    about,
    help_template = "{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}",
    arg_required_else_help = true
)]
pub struct Args {
    /// Set output verbosity
    #[arg(short = 'v', long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress outputs
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output as json
    #[arg(short, long, global = true)]
    pub json: bool,

    /// Disable colors in output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Provide custom config file
    #[arg(short, long, global = true, value_hint = ValueHint::FilePath)]
    pub config: Option<String>,

    /// Make requests as this user instead of anonymously
    #[arg(long = "as", global = true, value_name = "USER")]
    pub as_user: Option<String>,

    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the configuration file to stdout
    Config,

    /// Generate default config
    #[clap(name = "defconfig")]
    DefConfig,

    /// View env
    Env,

    /// Publish an archive under a reference
    #[command(arg_required_else_help = true)]
    Publish {
        /// Reference to publish, e.g. trusty/wordpress or ~bob/trusty/mysql-3
        #[arg(required = true)]
        reference: String,

        /// Path to the archive
        #[arg(required = true, value_hint = ValueHint::FilePath)]
        archive: String,

        /// Extra info stored with the entity, as key=value
        #[arg(required = false, short, long = "extra")]
        extra: Vec<String>,
    },

    /// Resolve references to their preferred fully-qualified form
    #[command(arg_required_else_help = true)]
    #[clap(name = "resolve", visible_alias = "r")]
    Resolve {
        /// References to resolve
        #[arg(required = true)]
        references: Vec<String>,
    },

    /// List the revisions published in a reference's series
    #[command(arg_required_else_help = true)]
    #[clap(name = "revision-info", visible_alias = "revisions")]
    RevisionInfo {
        /// Reference to inspect
        #[arg(required = true)]
        reference: String,
    },

    /// Serve a request path, e.g. wordpress/meta/id
    #[command(arg_required_else_help = true)]
    Get {
        /// Request paths
        #[arg(required = true)]
        paths: Vec<String>,
    },

    /// List published entities
    #[clap(name = "list", visible_alias = "ls")]
    List {
        /// Only entities with this name
        #[arg(required = false, short, long)]
        name: Option<String>,

        /// Only entities owned by this user
        #[arg(required = false, short, long)]
        user: Option<String>,

        /// Only entities in this series
        #[arg(required = false, short, long)]
        series: Option<String>,

        /// Maximum number of entities to show
        #[arg(required = false, short, long)]
        limit: Option<usize>,
    },

    /// Set who may read a package
    #[command(arg_required_else_help = true)]
    Grant {
        /// Package whose read ACL is replaced
        #[arg(required = true)]
        reference: String,

        /// Users allowed to read
        #[arg(required_unless_present = "everyone", conflicts_with = "everyone")]
        users: Vec<String>,

        /// Allow anyone to read, including anonymous callers
        #[arg(required = false, long)]
        everyone: bool,
    },
}

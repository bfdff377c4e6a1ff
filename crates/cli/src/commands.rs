use clap::Subcommand;

#[derive(Subcommand)]
pub enum Commands {
    /// Run one batch-extraction pass against a CSV source
    Extract {
        #[arg(
            long,
            help = "CSV file with RowKey, SubscriberKey and EmailAddress columns"
        )]
        source: String,

        #[arg(long, help = "Records routed into a batch before it rolls over")]
        capacity: Option<usize>,

        #[arg(long, help = "Rows fetched per source page")]
        page_size: Option<usize>,

        #[arg(long, help = "State directory (defaults to ~/.cull)")]
        state_dir: Option<String>,

        #[arg(long, help = "Prefix for active container keys")]
        active_prefix: Option<String>,

        #[arg(long, help = "Prefix for backup container keys")]
        backup_prefix: Option<String>,
    },

    /// Retire the next pending batch through the provider's bulk-delete API
    Delete {
        #[arg(long, help = "State directory (defaults to ~/.cull)")]
        state_dir: Option<String>,

        #[arg(
            long,
            help = "Truncate the local container store instead of calling the provider"
        )]
        local: bool,

        #[arg(long, help = "Prefix for active container keys")]
        active_prefix: Option<String>,

        #[arg(long, help = "Prefix for backup container keys")]
        backup_prefix: Option<String>,
    },

    /// Show the latest committed ledger entries
    Progress {
        #[arg(long, help = "State directory (defaults to ~/.cull)")]
        state_dir: Option<String>,

        #[arg(long, help = "Print the entries as JSON instead of a table")]
        json: bool,
    },
}

use clap::{Args, Parser, Subcommand};

use crate::domain::model::{NewGroup, UserFilters, ALL};

#[derive(Parser, Debug)]
#[command(name = "groupmate")]
#[command(about = "Find, join and manage study groups")]
pub struct Cli {
    /// Backend address (overrides settings.yaml)
    #[arg(long, global = true, env = "GROUPMATE_SERVER")]
    pub server: Option<String>,

    /// Session cookie copied from a logged-in browser
    #[arg(long, global = true, env = "GROUPMATE_SESSION", hide_env_values = true)]
    pub session: Option<String>,

    /// Debug logging on stderr
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List groups matching the filters, with recommendations
    Browse {
        #[command(flatten)]
        filters: FilterArgs,
    },
    /// Show the best matches for the filters
    Recommend {
        #[command(flatten)]
        filters: FilterArgs,

        /// Ask the backend for matches based on your history instead
        #[arg(long)]
        server_side: bool,
    },
    /// Join a group by id
    Join {
        group_id: String,

        /// Filters for the refreshed listing shown afterwards
        #[command(flatten)]
        filters: FilterArgs,
    },
    /// Create a new group as the logged-in user
    Create(CreateArgs),
    /// List groups you created or joined
    Mine {
        /// Only show groups whose subject, goal, id or location contains this
        #[arg(long, short = 's')]
        search: Option<String>,
    },
    /// Delete a group you created
    Delete {
        group_id: String,

        /// Skip the confirmation prompt
        #[arg(long, short = 'y')]
        yes: bool,
    },
    /// Show a group and its members
    Show { group_id: String },
    /// List the subject and goal codes accepted by the filters
    Options,
    /// Show the logged-in user
    Whoami,
}

#[derive(Args, Debug, Clone)]
pub struct FilterArgs {
    /// Subject code, or "all"
    #[arg(long, default_value = ALL)]
    pub subject: String,

    /// Goal code, or "all"
    #[arg(long, default_value = ALL)]
    pub goal: String,

    /// Date range: today, thisWeek, nextWeek or all
    #[arg(long, default_value = ALL)]
    pub date: String,
}

impl FilterArgs {
    pub fn to_filters(&self) -> UserFilters {
        UserFilters::new(&self.subject, &self.goal, &self.date)
    }
}

#[derive(Args, Debug, Clone)]
pub struct CreateArgs {
    #[arg(long)]
    pub subject: String,

    #[arg(long)]
    pub goal: String,

    /// Meeting day as YYYY-MM-DD
    #[arg(long)]
    pub date: String,

    #[arg(long)]
    pub time: String,

    #[arg(long)]
    pub location: String,

    /// Defaults to 5
    #[arg(long)]
    pub max_members: Option<u32>,
}

impl From<CreateArgs> for NewGroup {
    fn from(args: CreateArgs) -> Self {
        NewGroup {
            subject: args.subject,
            goal: args.goal,
            date: args.date,
            time: args.time,
            location: args.location,
            max_members: args.max_members,
        }
    }
}

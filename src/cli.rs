use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::types::{Facet, FilterSet, TicketProperties};

#[derive(Parser)]
#[command(name = "helpdesk")]
#[command(about = "Browse and triage helpdesk tickets")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// One optional value per ticket facet
#[derive(Args, Debug, Clone, Default)]
pub struct FacetArgs {
    /// Ticket category
    #[arg(long)]
    pub category: Option<String>,

    /// Ticket type
    #[arg(short = 't', long = "type")]
    pub ticket_type: Option<String>,

    /// Ticket priority
    #[arg(short, long)]
    pub priority: Option<String>,

    /// Ticket status
    #[arg(short, long)]
    pub status: Option<String>,

    /// Assigned agent
    #[arg(short, long)]
    pub agent: Option<String>,
}

impl FacetArgs {
    fn pairs(&self) -> [(Facet, &Option<String>); 5] {
        [
            (Facet::Category, &self.category),
            (Facet::Type, &self.ticket_type),
            (Facet::Priority, &self.priority),
            (Facet::Status, &self.status),
            (Facet::Agent, &self.agent),
        ]
    }

    pub fn to_filters(&self) -> FilterSet {
        self.pairs()
            .into_iter()
            .fold(FilterSet::new(), |acc, (facet, value)| match value {
                Some(v) => acc.with(facet, v.clone()),
                None => acc,
            })
    }

    pub fn to_properties(&self) -> TicketProperties {
        self.pairs()
            .into_iter()
            .fold(TicketProperties::new(), |acc, (facet, value)| match value {
                Some(v) => acc.with(facet, v.clone()),
                None => acc,
            })
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// List one page of tickets
    #[command(visible_alias = "l")]
    Ls {
        /// Page number (starting at 1)
        #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
        page: u32,

        #[command(flatten)]
        filters: FacetArgs,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Change facets of a ticket and show the refreshed page
    #[command(visible_alias = "u")]
    Update {
        /// Ticket ID
        id: u64,

        #[command(flatten)]
        properties: FacetArgs,

        /// Page to show after the update
        #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
        page: u32,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Open a new ticket
    #[command(visible_alias = "c")]
    Create {
        /// Ticket title
        title: String,

        /// Ticket type
        #[arg(short = 't', long = "type")]
        ticket_type: String,

        /// Ticket category
        #[arg(long)]
        category: String,

        /// Description, posted as the first reply
        #[arg(short, long, default_value = "")]
        description: String,

        /// File to attach to the first reply
        #[arg(long)]
        attach: Option<PathBuf>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Delete a ticket
    Delete {
        /// Ticket ID
        id: u64,

        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Set a configuration value
    Set {
        /// Configuration key (url, auth.nonce, auth.username, auth.app_password, timeout_secs)
        key: String,
        /// Value to set
        value: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Get a configuration value
    Get {
        /// Configuration key (url, auth.nonce, auth.username, auth.app_password, timeout_secs)
        key: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

pub mod cli;
pub mod commands;
pub mod config;
pub mod controller;
pub mod error;
pub mod filter;
pub mod notify;
pub mod query;
pub mod remote;
pub mod types;

pub use config::Config;
pub use controller::{FetchOutcome, ListSnapshot, LoadPhase, TicketListController};
pub use error::{HelpdeskError, Result};
pub use filter::FilterStore;
pub use notify::{Notification, NotificationKind, Notifier, TracingNotifier};
pub use query::TicketQuery;
pub use remote::{
    Attachment, CreationReport, CreationStep, Credential, NewTicket, RestClient, StepOutcome,
    TicketCreationService, TicketMutationService, TicketQueryService,
};
pub use types::{Facet, FilterSet, PageResult, Ticket, TicketProperties};

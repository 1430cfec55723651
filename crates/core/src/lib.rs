pub mod batch;
pub mod config;
pub mod glpi;
pub mod loader;
pub mod testing;

pub use batch::{
    spawn_batch, submit, BatchError, BatchHandle, BatchProgress, BatchRun, BatchRunResult,
    CancelSignal, FailureDetail, FailureKind,
};
pub use config::{
    load_config, load_config_from_str, load_env_config, validate_config, BatchConfig, Config,
    ConfigError, GlpiConfig, SanitizedConfig,
};
pub use glpi::{
    CreateTicketOutcome, GlpiHttpClient, SessionContext, SessionError, TicketInput,
    TicketPayload, TicketingApi, TicketingError,
};
pub use loader::{
    export_template, load, load_file, LoadReport, LoaderError, RejectedRow, RejectionReason,
    TicketRequestRow, TEMPLATE_CSV,
};

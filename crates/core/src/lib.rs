pub mod assembler;
pub mod barcode;
pub mod config;
pub mod form;
pub mod metrics;
pub mod orchestrator;
pub mod resolver;
pub mod testing;

pub use assembler::{AssemblerError, AssemblyReport, TemplateAssembler, TemplateConfig};
pub use barcode::{BarcodeEncoder, BarcodeError, Code128Encoder, Code128Options};
pub use config::{
    load_config, load_config_from_env, load_config_from_str, validate_config, Config,
    ConfigError, RecipientConfig, RunConfig,
};
pub use form::{FormField, FormFieldMap};
pub use orchestrator::{
    JobOrchestrator, JobOutcome, OrchestratorConfig, RunMode, RunPlan, RunSummary,
};
pub use resolver::{
    PochtaResolver, Resolution, ResolutionStatus, ResolverConfig, ResolverError, ResolverState,
    TrackingResolver,
};

//! Seams the orchestration core consumes. Implementations live in other crates
//! or outside the workspace.

pub mod advisor;
pub mod context_resolver;
pub mod context_source;
pub mod degradation_policy;

pub use advisor::IAdvisor;
pub use context_resolver::IContextResolver;
pub use context_source::IContextSource;
pub use degradation_policy::IDegradationPolicy;

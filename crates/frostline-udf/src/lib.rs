//! # frostline-udf
//!
//! Deployment of a locally available model artifact as a callable function
//! in the remote engine:
//! - **Registry**: resolves logical dependency names to the highest-versioned
//!   local artifact
//! - **Templates**: placeholder substitution producing the create-function
//!   statement text
//! - **Deployer**: stages the model and its dependencies, creates the
//!   function and builds the invocation query over an input row source
//!
//! Staged artifacts are deliberately left in place when a deployment fails:
//! the per-artifact and shared dependency stages double as a cache, so a
//! retry (or a later deployment of the same model) finds its files already
//! staged and transfers nothing.

pub mod deploy;
pub mod error;
pub mod function;
pub mod registry;
pub mod template;
pub mod variables;

// Re-export commonly used types
pub use deploy::{UdfDeployer, DEPENDENCY_STAGE};
pub use error::{Result, UdfError};
pub use function::{DeployedFunction, FunctionSpec, InputRelation, InvocationArity};
pub use registry::{ArtifactRegistry, DirectoryRegistry};
pub use template::{render, TemplateCatalog};

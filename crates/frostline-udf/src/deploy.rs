//! Function deployment orchestration.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use frostline_commons::{
    CancelToken, Dialect, FileTransport, ProgressSink, PutOptions, RemoteFileLister,
    StatementExecutor,
};
use frostline_staging::{Stage, StageKind, StageManager, StageUploader};

use crate::error::{Result, UdfError};
use crate::function::{DeployedFunction, FunctionSpec, InputRelation, InvocationArity};
use crate::registry::ArtifactRegistry;
use crate::template::{render, TemplateCatalog};
use crate::variables::{build_variables, function_name_for, StagedImport};

/// Shared stage caching dependency artifacts across deployments.
pub const DEPENDENCY_STAGE: &str = "FROSTLINE_UDF_LIBS";

/// Prefix of the per-artifact model stages.
const MODEL_STAGE_PREFIX: &str = "FROSTLINE_";

/// Deploys model artifacts as callable functions.
pub struct UdfDeployer {
    executor: Arc<dyn StatementExecutor>,
    dialect: Arc<dyn Dialect>,
    stages: StageManager,
    uploader: StageUploader,
    registry: Arc<dyn ArtifactRegistry>,
    templates: TemplateCatalog,
}

impl UdfDeployer {
    pub fn new(
        executor: Arc<dyn StatementExecutor>,
        dialect: Arc<dyn Dialect>,
        lister: Arc<dyn RemoteFileLister>,
        transport: Arc<dyn FileTransport>,
        registry: Arc<dyn ArtifactRegistry>,
        templates: TemplateCatalog,
    ) -> Self {
        let stages = StageManager::new(Arc::clone(&executor), Arc::clone(&dialect));
        let uploader = StageUploader::new(lister, transport);
        Self {
            executor,
            dialect,
            stages,
            uploader,
            registry,
            templates,
        }
    }

    /// Deploys the function described by `spec` and builds the query that
    /// invokes it over `source`.
    ///
    /// The model artifact goes into a per-artifact stage and dependency
    /// artifacts into the shared dependency stage; both uploads skip files
    /// already staged, so re-deploying an unchanged model transfers
    /// nothing. The create-function statement is executed here; the
    /// returned invocation query is not.
    pub async fn deploy(
        &self,
        spec: &FunctionSpec,
        source: &InputRelation,
        progress: &dyn ProgressSink,
        cancel: &CancelToken,
    ) -> Result<DeployedFunction> {
        let inputs = spec.effective_inputs(source)?;
        let model_file = file_name_of(&spec.model_artifact)?;

        let mut dependency_files = Vec::with_capacity(spec.dependencies.len());
        for logical_name in &spec.dependencies {
            dependency_files.push(self.registry.resolve(logical_name)?);
        }

        progress.set_message("Preparing staging areas");
        let model_stage = self
            .stages
            .ensure_stage(&model_stage_name(&model_file), StageKind::PerArtifact, &[])
            .await?;
        let dependency_stage = self
            .stages
            .ensure_stage(DEPENDENCY_STAGE, StageKind::Named, &[])
            .await?;
        progress.set_fraction(0.2);

        let put_options = PutOptions {
            auto_compress: false,
            source_compression: None,
            overwrite: true,
        };
        progress.set_message("Uploading model and dependency artifacts");
        let model_paths = [spec.model_artifact.clone()];
        self.uploader
            .upload(model_stage.reference(), &model_paths, &put_options, progress, cancel)
            .await
            .map_err(UdfError::Upload)?;
        self.uploader
            .upload(
                dependency_stage.reference(),
                &dependency_files,
                &put_options,
                progress,
                cancel,
            )
            .await
            .map_err(UdfError::Upload)?;
        progress.set_fraction(0.6);

        let function_name = function_name_for(&model_file);
        let imports = staged_imports(&model_stage, &model_file, &dependency_stage, &dependency_files)?;
        let variables = build_variables(
            &function_name,
            spec,
            &inputs,
            &imports,
            model_stage.reference(),
            &model_file,
            self.dialect.as_ref(),
        )?;
        let template = self.templates.load(spec.arity())?;
        let create_statement = render(&template, &variables);

        if cancel.check().is_err() {
            return Err(UdfError::Cancelled);
        }
        progress.set_message(&format!("Creating function {function_name}"));
        self.executor
            .execute(&create_statement)
            .await
            .map_err(|source| UdfError::CreateFunction {
                name: function_name.clone(),
                source,
            })?;
        progress.set_fraction(1.0);
        log::debug!("Created function {function_name} from artifact '{model_file}'");

        let input_names: Vec<String> = inputs.iter().map(|column| column.name.clone()).collect();
        let invocation_query = self.invocation_query(&function_name, spec, &input_names, source);
        Ok(DeployedFunction {
            name: function_name,
            arity: spec.arity(),
            create_statement,
            invocation_query,
            input_columns: input_names,
        })
    }

    /// Builds the query joining the input row source to the function call.
    fn invocation_query(
        &self,
        function_name: &str,
        spec: &FunctionSpec,
        input_names: &[String],
        source: &InputRelation,
    ) -> String {
        let arguments: Vec<String> = input_names
            .iter()
            .map(|name| self.dialect.delimit(name))
            .collect();
        let arguments = arguments.join(",");
        let from = self.dialect.as_table(&source.query, "t");
        match spec.arity() {
            InvocationArity::Scalar => {
                let output = self.dialect.delimit(&spec.output_columns[0].name);
                format!("SELECT *, {function_name}({arguments}) AS {output} FROM {from}")
            }
            InvocationArity::Tabular => {
                let outputs: Vec<String> = spec
                    .output_columns
                    .iter()
                    .map(|column| format!("u.{}", self.dialect.delimit(&column.name)))
                    .collect();
                format!(
                    "SELECT t.*, {} FROM {from}, TABLE({function_name}({arguments})) AS u",
                    outputs.join(", ")
                )
            }
        }
    }
}

/// Stage name for a model artifact. The engine case-folds staged names, so
/// the name is upper-cased up front to make that explicit.
fn model_stage_name(model_file: &str) -> String {
    format!("{MODEL_STAGE_PREFIX}{}", model_file.to_uppercase())
}

fn file_name_of(path: &Path) -> Result<String> {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .ok_or_else(|| {
            UdfError::InvalidSpec(format!("artifact path has no file name: {}", path.display()))
        })
}

fn staged_imports(
    model_stage: &Stage,
    model_file: &str,
    dependency_stage: &Stage,
    dependency_files: &[PathBuf],
) -> Result<Vec<StagedImport>> {
    let mut imports = Vec::with_capacity(dependency_files.len() + 1);
    imports.push(StagedImport {
        stage: model_stage.reference().to_string(),
        file_name: model_file.to_string(),
    });
    for path in dependency_files {
        imports.push(StagedImport {
            stage: dependency_stage.reference().to_string(),
            file_name: file_name_of(path)?,
        });
    }
    Ok(imports)
}

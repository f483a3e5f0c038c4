//! Function deployment specification and handle.

use std::path::PathBuf;

use frostline_commons::Column;

use crate::error::{Result, UdfError};

/// How the deployed function is invoked from SQL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvocationArity {
    /// One value per input row; selected as an extra column.
    Scalar,
    /// A row per input row; consumed through a lateral table join.
    Tabular,
}

/// Everything needed to deploy one model artifact as a function.
#[derive(Debug, Clone)]
pub struct FunctionSpec {
    /// The packaged model file to deploy.
    pub model_artifact: PathBuf,
    /// Input feature names as recorded in the model, in model order.
    pub model_columns: Vec<String>,
    /// The model's response column; never used as a function input.
    pub response_column: Option<String>,
    /// Caller-selected input columns overriding the model's own list.
    pub input_override: Option<Vec<String>>,
    /// Function outputs in order; the first is the primary prediction,
    /// the rest are auxiliary/probability outputs.
    pub output_columns: Vec<Column>,
    /// Logical names of runtime dependency artifacts.
    pub dependencies: Vec<String>,
    /// Fully qualified predictor class backing the function body.
    pub predictor_class: String,
    pub convert_unknown_levels_to_na: bool,
    pub fail_on_predict_error: bool,
}

impl FunctionSpec {
    /// Arity is determined by the number of output columns.
    pub fn arity(&self) -> InvocationArity {
        if self.output_columns.len() == 1 {
            InvocationArity::Scalar
        } else {
            InvocationArity::Tabular
        }
    }

    /// The function's input columns, typed from the input relation.
    ///
    /// Model columns (or the caller's override) are matched against the
    /// relation by name; the response column and columns absent from the
    /// relation are dropped.
    pub fn effective_inputs(&self, source: &InputRelation) -> Result<Vec<Column>> {
        let names = self.input_override.as_ref().unwrap_or(&self.model_columns);
        let inputs: Vec<Column> = names
            .iter()
            .filter(|name| Some(name.as_str()) != self.response_column.as_deref())
            .filter_map(|name| source.column(name).cloned())
            .collect();
        if inputs.is_empty() {
            return Err(UdfError::InvalidSpec(format!(
                "none of the model input columns are present in the input relation \
                 (model columns: {:?})",
                names
            )));
        }
        Ok(inputs)
    }
}

/// The row source the deployed function is invoked over.
#[derive(Debug, Clone)]
pub struct InputRelation {
    /// Query producing the input rows.
    pub query: String,
    /// Columns of the query result.
    pub columns: Vec<Column>,
}

impl InputRelation {
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|column| column.name == name)
    }
}

/// Handle to a successfully deployed function.
///
/// The create statement has already been executed; the invocation query has
/// not — running it is the caller's move.
#[derive(Debug, Clone)]
pub struct DeployedFunction {
    pub name: String,
    pub arity: InvocationArity,
    pub create_statement: String,
    pub invocation_query: String,
    /// Input column names the invocation passes to the function.
    pub input_columns: Vec<String>,
}

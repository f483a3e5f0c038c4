//! Builds the variable map consumed by the function templates.

use std::collections::HashMap;

use frostline_commons::{Column, Dialect, LogicalType};
use uuid::Uuid;

use crate::error::{Result, UdfError};
use crate::function::FunctionSpec;

/// SQL argument/return type for a logical column type.
pub fn sql_type(logical_type: LogicalType) -> &'static str {
    match logical_type {
        LogicalType::Integer => "INTEGER",
        LogicalType::BigInt => "BIGINT",
        LogicalType::Double => "DOUBLE",
        LogicalType::Varchar => "VARCHAR",
        LogicalType::DoubleArray => "ARRAY",
    }
}

/// Parameter/field type in the generated function body.
pub fn value_type(logical_type: LogicalType) -> &'static str {
    match logical_type {
        LogicalType::Integer => "Integer",
        LogicalType::BigInt => "Long",
        LogicalType::Double => "Double",
        LogicalType::Varchar => "String",
        LogicalType::DoubleArray => "double[]",
    }
}

/// Derives the unique function name from the artifact file name.
///
/// The name must be a valid unquoted identifier: a letter prefix, then
/// letters, digits and underscores only. Every other character of the file
/// name is replaced, and a fresh suffix makes the name unique per
/// deployment.
pub fn function_name_for(artifact_file_name: &str) -> String {
    let mut name = String::with_capacity(artifact_file_name.len() + 34);
    name.push('f');
    for ch in artifact_file_name.chars() {
        name.push(if ch.is_ascii_alphanumeric() { ch } else { '_' });
    }
    name.push('_');
    name.push_str(&Uuid::new_v4().simple().to_string());
    name
}

/// Field name for an output column in the generated function body.
///
/// The engine matches output row fields to declared column names
/// case-insensitively, so lowercasing is safe here.
fn field_name_for(column_name: &str) -> String {
    let mut name = String::with_capacity(column_name.len());
    for ch in column_name.chars() {
        if ch.is_ascii_alphanumeric() {
            name.extend(ch.to_lowercase());
        } else {
            name.push('_');
        }
    }
    if name.chars().next().map_or(true, |c| c.is_ascii_digit()) {
        name.insert(0, 'c');
    }
    name
}

/// One staged artifact referenced from the generated function's imports.
pub struct StagedImport {
    /// Stage reference without the leading `@`.
    pub stage: String,
    pub file_name: String,
}

/// Assembles the full variable map for one deployment.
///
/// All values are fully pre-rendered strings; the template layer performs no
/// nested expansion.
pub fn build_variables(
    function_name: &str,
    spec: &FunctionSpec,
    inputs: &[Column],
    imports: &[StagedImport],
    model_stage: &str,
    model_file: &str,
    dialect: &dyn Dialect,
) -> Result<HashMap<String, String>> {
    if spec.output_columns.is_empty() {
        return Err(UdfError::InvalidSpec(
            "a function needs at least one output column".to_string(),
        ));
    }

    let mut input_arguments = Vec::with_capacity(inputs.len());
    let mut input_parameters = Vec::with_capacity(inputs.len());
    let mut input_variables = Vec::with_capacity(inputs.len());
    let mut column_names = Vec::with_capacity(inputs.len());
    for (i, column) in inputs.iter().enumerate() {
        input_arguments.push(format!("v{i} {}", sql_type(column.logical_type)));
        input_parameters.push(format!("{} p{i}", value_type(column.logical_type)));
        input_variables.push(format!("p{i}"));
        column_names.push(format!("\"{}\"", column.name));
    }

    let mut output_arguments = Vec::with_capacity(spec.output_columns.len());
    let mut field_declarations = Vec::with_capacity(spec.output_columns.len());
    let mut field_initializations = Vec::with_capacity(spec.output_columns.len());
    for (i, column) in spec.output_columns.iter().enumerate() {
        let field = field_name_for(&column.name);
        output_arguments.push(format!(
            "{} {}",
            dialect.delimit(&column.name),
            sql_type(column.logical_type)
        ));
        field_declarations.push(format!("public {} {};", value_type(column.logical_type), field));
        if i == 0 {
            field_initializations.push(format!(
                "row.{field} = ({}) PREDICTOR.result();",
                value_type(column.logical_type)
            ));
        } else {
            field_initializations.push(format!("row.{field} = PREDICTOR.distribution()[{}];", i - 1));
        }
    }

    let import_refs: Vec<String> = imports
        .iter()
        .map(|import| format!("'@{}/{}'", import.stage, import.file_name))
        .collect();

    let primary = &spec.output_columns[0];
    let mut variables = HashMap::new();
    variables.insert("function_name".to_string(), function_name.to_string());
    variables.insert("input_arguments".to_string(), input_arguments.join(", "));
    variables.insert("input_parameters".to_string(), input_parameters.join(", "));
    variables.insert("input_variables".to_string(), input_variables.join(", "));
    variables.insert("column_names".to_string(), column_names.join(", "));
    variables.insert("imports".to_string(), import_refs.join(", "));
    variables.insert("model_stage".to_string(), model_stage.to_string());
    variables.insert("model_file".to_string(), model_file.to_string());
    variables.insert("predictor_class".to_string(), spec.predictor_class.clone());
    variables.insert("result_sql_type".to_string(), sql_type(primary.logical_type).to_string());
    variables.insert(
        "result_value_type".to_string(),
        value_type(primary.logical_type).to_string(),
    );
    variables.insert("output_arguments".to_string(), output_arguments.join(", "));
    variables.insert("field_declarations".to_string(), field_declarations.join("\n    "));
    variables.insert(
        "field_initializations".to_string(),
        field_initializations.join("\n        "),
    );
    variables.insert(
        "convert_unknown_levels".to_string(),
        spec.convert_unknown_levels_to_na.to_string(),
    );
    variables.insert("fail_on_error".to_string(), spec.fail_on_predict_error.to_string());
    Ok(variables)
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use frostline_commons::StandardDialect;

    use super::*;

    fn is_valid_identifier(name: &str) -> bool {
        let mut chars = name.chars();
        matches!(chars.next(), Some(c) if c.is_ascii_alphabetic())
            && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
    }

    #[test]
    fn function_names_are_valid_identifiers() {
        for file_name in ["gbm-model-2.zip", "model.zip", "7-segments.mojo", "weird name!.bin"] {
            let name = function_name_for(file_name);
            assert!(is_valid_identifier(&name), "invalid name: {name}");
        }
    }

    #[test]
    fn function_names_are_unique_per_call() {
        assert_ne!(function_name_for("model.zip"), function_name_for("model.zip"));
    }

    #[test]
    fn field_names_are_safe_for_generated_code() {
        assert_eq!(field_name_for("prediction"), "prediction");
        assert_eq!(field_name_for("P1 (yes)"), "p1__yes_");
        assert_eq!(field_name_for("0prob"), "c0prob");
    }

    fn spec(outputs: Vec<Column>) -> FunctionSpec {
        FunctionSpec {
            model_artifact: PathBuf::from("/models/churn.zip"),
            model_columns: vec!["A".to_string(), "B".to_string()],
            response_column: None,
            input_override: None,
            output_columns: outputs,
            dependencies: Vec::new(),
            predictor_class: "scoring.Predictor".to_string(),
            convert_unknown_levels_to_na: true,
            fail_on_predict_error: false,
        }
    }

    #[test]
    fn input_lists_are_aligned() {
        use frostline_commons::LogicalType::{Double, Varchar};
        let inputs = vec![Column::new("A", Double), Column::new("B", Varchar)];
        let variables = build_variables(
            "f1",
            &spec(vec![Column::new("prediction", Double)]),
            &inputs,
            &[],
            "STAGE",
            "churn.zip",
            &StandardDialect,
        )
        .unwrap();
        assert_eq!(variables["input_arguments"], "v0 DOUBLE, v1 VARCHAR");
        assert_eq!(variables["input_parameters"], "Double p0, String p1");
        assert_eq!(variables["input_variables"], "p0, p1");
        assert_eq!(variables["column_names"], "\"A\", \"B\"");
        assert_eq!(variables["result_sql_type"], "DOUBLE");
        assert_eq!(variables["result_value_type"], "Double");
    }

    #[test]
    fn output_fields_split_prediction_and_distribution() {
        use frostline_commons::LogicalType::{Double, Varchar};
        let outputs = vec![
            Column::new("prediction", Varchar),
            Column::new("prob0", Double),
            Column::new("prob1", Double),
        ];
        let variables = build_variables(
            "f1",
            &spec(outputs),
            &[Column::new("A", Double)],
            &[],
            "STAGE",
            "churn.zip",
            &StandardDialect,
        )
        .unwrap();
        assert_eq!(
            variables["output_arguments"],
            "\"prediction\" VARCHAR, \"prob0\" DOUBLE, \"prob1\" DOUBLE"
        );
        assert!(variables["field_declarations"].contains("public String prediction;"));
        assert!(variables["field_initializations"]
            .contains("row.prediction = (String) PREDICTOR.result();"));
        assert!(variables["field_initializations"].contains("row.prob0 = PREDICTOR.distribution()[0];"));
        assert!(variables["field_initializations"].contains("row.prob1 = PREDICTOR.distribution()[1];"));
    }

    #[test]
    fn imports_reference_every_staged_artifact() {
        use frostline_commons::LogicalType::Double;
        let imports = vec![
            StagedImport {
                stage: "\"FROSTLINE_CHURN.ZIP\"".to_string(),
                file_name: "churn.zip".to_string(),
            },
            StagedImport {
                stage: "\"FROSTLINE_UDF_LIBS\"".to_string(),
                file_name: "genmodel-3.42.0.jar".to_string(),
            },
        ];
        let variables = build_variables(
            "f1",
            &spec(vec![Column::new("prediction", Double)]),
            &[Column::new("A", Double)],
            &imports,
            "\"FROSTLINE_CHURN.ZIP\"",
            "churn.zip",
            &StandardDialect,
        )
        .unwrap();
        assert_eq!(
            variables["imports"],
            "'@\"FROSTLINE_CHURN.ZIP\"/churn.zip', '@\"FROSTLINE_UDF_LIBS\"/genmodel-3.42.0.jar'"
        );
    }

    #[test]
    fn empty_outputs_are_rejected() {
        use frostline_commons::LogicalType::Double;
        let err = build_variables(
            "f1",
            &spec(Vec::new()),
            &[Column::new("A", Double)],
            &[],
            "STAGE",
            "churn.zip",
            &StandardDialect,
        )
        .unwrap_err();
        assert!(matches!(err, UdfError::InvalidSpec(_)));
    }
}

//! Placeholder substitution for function source templates.
//!
//! Templates carry `<$key$>` placeholders. Rendering is a single
//! left-to-right pass: each placeholder is replaced by its value from the
//! variable map, and substituted text is never re-scanned, so values may
//! safely contain placeholder-like text. Keys present in the template but
//! absent from the map are left verbatim in the output; callers that care
//! check for leftover tokens themselves.

use std::collections::HashMap;
use std::path::PathBuf;

use crate::error::{Result, UdfError};
use crate::function::InvocationArity;

const SCALAR_TEMPLATE: &str = include_str!("../templates/scalar_function.sql");
const TABLE_TEMPLATE: &str = include_str!("../templates/table_function.sql");

/// Fills every known `<$key$>` placeholder in `template` with its value.
pub fn render(template: &str, variables: &HashMap<String, String>) -> String {
    let mut output = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find("<$") {
        output.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        match after.find("$>") {
            Some(end) => {
                let key = &after[..end];
                match variables.get(key) {
                    Some(value) => output.push_str(value),
                    // Unknown key: keep the token verbatim.
                    None => {
                        output.push_str("<$");
                        output.push_str(key);
                        output.push_str("$>");
                    }
                }
                rest = &after[end + 2..];
            }
            // Unterminated token: emit the remainder as-is.
            None => {
                output.push_str(&rest[start..]);
                rest = "";
            }
        }
    }
    output.push_str(rest);
    output
}

/// Returns true if the text still contains a placeholder token.
pub fn has_placeholders(text: &str) -> bool {
    match text.find("<$") {
        Some(start) => text[start + 2..].contains("$>"),
        None => false,
    }
}

/// Source of the create-function templates, selected by invocation arity.
///
/// The built-in templates are compiled in; a directory source allows the
/// host to override them with adapted files.
pub struct TemplateCatalog {
    directory: Option<PathBuf>,
}

impl TemplateCatalog {
    /// Catalog serving the compiled-in templates.
    pub fn embedded() -> Self {
        Self { directory: None }
    }

    /// Catalog reading `scalar_function.sql` / `table_function.sql` from a
    /// directory.
    pub fn from_directory(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: Some(directory.into()),
        }
    }

    /// Loads the template for the given invocation arity.
    pub fn load(&self, arity: InvocationArity) -> Result<String> {
        let file_name = match arity {
            InvocationArity::Scalar => "scalar_function.sql",
            InvocationArity::Tabular => "table_function.sql",
        };
        match &self.directory {
            None => Ok(match arity {
                InvocationArity::Scalar => SCALAR_TEMPLATE.to_string(),
                InvocationArity::Tabular => TABLE_TEMPLATE.to_string(),
            }),
            Some(dir) => {
                let path = dir.join(file_name);
                std::fs::read_to_string(&path).map_err(|source| UdfError::Template {
                    path: path.display().to_string(),
                    source,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn replaces_every_occurrence() {
        let rendered = render(
            "fn <$name$>(<$args$>) uses <$name$>",
            &vars(&[("name", "f1"), ("args", "v0 DOUBLE")]),
        );
        assert_eq!(rendered, "fn f1(v0 DOUBLE) uses f1");
        assert!(!has_placeholders(&rendered));
    }

    #[test]
    fn unknown_keys_pass_through_verbatim() {
        let rendered = render("keep <$unknown$> here", &vars(&[("name", "f1")]));
        assert_eq!(rendered, "keep <$unknown$> here");
        assert!(has_placeholders(&rendered));
    }

    #[test]
    fn substituted_text_is_not_rescanned() {
        // The value itself looks like a placeholder; it must not expand.
        let rendered = render(
            "<$a$> and <$b$>",
            &vars(&[("a", "<$b$>"), ("b", "value")]),
        );
        assert_eq!(rendered, "<$b$> and value");
    }

    #[test]
    fn unterminated_token_is_kept() {
        let rendered = render("tail <$broken", &vars(&[("broken", "x")]));
        assert_eq!(rendered, "tail <$broken");
    }

    #[test]
    fn embedded_templates_cover_both_arities() {
        let catalog = TemplateCatalog::embedded();
        let scalar = catalog.load(InvocationArity::Scalar).unwrap();
        let tabular = catalog.load(InvocationArity::Tabular).unwrap();
        assert!(scalar.contains("RETURNS <$result_sql_type$>"));
        assert!(tabular.contains("RETURNS TABLE (<$output_arguments$>)"));
    }

    #[test]
    fn missing_directory_template_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = TemplateCatalog::from_directory(dir.path());
        let err = catalog.load(InvocationArity::Scalar).unwrap_err();
        assert!(matches!(err, UdfError::Template { .. }));
    }

    #[test]
    fn directory_template_overrides_embedded() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("scalar_function.sql"), "CREATE <$function_name$>").unwrap();
        let catalog = TemplateCatalog::from_directory(dir.path());
        assert_eq!(
            catalog.load(InvocationArity::Scalar).unwrap(),
            "CREATE <$function_name$>"
        );
    }
}

//! SQL dialect facade.
//!
//! Purely textual composition: identifier quoting, full-name building and
//! derived-table aliasing. No statement semantics live here.

/// Identifier quoting and name composition rules for the remote engine.
pub trait Dialect: Send + Sync {
    /// Wraps an identifier in the dialect's delimiters, escaping embedded
    /// delimiter characters.
    fn delimit(&self, identifier: &str) -> String;

    /// Joins the non-blank parts into a dot-separated, delimited full name.
    fn create_full_name(&self, parts: &[&str]) -> String;

    /// Renders a query as a derived table with the given alias.
    fn as_table(&self, query: &str, alias: &str) -> String;
}

/// Double-quote delimiting as used by the target engine.
#[derive(Debug, Default, Clone, Copy)]
pub struct StandardDialect;

impl Dialect for StandardDialect {
    fn delimit(&self, identifier: &str) -> String {
        format!("\"{}\"", identifier.replace('"', "\"\""))
    }

    fn create_full_name(&self, parts: &[&str]) -> String {
        parts
            .iter()
            .filter(|part| !part.trim().is_empty())
            .map(|part| self.delimit(part))
            .collect::<Vec<_>>()
            .join(".")
    }

    fn as_table(&self, query: &str, alias: &str) -> String {
        format!("({query}) AS {alias}")
    }
}

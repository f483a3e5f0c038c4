//! Intermediate file formats and their engine option rendering.

use frostline_commons::{Compression, PutOptions};
use serde::{Deserialize, Serialize};

use crate::error::{LoadError, Result};
use crate::settings::LoaderSettings;

/// The intermediate file formats supported by the bulk loader.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FileFormat {
    Csv,
    Parquet,
}

impl FileFormat {
    /// File extension of the format, e.g. `.csv`.
    pub fn file_extension(&self) -> &'static str {
        match self {
            FileFormat::Csv => ".csv",
            FileFormat::Parquet => ".parquet",
        }
    }

    /// Compression codecs the format may be staged with.
    pub fn supported_compressions(&self) -> &'static [Compression] {
        match self {
            FileFormat::Csv => &[Compression::None, Compression::Gzip],
            FileFormat::Parquet => &[Compression::None, Compression::Gzip, Compression::Snappy],
        }
    }

    /// Default codec when the host supplies none.
    pub fn default_compression(&self) -> Compression {
        match self {
            FileFormat::Csv => Compression::Gzip,
            FileFormat::Parquet => Compression::Snappy,
        }
    }

    /// Options for the per-file transfer command.
    ///
    /// The files are written locally in their final form, so engine-side
    /// compression is always off; gzip-compressed files declare their codec.
    pub fn put_options(&self, settings: &LoaderSettings) -> PutOptions {
        PutOptions {
            auto_compress: false,
            source_compression: match settings.compression {
                Compression::Gzip => Some(Compression::Gzip),
                _ => None,
            },
            overwrite: false,
        }
    }

    /// The format-dependent clause of the copy-in command.
    pub fn copy_options(&self, settings: &LoaderSettings) -> Result<String> {
        match self {
            FileFormat::Csv => {
                let csv = settings.csv.as_ref().ok_or_else(|| {
                    LoadError::InvalidSettings("CSV format requires CSV options".to_string())
                })?;
                let compression = if settings.compression == Compression::Gzip {
                    " COMPRESSION = GZIP"
                } else {
                    ""
                };
                let escape = if csv.quote_escape.is_empty() {
                    "NONE".to_string()
                } else {
                    format!("'{}'", csv.quote_escape)
                };
                Ok(format!(
                    "\nFILE_FORMAT=(TYPE='CSV'{compression}\
                     \n RECORD_DELIMITER = '{record}'\
                     \n FIELD_DELIMITER = '{field}'\
                     \n SKIP_HEADER = {skip}\
                     \n ESCAPE = {escape}\
                     \n FIELD_OPTIONALLY_ENCLOSED_BY = '{quote}'\
                     \n NULL_IF = '{null}'\
                     \n EMPTY_FIELD_AS_NULL = FALSE\
                     \n ENCODING = '{encoding}'\
                     \n)",
                    record = escape_control(&csv.record_delimiter),
                    field = csv.field_delimiter,
                    skip = if csv.write_header { 1 } else { 0 },
                    quote = csv.quote_char,
                    null = csv.null_marker,
                    encoding = csv.encoding,
                ))
            }
            FileFormat::Parquet => {
                Ok("\nFILE_FORMAT=(TYPE='PARQUET') \nMATCH_BY_COLUMN_NAME=CASE_SENSITIVE".to_string())
            }
        }
    }
}

/// CSV writer settings relevant to the copy-in command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CsvOptions {
    pub field_delimiter: String,
    pub record_delimiter: String,
    pub quote_char: String,
    /// Escape character for embedded quotes; empty means none.
    pub quote_escape: String,
    /// Marker written for missing values.
    pub null_marker: String,
    pub write_header: bool,
    pub encoding: String,
}

impl Default for CsvOptions {
    fn default() -> Self {
        Self {
            field_delimiter: ",".to_string(),
            record_delimiter: "\n".to_string(),
            quote_char: "\"".to_string(),
            quote_escape: String::new(),
            null_marker: String::new(),
            write_header: false,
            encoding: "UTF-8".to_string(),
        }
    }
}

/// Escapes control characters so the delimiter survives embedding in a
/// single-quoted SQL string.
fn escape_control(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace('\n', "\\n")
        .replace('\r', "\\r")
        .replace('\t', "\\t")
}

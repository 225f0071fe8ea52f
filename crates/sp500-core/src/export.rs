use crate::error::{DashboardError, Result};
use crate::schema::table::CompanyTable;
use base64::prelude::{Engine, BASE64_STANDARD};
use csv::{ReaderBuilder, Terminator, WriterBuilder};
use tracing::debug;

pub const FILENAME: &str = "SP500.csv";

/// An in-memory CSV document ready to be offered for download.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DownloadPayload {
    filename: &'static str,
    bytes: Vec<u8>,
}

impl DownloadPayload {
    pub fn filename(&self) -> &str {
        self.filename
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// `data:file/csv;base64,...`
    pub fn data_uri(&self) -> String {
        format!("data:file/csv;base64,{}", BASE64_STANDARD.encode(&self.bytes))
    }

    /// An inline anchor that downloads the document as [`FILENAME`].
    pub fn html_link(&self) -> String {
        format!(
            r#"<a href="{}" download="{}">Download CSV File</a>"#,
            self.data_uri(),
            self.filename
        )
    }
}

/// Serialize `table` as CSV: header row first, columns in table order.
///
/// The output depends only on the table, so equal tables give byte-identical
/// documents.
pub fn export_csv(table: &CompanyTable) -> Result<DownloadPayload> {
    let mut writer = WriterBuilder::new()
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer.write_record(table.columns())?;
    for row in table.rows() {
        writer.write_record(row.cells())?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| DashboardError::Export(e.into_error().into()))?;
    debug!("{} rows exported to {} bytes of csv", table.len(), bytes.len());

    Ok(DownloadPayload {
        filename: FILENAME,
        bytes,
    })
}

/// Read a document written by [`export_csv`] back into a table.
pub fn parse_csv(text: &str) -> Result<CompanyTable> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .from_reader(text.as_bytes());

    let columns = reader
        .headers()?
        .iter()
        .map(|header| header.to_string())
        .collect();
    let records = reader
        .records()
        .map(|record| Ok(record?.iter().map(|cell| cell.to_string()).collect()))
        .collect::<Result<Vec<Vec<String>>>>()?;

    Ok(CompanyTable::new(columns, records)?)
}

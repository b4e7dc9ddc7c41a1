//! Table-level conversion: Arrow table + header in, row batch out.

use std::collections::HashMap;

use tracing::debug;

use crate::{
    cast::{CastColumn, DefaultCaster, NamedColumn},
    column::Column,
    decode::materialize,
    error::{ConvertError, Result},
    resolve::resolve_internal_type,
    schema::Header,
    source::{ArrowTable, ChunkedArray},
    types::InternalType,
};

/// Input format name used when none is given.
pub const DEFAULT_FORMAT_NAME: &str = "Arrow";

/// Converted columns in header order, all with the same row count.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RowBatch {
    columns: Vec<Column>,
    num_rows: usize,
}

impl RowBatch {
    /// The columns, positionally aligned with the header.
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Column at position `index`.
    pub fn column(&self, index: usize) -> Option<&Column> {
        self.columns.get(index)
    }

    /// Number of rows; `0` for an empty header.
    pub fn num_rows(&self) -> usize {
        self.num_rows
    }

    /// Number of columns.
    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    /// Take the columns.
    pub fn into_columns(self) -> Vec<Column> {
        self.columns
    }
}

/// Converts Arrow tables into row batches laid out by a [`Header`].
///
/// The format name only labels errors, so the same converter type serves
/// Arrow IPC, Parquet or ORC readers.
///
/// ```
/// use std::sync::Arc;
///
/// use arrow_ingest::arrow_array::{Int32Array, RecordBatch};
/// use arrow_ingest::arrow_schema::{DataType, Field, Schema};
/// use arrow_ingest::{ArrowTable, Header, InternalType, TableConverter};
///
/// let schema = Arc::new(Schema::new(vec![Field::new("x", DataType::Int32, false)]));
/// let batch = RecordBatch::try_new(schema, vec![Arc::new(Int32Array::from(vec![1, 2]))])?;
/// let table = ArrowTable::from_batch(batch);
/// let header = Header::try_from_pairs([("x", InternalType::Int64)])?;
///
/// let rows = TableConverter::new("Parquet").convert(&table, &header)?;
/// assert_eq!(rows.num_rows(), 2);
/// assert_eq!(rows.columns()[0].as_i64(), Some(&[1i64, 2][..]));
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone)]
pub struct TableConverter<C = DefaultCaster> {
    format_name: String,
    caster: C,
}

impl Default for TableConverter {
    fn default() -> Self {
        Self::new(DEFAULT_FORMAT_NAME)
    }
}

impl TableConverter {
    /// Create a converter for input labelled `format_name`.
    pub fn new(format_name: impl Into<String>) -> Self {
        Self {
            format_name: format_name.into(),
            caster: DefaultCaster,
        }
    }
}

impl<C: CastColumn> TableConverter<C> {
    /// Replace the caster applied after decoding.
    pub fn with_caster<D: CastColumn>(self, caster: D) -> TableConverter<D> {
        TableConverter {
            format_name: self.format_name,
            caster,
        }
    }

    /// The input format name used in errors.
    pub fn format_name(&self) -> &str {
        &self.format_name
    }

    /// Convert `table` into a batch with one column per `header` column.
    ///
    /// Columns are looked up by exact name; extra table columns are ignored.
    /// Nothing is returned unless every column converts.
    ///
    /// # Errors
    /// - `ConvertError::MissingColumn` if a header column is absent from the table.
    /// - `ConvertError::RowCountMismatch` if converted columns disagree on length.
    /// - Any error from type resolution, decoding or casting.
    pub fn convert(&self, table: &ArrowTable, header: &Header) -> Result<RowBatch> {
        let by_name: HashMap<&str, ChunkedArray<'_>> = table.columns().collect();

        // Every header column must be present before any column is decoded.
        let sources = header
            .iter()
            .map(|header_column| {
                let name = header_column.name.as_str();
                by_name
                    .get(name)
                    .map(|source| (header_column, source))
                    .ok_or_else(|| ConvertError::missing_column(name))
            })
            .collect::<Result<Vec<_>>>()?;

        let mut columns = Vec::with_capacity(header.len());
        let mut num_rows = None;
        for (header_column, source) in sources {
            let name = header_column.name.as_str();
            let column = self.convert_column(source, name, &header_column.data_type)?;

            let rows = column.len();
            match num_rows {
                None => num_rows = Some(rows),
                Some(expected) if expected != rows => {
                    return Err(ConvertError::RowCountMismatch {
                        column: name.to_owned(),
                        expected,
                        actual: rows,
                    });
                }
                Some(_) => {}
            }
            columns.push(column);
        }

        Ok(RowBatch {
            columns,
            num_rows: num_rows.unwrap_or(0),
        })
    }

    fn convert_column(
        &self,
        source: &ChunkedArray<'_>,
        name: &str,
        declared: &InternalType,
    ) -> Result<Column> {
        let desired = declared.without_low_cardinality();
        let internal_type =
            resolve_internal_type(source.data_type(), &desired, name, &self.format_name)?;

        let mut column = internal_type.create_column();
        materialize(source, &mut column, name, &self.format_name, false)?;
        debug!(
            column = name,
            arrow_type = %source.data_type(),
            internal_type = %internal_type,
            declared_type = %declared,
            rows = column.len(),
            "converted column"
        );

        self.caster.cast(
            NamedColumn {
                name,
                data_type: internal_type,
                column,
            },
            declared,
        )
    }
}

/// Convert `table` with the default caster.
///
/// # Errors
/// See [`TableConverter::convert`].
pub fn arrow_table_to_row_batch(
    table: &ArrowTable,
    header: &Header,
    format_name: &str,
) -> Result<RowBatch> {
    TableConverter::new(format_name).convert(table, header)
}

//! Read-only views over the Arrow input.
//!
//! [`ArrowTable`] gathers the columns of one or more record batches;
//! [`ChunkedArray`] borrows one column's chunks for the duration of a
//! conversion. Nothing here copies or mutates Arrow buffers.

use std::borrow::Cow;

use crate::{
    arrow_array::{Array, ArrayRef, RecordBatch},
    arrow_schema::{DataType, SchemaRef},
    error::{ConvertError, Result},
};

/// The Arrow types the converter knows how to decode.
///
/// Parameters (timestamp unit, decimal precision, list item) stay in the
/// `DataType`; this enum only carries the tag used for dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArrowTypeId {
    /// `UInt8`.
    UInt8,
    /// `Int8`.
    Int8,
    /// `UInt16`.
    UInt16,
    /// `Int16`.
    Int16,
    /// `UInt32`.
    UInt32,
    /// `Int32`.
    Int32,
    /// `UInt64`.
    UInt64,
    /// `Int64`.
    Int64,
    /// `Float16`.
    Float16,
    /// `Float32`.
    Float32,
    /// `Float64`.
    Float64,
    /// Bit-packed `Boolean`.
    Boolean,
    /// `Date32`: days since epoch.
    Date32,
    /// `Date64`: milliseconds since epoch.
    Date64,
    /// `Timestamp` of any unit and timezone.
    Timestamp,
    /// `Utf8` with 32-bit offsets.
    Utf8,
    /// `LargeUtf8` with 64-bit offsets.
    LargeUtf8,
    /// `Binary` with 32-bit offsets.
    Binary,
    /// `LargeBinary` with 64-bit offsets.
    LargeBinary,
    /// `Decimal128(precision, scale)`.
    Decimal128,
    /// `List` with 32-bit offsets.
    List,
    /// `LargeList` with 64-bit offsets.
    LargeList,
}

impl ArrowTypeId {
    /// Tag of `data_type`, or `None` if it is not supported.
    pub fn of(data_type: &DataType) -> Option<Self> {
        Some(match data_type {
            DataType::UInt8 => Self::UInt8,
            DataType::Int8 => Self::Int8,
            DataType::UInt16 => Self::UInt16,
            DataType::Int16 => Self::Int16,
            DataType::UInt32 => Self::UInt32,
            DataType::Int32 => Self::Int32,
            DataType::UInt64 => Self::UInt64,
            DataType::Int64 => Self::Int64,
            DataType::Float16 => Self::Float16,
            DataType::Float32 => Self::Float32,
            DataType::Float64 => Self::Float64,
            DataType::Boolean => Self::Boolean,
            DataType::Date32 => Self::Date32,
            DataType::Date64 => Self::Date64,
            DataType::Timestamp(_, _) => Self::Timestamp,
            DataType::Utf8 => Self::Utf8,
            DataType::LargeUtf8 => Self::LargeUtf8,
            DataType::Binary => Self::Binary,
            DataType::LargeBinary => Self::LargeBinary,
            DataType::Decimal128(_, _) => Self::Decimal128,
            DataType::List(_) => Self::List,
            DataType::LargeList(_) => Self::LargeList,
            _ => return None,
        })
    }
}

/// One logical column split into Arrow chunks of the same type.
#[derive(Debug, Clone)]
pub struct ChunkedArray<'a> {
    data_type: DataType,
    chunks: Cow<'a, [ArrayRef]>,
}

impl<'a> ChunkedArray<'a> {
    /// Borrow `chunks` as one column of type `data_type`.
    ///
    /// # Errors
    /// Returns `ConvertError::ChunkTypeMismatch` if any chunk has a different type.
    pub fn try_new(data_type: DataType, chunks: &'a [ArrayRef]) -> Result<Self> {
        Self::from_cow(data_type, Cow::Borrowed(chunks))
    }

    fn from_cow(data_type: DataType, chunks: Cow<'a, [ArrayRef]>) -> Result<Self> {
        if let Some(chunk) = chunks.iter().find(|c| c.data_type() != &data_type) {
            return Err(ConvertError::ChunkTypeMismatch {
                expected: data_type,
                actual: chunk.data_type().clone(),
            });
        }
        Ok(Self { data_type, chunks })
    }

    /// The Arrow type shared by every chunk.
    pub fn data_type(&self) -> &DataType {
        &self.data_type
    }

    /// The chunks in row order.
    pub fn chunks(&self) -> &[ArrayRef] {
        &self.chunks
    }

    /// Number of chunks.
    pub fn num_chunks(&self) -> usize {
        self.chunks.len()
    }

    /// Total number of rows across chunks.
    pub fn len(&self) -> usize {
        self.chunks.iter().map(|c| c.len()).sum()
    }

    /// Whether there are no rows.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Total number of nulls across chunks.
    pub fn null_count(&self) -> usize {
        self.chunks.iter().map(|c| c.null_count()).sum()
    }

    /// Error for a chunk that failed to downcast to the declared type.
    pub(crate) fn chunk_mismatch(&self, chunk: &dyn Array) -> ConvertError {
        ConvertError::ChunkTypeMismatch {
            expected: self.data_type.clone(),
            actual: chunk.data_type().clone(),
        }
    }
}

impl ChunkedArray<'static> {
    /// Like [`ChunkedArray::try_new`], taking ownership of the chunk list.
    ///
    /// # Errors
    /// Returns `ConvertError::ChunkTypeMismatch` if any chunk has a different type.
    pub fn try_from_owned(data_type: DataType, chunks: Vec<ArrayRef>) -> Result<Self> {
        Self::from_cow(data_type, Cow::Owned(chunks))
    }
}

/// A table assembled from record batches that share one schema.
#[derive(Debug, Clone)]
pub struct ArrowTable {
    schema: SchemaRef,
    // One chunk list per schema field.
    columns: Vec<Vec<ArrayRef>>,
    num_rows: usize,
}

impl ArrowTable {
    /// Gather `batches` into a table with `schema`.
    ///
    /// # Errors
    /// Returns `ConvertError::SchemaMismatch` if a batch's fields differ from `schema`.
    pub fn try_from_batches(
        schema: SchemaRef,
        batches: impl IntoIterator<Item = RecordBatch>,
    ) -> Result<Self> {
        let mut columns: Vec<Vec<ArrayRef>> = vec![Vec::new(); schema.fields().len()];
        let mut num_rows = 0;
        for (index, batch) in batches.into_iter().enumerate() {
            if batch.schema().fields() != schema.fields() {
                return Err(ConvertError::SchemaMismatch { batch: index });
            }
            for (chunks, array) in columns.iter_mut().zip(batch.columns()) {
                chunks.push(array.clone());
            }
            num_rows += batch.num_rows();
        }
        Ok(Self {
            schema,
            columns,
            num_rows,
        })
    }

    /// A single-chunk table over `batch`.
    pub fn from_batch(batch: RecordBatch) -> Self {
        let columns = batch.columns().iter().map(|a| vec![a.clone()]).collect();
        Self {
            schema: batch.schema(),
            num_rows: batch.num_rows(),
            columns,
        }
    }

    /// The table schema.
    pub fn schema(&self) -> &SchemaRef {
        &self.schema
    }

    /// Total number of rows.
    pub fn num_rows(&self) -> usize {
        self.num_rows
    }

    /// Number of columns.
    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    /// Column names in schema order.
    pub fn column_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.schema.fields().iter().map(|f| f.name().as_str())
    }

    /// Columns paired with their names, in schema order.
    pub fn columns(&self) -> impl Iterator<Item = (&str, ChunkedArray<'_>)> + '_ {
        self.schema
            .fields()
            .iter()
            .zip(&self.columns)
            .map(|(field, chunks)| {
                let column = ChunkedArray {
                    data_type: field.data_type().clone(),
                    chunks: Cow::Borrowed(chunks.as_slice()),
                };
                (field.name().as_str(), column)
            })
    }

    /// The column called `name`, if present.
    pub fn column(&self, name: &str) -> Option<ChunkedArray<'_>> {
        self.columns()
            .find(|(column_name, _)| *column_name == name)
            .map(|(_, column)| column)
    }
}

//! Error types for arrow-ingest.

use thiserror::Error;

use crate::{arrow_schema::DataType, types::InternalType};

/// Result alias used throughout the crate.
pub type Result<T, E = ConvertError> = std::result::Result<T, E>;

/// Errors raised while converting Arrow data into internal columns.
///
/// Every variant aborts the whole table conversion; nothing is retried or
/// substituted with a default.
#[derive(Debug, Clone, Error)]
pub enum ConvertError {
    /// The Arrow type has no mapping to an internal type, or no decoder.
    #[error("unsupported {format} type \"{type_name}\" of an input column \"{column}\"")]
    UnsupportedType {
        /// Display name of the offending Arrow type.
        type_name: String,
        /// Column being converted.
        column: String,
        /// Source format label (e.g. "Parquet").
        format: String,
    },

    /// A nested Arrow type does not line up with the shape of the desired type.
    #[error("cannot convert {arrow_type} of column \"{column}\" to a non-Array type {target}")]
    StructuralMismatch {
        /// The Arrow type found in the input.
        arrow_type: DataType,
        /// The desired internal type.
        target: InternalType,
        /// Column being converted.
        column: String,
    },

    /// The header requires a column that the input table does not have.
    #[error("column \"{column}\" is not presented in input data")]
    MissingColumn {
        /// Name of the missing column.
        column: String,
    },

    /// The source has nulls but the target column can't store them.
    #[error("can not insert NULL data into non-nullable column \"{column}\"")]
    NullInNonNullableColumn {
        /// Column being converted.
        column: String,
    },

    /// A decoded value does not fit the internal representation.
    #[error("input value {value} of column \"{column}\" is greater than the max allowed value {max}")]
    ValueOutOfRange {
        /// Column being converted.
        column: String,
        /// The offending raw value.
        value: u32,
        /// Largest representable value.
        max: u32,
    },

    /// A column produced a different number of rows than the first column.
    #[error("column \"{column}\" has {actual} rows, expected {expected}")]
    RowCountMismatch {
        /// Column whose length differs.
        column: String,
        /// Row count established by the first column.
        expected: usize,
        /// Row count of this column.
        actual: usize,
    },

    /// The header declares the same column name twice.
    #[error("duplicate column \"{column}\" in header")]
    DuplicateColumn {
        /// The repeated column name.
        column: String,
    },

    /// A decoder was handed a column whose shape does not match the Arrow type.
    #[error("cannot decode {arrow_type} of column \"{column}\" into a {target} column")]
    TargetMismatch {
        /// Column being converted.
        column: String,
        /// The Arrow type of the source.
        arrow_type: DataType,
        /// Type of the column handed to the decoder.
        target: InternalType,
    },

    /// A chunk's Arrow type differs from the chunked array's declared type.
    #[error("chunk type mismatch: expected {expected}, got {actual}")]
    ChunkTypeMismatch {
        /// Declared type of the chunked array.
        expected: DataType,
        /// Type of the offending chunk.
        actual: DataType,
    },

    /// A record batch does not share the table schema.
    #[error("record batch {batch} does not match the table schema")]
    SchemaMismatch {
        /// Index of the offending batch.
        batch: usize,
    },

    /// An internal type name could not be parsed.
    #[error("unknown type name \"{name}\": {message}")]
    UnknownTypeName {
        /// The text that failed to parse.
        name: String,
        /// What went wrong.
        message: String,
    },

    /// The value caster could not coerce a column into its declared type.
    #[error("cannot cast column \"{column}\" from {from} to {to}: {message}")]
    Cast {
        /// Column being cast.
        column: String,
        /// Source internal type.
        from: InternalType,
        /// Declared internal type.
        to: InternalType,
        /// Reason given by the caster.
        message: String,
    },
}

impl ConvertError {
    /// Create an unsupported type error.
    pub fn unsupported_type(
        arrow_type: &DataType,
        column: impl Into<String>,
        format: impl Into<String>,
    ) -> Self {
        Self::UnsupportedType {
            type_name: arrow_type.to_string(),
            column: column.into(),
            format: format.into(),
        }
    }

    /// Create a structural mismatch error.
    pub fn structural_mismatch(
        arrow_type: &DataType,
        target: &InternalType,
        column: impl Into<String>,
    ) -> Self {
        Self::StructuralMismatch {
            arrow_type: arrow_type.clone(),
            target: target.clone(),
            column: column.into(),
        }
    }

    /// Create a missing column error.
    pub fn missing_column(column: impl Into<String>) -> Self {
        Self::MissingColumn {
            column: column.into(),
        }
    }

    /// Create a null-in-non-nullable-column error.
    pub fn null_in_non_nullable(column: impl Into<String>) -> Self {
        Self::NullInNonNullableColumn {
            column: column.into(),
        }
    }

    /// Create a target mismatch error.
    pub fn target_mismatch(
        column: impl Into<String>,
        arrow_type: &DataType,
        target: InternalType,
    ) -> Self {
        Self::TargetMismatch {
            column: column.into(),
            arrow_type: arrow_type.clone(),
            target,
        }
    }

    /// Create an unknown type name error.
    pub fn unknown_type_name(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::UnknownTypeName {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Create a cast error.
    pub fn cast(
        column: impl Into<String>,
        from: InternalType,
        to: &InternalType,
        message: impl Into<String>,
    ) -> Self {
        Self::Cast {
            column: column.into(),
            from,
            to: to.clone(),
            message: message.into(),
        }
    }

    /// Name of the column the error refers to, if any.
    pub fn column(&self) -> Option<&str> {
        match self {
            Self::UnsupportedType { column, .. }
            | Self::StructuralMismatch { column, .. }
            | Self::MissingColumn { column }
            | Self::NullInNonNullableColumn { column }
            | Self::ValueOutOfRange { column, .. }
            | Self::RowCountMismatch { column, .. }
            | Self::DuplicateColumn { column }
            | Self::TargetMismatch { column, .. }
            | Self::Cast { column, .. } => Some(column),
            Self::ChunkTypeMismatch { .. }
            | Self::SchemaMismatch { .. }
            | Self::UnknownTypeName { .. } => None,
        }
    }
}

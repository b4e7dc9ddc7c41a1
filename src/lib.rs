#![deny(missing_docs)]
//! arrow-ingest: type-directed conversion of chunked Arrow columns into
//! engine-native columns.
//!
//! The entry point is [`TableConverter`]: given an [`ArrowTable`] and the
//! expected output [`Header`], it resolves every column's internal type,
//! decodes the Arrow buffers into a freshly allocated [`Column`], casts it to
//! the declared type and assembles a [`RowBatch`].
//!
//! - Type resolution: [`resolve_internal_type`].
//! - Decoding: [`materialize`] dispatches on the Arrow type to the per-type
//!   decoders in [`decode`].
//! - Casting: [`CastColumn`] / [`DefaultCaster`].
//! - Portable binary helpers: [`endian`].

// Re-export the Arrow crates selected by the `arrow-*` features so that
// downstream users don't need to depend on Arrow directly.
#[cfg(feature = "arrow-57")]
pub use {
    arrow_array_57 as arrow_array, arrow_buffer_57 as arrow_buffer,
    arrow_schema_57 as arrow_schema,
};

#[cfg(all(feature = "arrow-56", not(feature = "arrow-57")))]
pub use {
    arrow_array_56 as arrow_array, arrow_buffer_56 as arrow_buffer,
    arrow_schema_56 as arrow_schema,
};

#[cfg(all(
    feature = "arrow-55",
    not(any(feature = "arrow-56", feature = "arrow-57"))
))]
pub use {
    arrow_array_55 as arrow_array, arrow_buffer_55 as arrow_buffer,
    arrow_schema_55 as arrow_schema,
};

#[cfg(not(any(feature = "arrow-55", feature = "arrow-56", feature = "arrow-57")))]
compile_error!("enable one of the `arrow-55`, `arrow-56` or `arrow-57` features");

pub mod cast;
pub mod column;
pub mod convert;
pub mod decode;
pub mod endian;
pub mod error;
pub mod resolve;
pub mod schema;
pub mod source;
pub mod types;

/// Prelude exporting the types needed for a typical conversion.
pub mod prelude {
    pub use crate::{
        cast::{CastColumn, DefaultCaster, NamedColumn},
        column::Column,
        convert::{RowBatch, TableConverter},
        error::{ConvertError, Result},
        schema::{Header, HeaderColumn},
        source::{ArrowTable, ChunkedArray},
        types::InternalType,
    };
}

pub use crate::{
    cast::{CastColumn, DefaultCaster, NamedColumn},
    column::{
        ArrayColumn, BooleanColumn, Column, Decimal128, DecimalColumn, NullableColumn,
        NumericColumn, StringColumn,
    },
    convert::{RowBatch, TableConverter, arrow_table_to_row_batch},
    decode::{extract_nulls, materialize},
    error::{ConvertError, Result},
    resolve::resolve_internal_type,
    schema::{Header, HeaderColumn},
    source::{ArrowTable, ArrowTypeId, ChunkedArray},
    types::{InternalType, MAX_DATE_DAY_NUM},
};

//! Internal columns: uniquely owned buffers produced by the decoders.
//!
//! - Numeric data lives in [`NumericColumn<T>`]; booleans are stored as `u8`.
//! - [`StringColumn`] keeps every value null-terminated in one `chars` buffer.
//! - [`NullableColumn`] pairs a nested column with a null bytemap.
//! - [`ArrayColumn`] pairs a flattened values column with offsets.
//!
//! String and array offsets start with a leading `0`, so a column of `n` rows
//! has `n + 1` offsets and row `i` spans `offsets[i]..offsets[i + 1]`.

use crate::types::InternalType;

/// A 128-bit fixed-point decimal, stored as its scaled integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[repr(transparent)]
pub struct Decimal128(pub i128);

impl Decimal128 {
    /// Construct from a scaled integer value.
    #[inline]
    #[must_use]
    pub fn new(value: i128) -> Self {
        Self(value)
    }

    /// Return the scaled integer value.
    #[inline]
    #[must_use]
    pub fn value(&self) -> i128 {
        self.0
    }
}

/// A flat column of fixed-width values.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NumericColumn<T> {
    data: Vec<T>,
}

/// Booleans are stored one byte per row.
pub type BooleanColumn = NumericColumn<u8>;

impl<T> NumericColumn<T> {
    /// Create an empty column.
    pub fn new() -> Self {
        Self { data: Vec::new() }
    }

    /// Values in row order.
    pub fn data(&self) -> &[T] {
        &self.data
    }

    /// Mutable access to the backing buffer.
    pub fn data_mut(&mut self) -> &mut Vec<T> {
        &mut self.data
    }

    /// Consume the column and return its buffer.
    pub fn into_vec(self) -> Vec<T> {
        self.data
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the column has no rows.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl<T> From<Vec<T>> for NumericColumn<T> {
    fn from(data: Vec<T>) -> Self {
        Self { data }
    }
}

/// Null-terminated strings packed into one character buffer.
#[derive(Debug, Clone, PartialEq)]
pub struct StringColumn {
    chars: Vec<u8>,
    offsets: Vec<u64>,
}

impl Default for StringColumn {
    fn default() -> Self {
        Self::new()
    }
}

impl StringColumn {
    /// Create an empty column.
    pub fn new() -> Self {
        Self {
            chars: Vec::new(),
            offsets: vec![0],
        }
    }

    /// Build a column from byte values.
    pub fn from_values<I, V>(values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: AsRef<[u8]>,
    {
        let mut column = Self::new();
        for v in values {
            column.push(v.as_ref());
        }
        column
    }

    /// Reserve room for `rows` more values totalling `bytes` characters,
    /// terminators included.
    pub fn reserve(&mut self, rows: usize, bytes: usize) {
        self.offsets.reserve(rows);
        self.chars.reserve(bytes);
    }

    /// Append a value followed by its terminator.
    pub fn push(&mut self, value: &[u8]) {
        self.chars.extend_from_slice(value);
        self.push_terminator();
    }

    /// Terminate the current value and record its end offset.
    pub(crate) fn push_terminator(&mut self) {
        self.chars.push(0);
        self.offsets.push(self.chars.len() as u64);
    }

    pub(crate) fn chars_mut(&mut self) -> &mut Vec<u8> {
        &mut self.chars
    }

    /// Value `i` without its terminator.
    ///
    /// # Panics
    /// Panics if `i >= self.len()`.
    pub fn value(&self, i: usize) -> &[u8] {
        let start = self.offsets[i] as usize;
        let end = self.offsets[i + 1] as usize;
        &self.chars[start..end - 1]
    }

    /// Iterate over values without terminators.
    pub fn iter(&self) -> impl Iterator<Item = &[u8]> + '_ {
        (0..self.len()).map(|i| self.value(i))
    }

    /// The packed character buffer.
    pub fn chars(&self) -> &[u8] {
        &self.chars
    }

    /// End offsets with a leading `0`.
    pub fn offsets(&self) -> &[u64] {
        &self.offsets
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.offsets.len() - 1
    }

    /// Whether the column has no rows.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// 128-bit decimals with a fixed precision and scale.
#[derive(Debug, Clone, PartialEq)]
pub struct DecimalColumn {
    precision: u8,
    scale: i8,
    data: Vec<Decimal128>,
}

impl DecimalColumn {
    /// Create an empty column.
    pub fn new(precision: u8, scale: i8) -> Self {
        Self {
            precision,
            scale,
            data: Vec::new(),
        }
    }

    /// Build a column from existing values.
    pub fn from_vec(precision: u8, scale: i8, data: Vec<Decimal128>) -> Self {
        Self {
            precision,
            scale,
            data,
        }
    }

    /// Total number of digits.
    pub fn precision(&self) -> u8 {
        self.precision
    }

    /// Digits after the decimal point.
    pub fn scale(&self) -> i8 {
        self.scale
    }

    /// Values in row order.
    pub fn data(&self) -> &[Decimal128] {
        &self.data
    }

    /// Mutable access to the backing buffer.
    pub fn data_mut(&mut self) -> &mut Vec<Decimal128> {
        &mut self.data
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the column has no rows.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// A nested column plus a bytemap marking null rows with `1`.
#[derive(Debug, Clone, PartialEq)]
pub struct NullableColumn {
    nested: Box<Column>,
    null_map: NumericColumn<u8>,
}

impl NullableColumn {
    /// Wrap `nested`; every existing row is marked non-null.
    pub fn new(nested: Column) -> Self {
        let null_map = vec![0; nested.len()].into();
        Self {
            nested: Box::new(nested),
            null_map,
        }
    }

    /// Assemble from a nested column and a null bytemap of the same length.
    ///
    /// Returns `None` when the lengths differ.
    pub fn from_parts(nested: Column, null_map: NumericColumn<u8>) -> Option<Self> {
        (nested.len() == null_map.len()).then(|| Self {
            nested: Box::new(nested),
            null_map,
        })
    }

    /// Split into the nested column and the null bytemap.
    pub fn into_parts(self) -> (Column, NumericColumn<u8>) {
        (*self.nested, self.null_map)
    }

    /// The nested (non-nullable) column.
    pub fn nested(&self) -> &Column {
        &self.nested
    }

    /// Mutable access to the nested column.
    pub fn nested_mut(&mut self) -> &mut Column {
        &mut self.nested
    }

    /// The null bytemap.
    pub fn null_map(&self) -> &NumericColumn<u8> {
        &self.null_map
    }

    /// Mutable access to the null bytemap.
    pub fn null_map_mut(&mut self) -> &mut NumericColumn<u8> {
        &mut self.null_map
    }

    /// Whether row `i` is null.
    pub fn is_null(&self, i: usize) -> bool {
        self.null_map.data()[i] != 0
    }

    /// Number of null rows.
    pub fn null_count(&self) -> usize {
        self.null_map.data().iter().filter(|&&b| b != 0).count()
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.nested.len()
    }

    /// Whether the column has no rows.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Variable-length arrays: a flattened values column plus offsets.
#[derive(Debug, Clone, PartialEq)]
pub struct ArrayColumn {
    data: Box<Column>,
    offsets: NumericColumn<u64>,
}

impl ArrayColumn {
    /// Create an array column with no rows over `data`.
    ///
    /// `data` must be empty; use [`ArrayColumn::from_parts`] to wrap existing
    /// values.
    pub fn new(data: Column) -> Self {
        debug_assert!(data.is_empty(), "array column with no rows over non-empty values");
        Self {
            data: Box::new(data),
            offsets: vec![0].into(),
        }
    }

    /// Assemble from a values column and offsets (leading `0` included).
    ///
    /// Returns `None` unless the offsets start at `0`, never decrease and end
    /// at the length of `data`.
    pub fn from_parts(data: Column, offsets: Vec<u64>) -> Option<Self> {
        let valid = offsets.first() == Some(&0)
            && offsets.windows(2).all(|w| w[0] <= w[1])
            && offsets.last().map(|&end| end as usize) == Some(data.len());
        valid.then(|| Self {
            data: Box::new(data),
            offsets: offsets.into(),
        })
    }

    /// Split into the values column and the offsets.
    pub fn into_parts(self) -> (Column, NumericColumn<u64>) {
        (*self.data, self.offsets)
    }

    /// The flattened values column.
    pub fn data(&self) -> &Column {
        &self.data
    }

    /// Mutable access to the values column.
    pub fn data_mut(&mut self) -> &mut Column {
        &mut self.data
    }

    /// End offsets with a leading `0`.
    pub fn offsets(&self) -> &[u64] {
        self.offsets.data()
    }

    /// Mutable access to the offsets column.
    pub fn offsets_mut(&mut self) -> &mut NumericColumn<u64> {
        &mut self.offsets
    }

    /// Range of values column rows that make up row `i`.
    ///
    /// # Panics
    /// Panics if `i >= self.len()`.
    pub fn value_range(&self, i: usize) -> std::ops::Range<usize> {
        let offsets = self.offsets.data();
        offsets[i] as usize..offsets[i + 1] as usize
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.offsets.len() - 1
    }

    /// Whether the column has no rows.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// An internal column. The variant always matches [`Column::data_type`].
#[derive(Debug, Clone, PartialEq)]
pub enum Column {
    /// `UInt8` (and boolean) values.
    UInt8(NumericColumn<u8>),
    /// `UInt16` values.
    UInt16(NumericColumn<u16>),
    /// `UInt32` values.
    UInt32(NumericColumn<u32>),
    /// `UInt64` values.
    UInt64(NumericColumn<u64>),
    /// `Int8` values.
    Int8(NumericColumn<i8>),
    /// `Int16` values.
    Int16(NumericColumn<i16>),
    /// `Int32` values.
    Int32(NumericColumn<i32>),
    /// `Int64` values.
    Int64(NumericColumn<i64>),
    /// `Float32` values.
    Float32(NumericColumn<f32>),
    /// `Float64` values.
    Float64(NumericColumn<f64>),
    /// Day numbers.
    Date(NumericColumn<u16>),
    /// Epoch seconds.
    DateTime(NumericColumn<u32>),
    /// Strings.
    String(StringColumn),
    /// Decimals.
    Decimal128(DecimalColumn),
    /// Nullable wrapper.
    Nullable(NullableColumn),
    /// Arrays.
    Array(ArrayColumn),
    /// Low-cardinality presentation of the inner column.
    LowCardinality(Box<Column>),
}

impl Column {
    /// Number of rows.
    pub fn len(&self) -> usize {
        match self {
            Column::UInt8(c) => c.len(),
            Column::UInt16(c) => c.len(),
            Column::UInt32(c) => c.len(),
            Column::UInt64(c) => c.len(),
            Column::Int8(c) => c.len(),
            Column::Int16(c) => c.len(),
            Column::Int32(c) => c.len(),
            Column::Int64(c) => c.len(),
            Column::Float32(c) => c.len(),
            Column::Float64(c) => c.len(),
            Column::Date(c) => c.len(),
            Column::DateTime(c) => c.len(),
            Column::String(c) => c.len(),
            Column::Decimal128(c) => c.len(),
            Column::Nullable(c) => c.len(),
            Column::Array(c) => c.len(),
            Column::LowCardinality(c) => c.len(),
        }
    }

    /// Whether the column has no rows.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The internal type this column stores.
    pub fn data_type(&self) -> InternalType {
        match self {
            Column::UInt8(_) => InternalType::UInt8,
            Column::UInt16(_) => InternalType::UInt16,
            Column::UInt32(_) => InternalType::UInt32,
            Column::UInt64(_) => InternalType::UInt64,
            Column::Int8(_) => InternalType::Int8,
            Column::Int16(_) => InternalType::Int16,
            Column::Int32(_) => InternalType::Int32,
            Column::Int64(_) => InternalType::Int64,
            Column::Float32(_) => InternalType::Float32,
            Column::Float64(_) => InternalType::Float64,
            Column::Date(_) => InternalType::Date,
            Column::DateTime(_) => InternalType::DateTime,
            Column::String(_) => InternalType::String,
            Column::Decimal128(c) => InternalType::Decimal128 {
                precision: c.precision(),
                scale: c.scale(),
            },
            Column::Nullable(c) => InternalType::nullable(c.nested().data_type()),
            Column::Array(c) => InternalType::array(c.data().data_type()),
            Column::LowCardinality(c) => InternalType::low_cardinality(c.data_type()),
        }
    }

    /// Whether this is an array column.
    pub fn is_array(&self) -> bool {
        matches!(self, Column::Array(_))
    }

    /// Whether this is a nullable column.
    pub fn is_nullable(&self) -> bool {
        matches!(self, Column::Nullable(_))
    }

    /// Downcast to a string column.
    pub fn as_string(&self) -> Option<&StringColumn> {
        match self {
            Column::String(c) => Some(c),
            _ => None,
        }
    }

    /// Downcast to a decimal column.
    pub fn as_decimal(&self) -> Option<&DecimalColumn> {
        match self {
            Column::Decimal128(c) => Some(c),
            _ => None,
        }
    }

    /// Downcast to a nullable column.
    pub fn as_nullable(&self) -> Option<&NullableColumn> {
        match self {
            Column::Nullable(c) => Some(c),
            _ => None,
        }
    }

    /// Downcast to an array column.
    pub fn as_array(&self) -> Option<&ArrayColumn> {
        match self {
            Column::Array(c) => Some(c),
            _ => None,
        }
    }
}

macro_rules! impl_numeric_accessor {
    ($name:ident, $variant:ident, $t:ty) => {
        impl Column {
            #[doc = concat!("Values of a `", stringify!($variant), "` column.")]
            pub fn $name(&self) -> Option<&[$t]> {
                match self {
                    Column::$variant(c) => Some(c.data()),
                    _ => None,
                }
            }
        }
    };
}

impl_numeric_accessor!(as_u8, UInt8, u8);
impl_numeric_accessor!(as_u16, UInt16, u16);
impl_numeric_accessor!(as_u32, UInt32, u32);
impl_numeric_accessor!(as_u64, UInt64, u64);
impl_numeric_accessor!(as_i8, Int8, i8);
impl_numeric_accessor!(as_i16, Int16, i16);
impl_numeric_accessor!(as_i32, Int32, i32);
impl_numeric_accessor!(as_i64, Int64, i64);
impl_numeric_accessor!(as_f32, Float32, f32);
impl_numeric_accessor!(as_f64, Float64, f64);
impl_numeric_accessor!(as_date, Date, u16);
impl_numeric_accessor!(as_date_time, DateTime, u32);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn string_column_terminates_every_value() {
        let c = StringColumn::from_values(["ab", "", "c"]);
        assert_eq!(c.len(), 3);
        assert_eq!(c.chars(), b"ab\0\0c\0");
        assert_eq!(c.offsets(), &[0, 3, 4, 6]);
        assert_eq!(c.value(1), b"");
        assert_eq!(c.iter().collect::<Vec<_>>(), vec![&b"ab"[..], &b""[..], &b"c"[..]]);
    }

    #[test]
    fn array_column_rejects_bad_offsets() {
        let values = Column::Int32(vec![1, 2, 3].into());
        assert!(ArrayColumn::from_parts(values.clone(), vec![0, 2, 1, 3]).is_none());
        assert!(ArrayColumn::from_parts(values.clone(), vec![1, 3]).is_none());
        assert!(ArrayColumn::from_parts(values.clone(), vec![0, 2]).is_none());
        let a = ArrayColumn::from_parts(values, vec![0, 2, 2, 3]).unwrap();
        assert_eq!(a.len(), 3);
        assert_eq!(a.value_range(1), 2..2);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "non-empty values")]
    fn array_column_new_requires_empty_values() {
        let _ = ArrayColumn::new(Column::Int32(vec![1].into()));
    }

    #[test]
    fn data_type_follows_nesting() {
        let c = InternalType::array(InternalType::nullable(InternalType::String)).create_column();
        assert_eq!(c.data_type().to_string(), "Array(Nullable(String))");
        assert!(c.is_empty());
    }
}

//! Post-decode casts to the declared header type.
//!
//! The decoders produce whatever internal type the Arrow source maps to;
//! [`CastColumn`] turns that column into the exact type the header declares.
//! [`DefaultCaster`] covers the wrappers (`Nullable`, `Array`,
//! `LowCardinality`), numeric and temporal widening/narrowing, and decimal
//! rescaling. Anything else is a [`ConvertError::Cast`].

use crate::{
    column::{ArrayColumn, Column, Decimal128, DecimalColumn, NullableColumn, NumericColumn},
    error::{ConvertError, Result},
    types::InternalType,
};

const SECONDS_PER_DAY: u32 = 86_400;

/// A decoded column together with its name and internal type.
#[derive(Debug, Clone, PartialEq)]
pub struct NamedColumn<'a> {
    /// Column name, used in errors.
    pub name: &'a str,
    /// Internal type of `column`.
    pub data_type: InternalType,
    /// The decoded data.
    pub column: Column,
}

impl<'a> NamedColumn<'a> {
    /// Pair `column` with `name`, taking the type from the column itself.
    pub fn new(name: &'a str, column: Column) -> Self {
        Self {
            name,
            data_type: column.data_type(),
            column,
        }
    }
}

/// Converts a decoded column to another internal type.
pub trait CastColumn {
    /// Cast `column` to `to`, preserving the row count.
    ///
    /// # Errors
    /// Returns an error if the conversion is not supported or a value does
    /// not fit the target type.
    fn cast(&self, column: NamedColumn<'_>, to: &InternalType) -> Result<Column>;
}

impl<C: CastColumn + ?Sized> CastColumn for &C {
    fn cast(&self, column: NamedColumn<'_>, to: &InternalType) -> Result<Column> {
        (**self).cast(column, to)
    }
}

/// The caster used by [`TableConverter`](crate::TableConverter) by default.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultCaster;

impl CastColumn for DefaultCaster {
    fn cast(&self, column: NamedColumn<'_>, to: &InternalType) -> Result<Column> {
        if &column.data_type == to {
            return Ok(column.column);
        }
        cast_column(column.name, column.column, to)
    }
}

fn cast_column(name: &str, column: Column, to: &InternalType) -> Result<Column> {
    let from = column.data_type();
    if &from == to {
        return Ok(column);
    }

    match (column, to) {
        (Column::LowCardinality(inner), InternalType::LowCardinality(to_inner)) => Ok(
            Column::LowCardinality(Box::new(cast_column(name, *inner, to_inner)?)),
        ),
        (Column::LowCardinality(inner), _) => cast_column(name, *inner, to),
        (column, InternalType::LowCardinality(to_inner)) => Ok(Column::LowCardinality(
            Box::new(cast_column(name, column, to_inner)?),
        )),
        (Column::Nullable(nullable), InternalType::Nullable(to_inner)) => {
            let (nested, null_map) = nullable.into_parts();
            let nested = cast_column(name, nested, to_inner)?;
            NullableColumn::from_parts(nested, null_map)
                .map(Column::Nullable)
                .ok_or_else(|| ConvertError::cast(name, from, to, "row count changed"))
        }
        (Column::Nullable(nullable), _) => {
            if nullable.null_count() > 0 {
                return Err(ConvertError::cast(
                    name,
                    from,
                    to,
                    "cannot convert NULL value to non-Nullable type",
                ));
            }
            let (nested, _) = nullable.into_parts();
            cast_column(name, nested, to)
        }
        (column, InternalType::Nullable(to_inner)) => Ok(Column::Nullable(NullableColumn::new(
            cast_column(name, column, to_inner)?,
        ))),
        (Column::Array(array), InternalType::Array(to_inner)) => {
            let (data, offsets) = array.into_parts();
            let data = cast_column(name, data, to_inner)?;
            ArrayColumn::from_parts(data, offsets.into_vec())
                .map(Column::Array)
                .ok_or_else(|| ConvertError::cast(name, from, to, "row count changed"))
        }
        (Column::Date(days), InternalType::DateTime) => days_to_seconds(name, &days, to),
        (Column::DateTime(seconds), InternalType::Date) => {
            let data = seconds
                .data()
                .iter()
                .map(|s| (s / SECONDS_PER_DAY) as u16)
                .collect::<Vec<_>>();
            Ok(Column::Date(data.into()))
        }
        (column, InternalType::Decimal128 { precision, scale }) => {
            to_decimal(name, &column, *precision, *scale, to).map(Column::Decimal128)
        }
        (column, to) => to_numeric(&column, to)
            .ok_or_else(|| ConvertError::cast(name, from, to, "conversion is not supported")),
    }
}

fn days_to_seconds(name: &str, days: &NumericColumn<u16>, to: &InternalType) -> Result<Column> {
    let data = days
        .data()
        .iter()
        .map(|&d| {
            u32::from(d).checked_mul(SECONDS_PER_DAY).ok_or_else(|| {
                ConvertError::cast(name, InternalType::Date, to, format!("day {d} overflows"))
            })
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(Column::DateTime(data.into()))
}

fn to_numeric(column: &Column, to: &InternalType) -> Option<Column> {
    Some(match to {
        InternalType::UInt8 => Column::UInt8(cast_values::<u8>(column)?.into()),
        InternalType::UInt16 => Column::UInt16(cast_values::<u16>(column)?.into()),
        InternalType::UInt32 => Column::UInt32(cast_values::<u32>(column)?.into()),
        InternalType::UInt64 => Column::UInt64(cast_values::<u64>(column)?.into()),
        InternalType::Int8 => Column::Int8(cast_values::<i8>(column)?.into()),
        InternalType::Int16 => Column::Int16(cast_values::<i16>(column)?.into()),
        InternalType::Int32 => Column::Int32(cast_values::<i32>(column)?.into()),
        InternalType::Int64 => Column::Int64(cast_values::<i64>(column)?.into()),
        InternalType::Float32 => Column::Float32(cast_values::<f32>(column)?.into()),
        InternalType::Float64 => Column::Float64(cast_values::<f64>(column)?.into()),
        InternalType::Date => Column::Date(cast_values::<u16>(column)?.into()),
        InternalType::DateTime => Column::DateTime(cast_values::<u32>(column)?.into()),
        _ => return None,
    })
}

fn to_decimal(
    name: &str,
    column: &Column,
    precision: u8,
    scale: i8,
    to: &InternalType,
) -> Result<DecimalColumn> {
    let from = column.data_type();
    let overflow = |value: String| {
        ConvertError::cast(
            name,
            from.clone(),
            to,
            format!("{value} does not fit {to}"),
        )
    };
    let limit = pow10(i32::from(precision)).unwrap_or(i128::MAX);
    let check = |v: Option<i128>, shown: &dyn Fn() -> String| match v {
        Some(v) if v.unsigned_abs() < limit.unsigned_abs() => Ok(Decimal128(v)),
        _ => Err(overflow(shown())),
    };

    let data = match column {
        Column::Decimal128(source) => source
            .data()
            .iter()
            .map(|d| check(rescale(d.value(), source.scale(), scale), &|| d.value().to_string()))
            .collect::<Result<Vec<_>>>()?,
        Column::Float32(_) | Column::Float64(_) => {
            let factor = 10f64.powi(i32::from(scale));
            cast_values::<f64>(column)
                .unwrap_or_default()
                .into_iter()
                .map(|v| {
                    let scaled = (v * factor).round();
                    let fits = scaled.is_finite() && scaled.abs() < i128::MAX as f64;
                    check(fits.then_some(scaled as i128), &|| v.to_string())
                })
                .collect::<Result<Vec<_>>>()?
        }
        other => cast_values::<i128>(other)
            .ok_or_else(|| ConvertError::cast(name, from.clone(), to, "conversion is not supported"))?
            .into_iter()
            .map(|v| check(rescale(v, 0, scale), &|| v.to_string()))
            .collect::<Result<Vec<_>>>()?,
    };
    Ok(DecimalColumn::from_vec(precision, scale, data))
}

fn pow10(exp: i32) -> Option<i128> {
    u32::try_from(exp).ok().and_then(|e| 10i128.checked_pow(e))
}

/// Move `value` from scale `from` to scale `to`; `None` on overflow.
/// Reducing the scale truncates toward zero.
fn rescale(value: i128, from: i8, to: i8) -> Option<i128> {
    let diff = i32::from(to) - i32::from(from);
    if diff >= 0 {
        value.checked_mul(pow10(diff)?)
    } else {
        Some(pow10(-diff).map_or(0, |f| value / f))
    }
}

trait Numeric: Copy {
    const IS_FLOAT: bool;
    fn to_i128(self) -> i128;
    fn to_f64(self) -> f64;
    fn from_i128(v: i128) -> Self;
    fn from_f64(v: f64) -> Self;
}

macro_rules! impl_numeric {
    ($is_float:literal: $($t:ty),+) => {
        $(
            impl Numeric for $t {
                const IS_FLOAT: bool = $is_float;
                #[inline]
                fn to_i128(self) -> i128 {
                    self as i128
                }
                #[inline]
                fn to_f64(self) -> f64 {
                    self as f64
                }
                #[inline]
                fn from_i128(v: i128) -> Self {
                    v as $t
                }
                #[inline]
                fn from_f64(v: f64) -> Self {
                    v as $t
                }
            }
        )+
    };
}

impl_numeric!(false: u8, u16, u32, u64, i8, i16, i32, i64, i128);
impl_numeric!(true: f32, f64);

/// Convert every value of a numeric, temporal or decimal column to `T`.
///
/// Integer to integer conversions wrap; anything involving a float goes
/// through `f64`. Decimals are unscaled first (truncating for integers).
fn cast_values<T: Numeric>(column: &Column) -> Option<Vec<T>> {
    Some(match column {
        Column::UInt8(c) => convert(c.data()),
        Column::UInt16(c) => convert(c.data()),
        Column::UInt32(c) => convert(c.data()),
        Column::UInt64(c) => convert(c.data()),
        Column::Int8(c) => convert(c.data()),
        Column::Int16(c) => convert(c.data()),
        Column::Int32(c) => convert(c.data()),
        Column::Int64(c) => convert(c.data()),
        Column::Float32(c) => convert(c.data()),
        Column::Float64(c) => convert(c.data()),
        Column::Date(c) => convert(c.data()),
        Column::DateTime(c) => convert(c.data()),
        Column::Decimal128(c) => {
            let scale = c.scale();
            c.data()
                .iter()
                .map(|d| {
                    if T::IS_FLOAT {
                        T::from_f64(d.value() as f64 / 10f64.powi(i32::from(scale)))
                    } else {
                        T::from_i128(rescale(d.value(), scale, 0).unwrap_or(0))
                    }
                })
                .collect()
        }
        _ => return None,
    })
}

fn convert<S: Numeric, T: Numeric>(values: &[S]) -> Vec<T> {
    values
        .iter()
        .map(|&v| {
            if S::IS_FLOAT || T::IS_FLOAT {
                T::from_f64(v.to_f64())
            } else {
                T::from_i128(v.to_i128())
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::column::StringColumn;

    fn cast(column: Column, to: &str) -> Result<Column> {
        DefaultCaster.cast(NamedColumn::new("c", column), &to.parse().unwrap())
    }

    #[test]
    fn identity_returns_column_unchanged() {
        let column = Column::Int32(vec![1, 2].into());
        assert_eq!(cast(column.clone(), "Int32").unwrap(), column);
    }

    #[test]
    fn widens_integers_and_floats() {
        let out = cast(Column::Int16(vec![-1, 7].into()), "Int64").unwrap();
        assert_eq!(out.as_i64(), Some(&[-1i64, 7][..]));
        let out = cast(Column::Float32(vec![1.5].into()), "Float64").unwrap();
        assert_eq!(out.as_f64(), Some(&[1.5f64][..]));
    }

    #[test]
    fn wraps_non_nullable_into_nullable() {
        let out = cast(Column::UInt8(vec![1, 0].into()), "Nullable(UInt8)").unwrap();
        let nullable = out.as_nullable().unwrap();
        assert_eq!(nullable.null_map().data(), &[0, 0]);
        assert_eq!(nullable.nested().as_u8(), Some(&[1u8, 0][..]));
    }

    #[test]
    fn nullable_to_plain_rejects_nulls() {
        let nested = Column::Int32(vec![1, 0].into());
        let nullable = NullableColumn::from_parts(nested, vec![0, 1].into()).unwrap();
        let err = cast(Column::Nullable(nullable), "Int32").unwrap_err();
        assert!(matches!(err, ConvertError::Cast { .. }));
    }

    #[test]
    fn casts_array_items_and_keeps_offsets() {
        let array = ArrayColumn::from_parts(Column::Int8(vec![1, 2, 3].into()), vec![0, 2, 3])
            .unwrap();
        let out = cast(Column::Array(array), "Array(Int32)").unwrap();
        let out = out.as_array().unwrap();
        assert_eq!(out.offsets(), &[0, 2, 3]);
        assert_eq!(out.data().as_i32(), Some(&[1i32, 2, 3][..]));
    }

    #[test]
    fn wraps_into_low_cardinality() {
        let out = cast(
            Column::String(StringColumn::from_values(["a"])),
            "LowCardinality(String)",
        )
        .unwrap();
        assert_eq!(out.data_type().to_string(), "LowCardinality(String)");
    }

    #[test]
    fn date_to_datetime_multiplies_days() {
        let out = cast(Column::Date(vec![0, 1].into()), "DateTime").unwrap();
        assert_eq!(out.as_date_time(), Some(&[0u32, 86_400][..]));
    }

    #[test]
    fn date_to_datetime_overflow_is_an_error() {
        let err = cast(Column::Date(vec![u16::MAX].into()), "DateTime").unwrap_err();
        assert!(matches!(err, ConvertError::Cast { .. }));
    }

    #[test]
    fn rescales_decimals() {
        let column = DecimalColumn::from_vec(10, 2, vec![Decimal128(12_345)]);
        let out = cast(Column::Decimal128(column.clone()), "Decimal(12, 4)").unwrap();
        assert_eq!(out.as_decimal().unwrap().data(), &[Decimal128(1_234_500)]);
        let out = cast(Column::Decimal128(column.clone()), "Decimal(10, 1)").unwrap();
        assert_eq!(out.as_decimal().unwrap().data(), &[Decimal128(1_234)]);
        let err = cast(Column::Decimal128(column), "Decimal(4, 2)").unwrap_err();
        assert!(matches!(err, ConvertError::Cast { .. }));
    }

    #[test]
    fn decimal_to_float_divides_by_scale() {
        let column = DecimalColumn::from_vec(10, 2, vec![Decimal128(-250)]);
        let out = cast(Column::Decimal128(column), "Float64").unwrap();
        assert_eq!(out.as_f64(), Some(&[-2.5f64][..]));
    }

    #[test]
    fn integer_to_decimal_scales_up() {
        let out = cast(Column::Int32(vec![3].into()), "Decimal(9, 2)").unwrap();
        let decimal = out.as_decimal().unwrap();
        assert_eq!((decimal.precision(), decimal.scale()), (9, 2));
        assert_eq!(decimal.data(), &[Decimal128(300)]);
    }

    #[test]
    fn string_to_number_is_not_supported() {
        let err = cast(Column::String(StringColumn::from_values(["1"])), "Int32").unwrap_err();
        assert!(matches!(err, ConvertError::Cast { .. }));
    }
}

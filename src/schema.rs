//! The expected output layout: an ordered list of named, typed columns.

use std::collections::HashSet;

use crate::{
    error::{ConvertError, Result},
    types::InternalType,
};

/// One expected output column.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HeaderColumn {
    /// Column name, matched exactly against Arrow field names.
    pub name: String,
    /// Declared internal type.
    #[cfg_attr(feature = "serde", serde(rename = "type"))]
    pub data_type: InternalType,
}

impl HeaderColumn {
    /// Create a header column.
    pub fn new(name: impl Into<String>, data_type: InternalType) -> Self {
        Self {
            name: name.into(),
            data_type,
        }
    }
}

/// Ordered output columns with unique names.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "Vec<HeaderColumn>", into = "Vec<HeaderColumn>"))]
pub struct Header {
    columns: Vec<HeaderColumn>,
}

impl Header {
    /// Build a header from `columns` in output order.
    ///
    /// # Errors
    /// Returns `ConvertError::DuplicateColumn` if two columns share a name.
    pub fn try_new(columns: Vec<HeaderColumn>) -> Result<Self> {
        let mut seen = HashSet::with_capacity(columns.len());
        if let Some(dup) = columns.iter().find(|c| !seen.insert(c.name.as_str())) {
            return Err(ConvertError::DuplicateColumn {
                column: dup.name.clone(),
            });
        }
        Ok(Self { columns })
    }

    /// Build a header from `(name, type)` pairs.
    ///
    /// # Errors
    /// Returns `ConvertError::DuplicateColumn` if two columns share a name.
    pub fn try_from_pairs<N: Into<String>>(
        pairs: impl IntoIterator<Item = (N, InternalType)>,
    ) -> Result<Self> {
        Self::try_new(
            pairs
                .into_iter()
                .map(|(name, data_type)| HeaderColumn::new(name, data_type))
                .collect(),
        )
    }

    /// Columns in output order.
    pub fn columns(&self) -> &[HeaderColumn] {
        &self.columns
    }

    /// Iterate over the columns in output order.
    pub fn iter(&self) -> std::slice::Iter<'_, HeaderColumn> {
        self.columns.iter()
    }

    /// Column at position `index`.
    pub fn get(&self, index: usize) -> Option<&HeaderColumn> {
        self.columns.get(index)
    }

    /// Column called `name`.
    pub fn find(&self, name: &str) -> Option<&HeaderColumn> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Number of columns.
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Whether the header has no columns.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

impl TryFrom<Vec<HeaderColumn>> for Header {
    type Error = ConvertError;

    fn try_from(columns: Vec<HeaderColumn>) -> Result<Self> {
        Self::try_new(columns)
    }
}

impl From<Header> for Vec<HeaderColumn> {
    fn from(header: Header) -> Self {
        header.columns
    }
}

impl<'a> IntoIterator for &'a Header {
    type Item = &'a HeaderColumn;
    type IntoIter = std::slice::Iter<'a, HeaderColumn>;

    fn into_iter(self) -> Self::IntoIter {
        self.columns.iter()
    }
}

//! A row-major table of vertex ids.

use crate::{
    error::{Error, Result},
    types::VId,
};

/// Rows of equal length stored contiguously.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    column_count: usize,
    data: Vec<VId>,
}

impl Table {
    pub fn new(column_count: usize) -> Self {
        Self {
            column_count,
            data: vec![],
        }
    }

    /// Wraps `data`, whose length must be a multiple of `column_count`.
    pub fn from_data(column_count: usize, data: Vec<VId>) -> Self {
        assert!(
            data.is_empty() || (column_count > 0 && data.len() % column_count == 0),
            "table data of length {} does not fit {} columns",
            data.len(),
            column_count
        );
        Self { column_count, data }
    }

    pub fn column_count(&self) -> usize {
        self.column_count
    }

    pub fn row_count(&self) -> usize {
        if self.column_count == 0 {
            0
        } else {
            self.data.len() / self.column_count
        }
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Makes room for `rows` more rows, reporting allocation failure as
    /// [`Error::OutOfMemory`].
    pub fn reserve_rows(&mut self, rows: usize) -> Result<()> {
        let additional = rows
            .checked_mul(self.column_count)
            .ok_or_else(|| Error::OutOfMemory(format!("{} rows do not fit in memory", rows)))?;
        self.data.try_reserve(additional)?;
        Ok(())
    }

    pub fn push_row(&mut self, row: &[VId]) -> Result<()> {
        assert_eq!(row.len(), self.column_count);
        self.reserve_rows(1)?;
        self.data.extend_from_slice(row);
        Ok(())
    }

    /// Moves every row of `other` to the end of this table.
    pub fn append(&mut self, other: &mut Table) -> Result<()> {
        assert!(other.is_empty() || other.column_count == self.column_count);
        self.reserve_rows(other.row_count())?;
        self.data.append(&mut other.data);
        Ok(())
    }

    pub fn row(&self, i: usize) -> &[VId] {
        &self.data[i * self.column_count..(i + 1) * self.column_count]
    }

    pub fn rows(&self) -> impl ExactSizeIterator<Item = &[VId]> + '_ {
        let column_count = self.column_count.max(1);
        self.data[..self.row_count() * self.column_count].chunks(column_count)
    }

    pub fn data(&self) -> &[VId] {
        &self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rows() {
        let mut table = Table::new(3);
        table.push_row(&[1, 2, 3]).unwrap();
        table.push_row(&[4, 5, 6]).unwrap();
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.row(1), &[4, 5, 6]);
        assert_eq!(table.rows().collect::<Vec<_>>(), vec![&[1, 2, 3], &[4, 5, 6]]);
    }

    #[test]
    fn test_append() {
        let mut table = Table::new(2);
        let mut other = Table::from_data(2, vec![0, 1, 1, 0]);
        table.append(&mut other).unwrap();
        assert_eq!(table.row_count(), 2);
        assert!(other.is_empty());
    }

    #[test]
    fn test_reserve_failure_is_reported() {
        let mut table = Table::new(4);
        assert!(matches!(
            table.reserve_rows(usize::MAX / 2),
            Err(Error::OutOfMemory(_))
        ));
        assert!(matches!(
            table.reserve_rows(usize::MAX / 64),
            Err(Error::OutOfMemory(_))
        ));
        assert!(table.is_empty());
        table.push_row(&[1, 2, 3, 4]).unwrap();
        assert_eq!(table.row_count(), 1);
    }

    #[test]
    fn test_no_columns() {
        let table = Table::new(0);
        assert_eq!(table.row_count(), 0);
        assert_eq!(table.rows().count(), 0);
    }
}

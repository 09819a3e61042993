use std::collections::HashSet;

use ndarray::{Array1, Array2, ArrayView1};

use crate::error::{PlsError, Result};

/// Named numeric columns over a shared set of observations (rows).
#[derive(Debug, Clone, PartialEq)]
pub struct DataTable {
    names: Vec<String>,
    values: Array2<f64>,
}

impl DataTable {
    pub fn new(names: Vec<String>, values: Array2<f64>) -> Result<Self> {
        if names.len() != values.ncols() {
            return Err(PlsError::Configuration(format!(
                "{} column names given for {} columns",
                names.len(),
                values.ncols()
            )));
        }
        let mut seen = HashSet::new();
        for name in &names {
            if !seen.insert(name.as_str()) {
                return Err(PlsError::Configuration(format!(
                    "duplicate column name: {name}"
                )));
            }
        }
        Ok(Self { names, values })
    }

    /// An empty table with `nrows` observations and no columns.
    pub fn with_rows(nrows: usize) -> Self {
        Self {
            names: Vec::new(),
            values: Array2::zeros((nrows, 0)),
        }
    }

    pub fn from_columns<S: Into<String>>(nrows: usize, columns: Vec<(S, Array1<f64>)>) -> Result<Self> {
        let mut table = Self::with_rows(nrows);
        for (name, column) in columns {
            table.set_column(name, column)?;
        }
        Ok(table)
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn values(&self) -> &Array2<f64> {
        &self.values
    }

    pub fn nrows(&self) -> usize {
        self.values.nrows()
    }

    pub fn ncols(&self) -> usize {
        self.values.ncols()
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }

    pub fn column(&self, name: &str) -> Option<ArrayView1<'_, f64>> {
        self.index_of(name).map(|idx| self.values.column(idx))
    }

    pub fn require_column(&self, name: &str) -> Result<ArrayView1<'_, f64>> {
        self.column(name)
            .ok_or_else(|| PlsError::Configuration(format!("missing data column: {name}")))
    }

    /// Replaces the column called `name`, or appends it when absent.
    pub fn set_column(&mut self, name: impl Into<String>, column: Array1<f64>) -> Result<()> {
        let name = name.into();
        if column.len() != self.nrows() {
            return Err(PlsError::Configuration(format!(
                "column {name} has {} values, table has {} rows",
                column.len(),
                self.nrows()
            )));
        }
        match self.index_of(&name) {
            Some(idx) => self.values.column_mut(idx).assign(&column),
            None => {
                self.values
                    .push_column(column.view())
                    .map_err(|e| PlsError::Configuration(e.to_string()))?;
                self.names.push(name);
            }
        }
        Ok(())
    }

    /// A new table holding the named columns in the given order.
    pub fn select(&self, names: &[&str]) -> Result<DataTable> {
        let mut out = DataTable::with_rows(self.nrows());
        for name in names {
            let column = self.require_column(name)?.to_owned();
            out.set_column(*name, column)?;
        }
        Ok(out)
    }
}

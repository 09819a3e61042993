use std::collections::HashSet;

use ndarray::{Array2, Axis};

use crate::error::{PlsError, Result};

/// Directed adjacency over latent variables. `values[[s, d]] == 1` means
/// `s -> d`: rows are predictors, columns are predicted. The diagonal is
/// always zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathMatrix {
    names: Vec<String>,
    values: Array2<u8>,
}

impl PathMatrix {
    /// A matrix over `names` with no edges.
    pub fn new<S: Into<String>>(names: impl IntoIterator<Item = S>) -> Result<Self> {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();
        let mut seen = HashSet::new();
        for name in &names {
            if !seen.insert(name.as_str()) {
                return Err(PlsError::Configuration(format!(
                    "duplicate latent variable in path matrix: {name}"
                )));
            }
        }
        let n = names.len();
        Ok(Self {
            names,
            values: Array2::zeros((n, n)),
        })
    }

    pub fn from_edges<S: Into<String>>(
        names: impl IntoIterator<Item = S>,
        edges: &[(&str, &str)],
    ) -> Result<Self> {
        let mut path = Self::new(names)?;
        for (source, destination) in edges {
            path.set(source, destination, true)?;
        }
        Ok(path)
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn values(&self) -> &Array2<u8> {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }

    pub fn require_index(&self, name: &str) -> Result<usize> {
        self.index_of(name)
            .ok_or_else(|| PlsError::UnknownNode(name.to_string()))
    }

    pub fn get(&self, source: &str, destination: &str) -> Result<bool> {
        let s = self.require_index(source)?;
        let d = self.require_index(destination)?;
        Ok(self.values[[s, d]] == 1)
    }

    pub fn set(&mut self, source: &str, destination: &str, edge: bool) -> Result<()> {
        let s = self.require_index(source)?;
        let d = self.require_index(destination)?;
        if s == d {
            return Err(PlsError::Configuration(format!(
                "self loop on {source} is not allowed"
            )));
        }
        self.values[[s, d]] = u8::from(edge);
        Ok(())
    }

    /// Nodes with an edge into `name`.
    pub fn predecessors(&self, name: &str) -> Result<Vec<String>> {
        let idx = self.require_index(name)?;
        Ok(self.collect_names(self.values.column(idx).iter().copied()))
    }

    /// Nodes `name` has an edge into.
    pub fn successors(&self, name: &str) -> Result<Vec<String>> {
        let idx = self.require_index(name)?;
        Ok(self.collect_names(self.values.row(idx).iter().copied()))
    }

    /// True when there is an edge between `i` and `j` in either direction.
    pub fn connected(&self, i: usize, j: usize) -> bool {
        self.values[[i, j]] == 1 || self.values[[j, i]] == 1
    }

    pub fn edges(&self) -> Vec<(String, String)> {
        let mut out = Vec::new();
        for ((s, d), v) in self.values.indexed_iter() {
            if *v == 1 {
                out.push((self.names[s].clone(), self.names[d].clone()));
            }
        }
        out
    }

    /// A copy of the matrix without `name`'s row and column.
    pub fn drop_node(&self, name: &str) -> Result<PathMatrix> {
        let idx = self.require_index(name)?;
        let keep: Vec<usize> = (0..self.len()).filter(|i| *i != idx).collect();
        let values = self.values.select(Axis(0), &keep).select(Axis(1), &keep);
        let names = keep.iter().map(|i| self.names[*i].clone()).collect();
        Ok(PathMatrix { names, values })
    }

    fn collect_names(&self, flags: impl Iterator<Item = u8>) -> Vec<String> {
        flags
            .zip(self.names.iter())
            .filter(|(flag, _)| *flag == 1)
            .map(|(_, name)| name.clone())
            .collect()
    }
}

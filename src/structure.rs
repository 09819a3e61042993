use plspm_weights::{PathMatrix, Result};

/// Working copy of a path matrix that accumulates new edges.
#[derive(Debug, Clone)]
pub struct Structure {
    path: PathMatrix,
}

impl Structure {
    pub fn new(path: &PathMatrix) -> Self {
        Self { path: path.clone() }
    }

    /// Adds `s -> d` for every source `s` and destination `d`. Nothing is
    /// changed when any name is unknown.
    pub fn add_path<S: AsRef<str>, D: AsRef<str>>(
        &mut self,
        sources: &[S],
        destinations: &[D],
    ) -> Result<()> {
        for name in sources.iter().map(AsRef::as_ref) {
            self.path.require_index(name)?;
        }
        for name in destinations.iter().map(AsRef::as_ref) {
            self.path.require_index(name)?;
        }
        for source in sources {
            for destination in destinations {
                self.path.set(source.as_ref(), destination.as_ref(), true)?;
            }
        }
        Ok(())
    }

    pub fn path(&self) -> PathMatrix {
        self.path.clone()
    }
}

use std::collections::HashSet;

use plspm_weights::treat::treat;
use plspm_weights::{Block, DataTable, Mode, MvSpec, PathMatrix, PlsError, Result, Scale};

use crate::parser::{ModelOp, parse_model};

#[derive(Debug, Clone, PartialEq)]
pub struct LatentVariable {
    pub name: String,
    pub mode: Mode,
    pub mvs: Vec<MvSpec>,
}

/// A latent variable built from other latent variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HigherOrder {
    pub name: String,
    pub constituents: Vec<String>,
}

/// Inner and outer model of a PLS path model.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    path: PathMatrix,
    lvs: Vec<LatentVariable>,
    hoc: Vec<HigherOrder>,
    scaled: bool,
    default_scale: Option<Scale>,
}

impl Config {
    pub fn new(path: PathMatrix) -> Self {
        Self {
            path,
            lvs: Vec::new(),
            hoc: Vec::new(),
            scaled: true,
            default_scale: None,
        }
    }

    /// Builds a configuration from lavaan-style model syntax:
    ///
    /// ```text
    /// A =~ a1 + a2          # reflective block
    /// B <~ b1 + ord*b2      # formative block, b2 ordinal
    /// H =~ L1 + L2          # higher-order construct over L1 and L2
    /// B ~ A + H             # structural paths A -> B, H -> B
    /// ```
    pub fn from_model(model: &str) -> Result<Config> {
        let spec = parse_model(model)?;

        let mut names: Vec<String> = Vec::new();
        for line in &spec.lines {
            if line.op != ModelOp::Regress && !names.contains(&line.lhs) {
                names.push(line.lhs.clone());
            }
        }
        let declared: HashSet<&str> = names.iter().map(String::as_str).collect();

        let mut path = PathMatrix::new(names.iter().cloned())?;
        for line in spec.lines.iter().filter(|l| l.op == ModelOp::Regress) {
            if !declared.contains(line.lhs.as_str()) {
                return Err(PlsError::Configuration(format!(
                    "latent variable {} has no measurement block",
                    line.lhs
                )));
            }
            for term in &line.terms {
                if term.scale.is_some() {
                    return Err(PlsError::Parse(format!(
                        "scale prefix not allowed on structural term {}",
                        term.var
                    )));
                }
                if !declared.contains(term.var.as_str()) {
                    return Err(PlsError::Configuration(format!(
                        "latent variable {} has no measurement block",
                        term.var
                    )));
                }
                path.set(&term.var, &line.lhs, true)?;
            }
        }

        let mut config = Config::new(path);
        for line in spec.lines.iter().filter(|l| l.op != ModelOp::Regress) {
            let mode = match line.op {
                ModelOp::Formative => Mode::B,
                _ => Mode::A,
            };
            let lv_terms = line
                .terms
                .iter()
                .filter(|t| declared.contains(t.var.as_str()))
                .count();
            if lv_terms == line.terms.len() {
                let constituents = line.terms.iter().map(|t| t.var.clone()).collect();
                config.add_higher_order(&line.lhs, mode, constituents)?;
            } else if lv_terms == 0 {
                let mut mvs = Vec::with_capacity(line.terms.len());
                for term in &line.terms {
                    let scale = match &term.scale {
                        Some(s) => Some(s.parse::<Scale>().map_err(|_| {
                            PlsError::Parse(format!("unknown scale {s} on {}", term.var))
                        })?),
                        None => None,
                    };
                    mvs.push(MvSpec::new(term.var.clone(), scale));
                }
                config.add_lv(&line.lhs, mode, mvs)?;
            } else {
                return Err(PlsError::Configuration(format!(
                    "block {} mixes latent and manifest variables",
                    line.lhs
                )));
            }
        }
        Ok(config)
    }

    /// Whether metric data is scaled to unit variance (it is always centred).
    pub fn with_scaled(mut self, scaled: bool) -> Self {
        self.scaled = scaled;
        self
    }

    /// Scale applied to every MV declared without one; makes the model non-metric.
    pub fn with_default_scale(mut self, scale: Scale) -> Self {
        self.default_scale = Some(scale);
        self
    }

    /// Adds `name`'s outer model, replacing any previous definition.
    pub fn add_lv(&mut self, name: &str, mode: Mode, mvs: Vec<MvSpec>) -> Result<()> {
        self.path.require_index(name)?;
        if mvs.is_empty() {
            return Err(PlsError::Configuration(format!(
                "latent variable {name} needs at least one manifest variable"
            )));
        }
        self.upsert_lv(LatentVariable {
            name: name.to_string(),
            mode,
            mvs,
        });
        Ok(())
    }

    /// Declares `name` as a higher-order construct over `constituents`.
    pub fn add_higher_order(
        &mut self,
        name: &str,
        mode: Mode,
        constituents: Vec<String>,
    ) -> Result<()> {
        if !self.path.contains(name) {
            return Err(PlsError::Configuration(format!(
                "higher-order construct {name} is not in the path matrix"
            )));
        }
        if constituents.len() < 2 {
            return Err(PlsError::Configuration(format!(
                "higher-order construct {name} needs at least two constituents"
            )));
        }
        let mut seen = HashSet::new();
        for lv in &constituents {
            if lv == name {
                return Err(PlsError::Configuration(format!(
                    "higher-order construct {name} cannot contain itself"
                )));
            }
            if !self.path.contains(lv) {
                return Err(PlsError::Configuration(format!(
                    "constituent {lv} of {name} is not in the path matrix"
                )));
            }
            if !seen.insert(lv.as_str()) {
                return Err(PlsError::Configuration(format!(
                    "constituent {lv} listed twice for {name}"
                )));
            }
        }
        self.upsert_lv(LatentVariable {
            name: name.to_string(),
            mode,
            mvs: Vec::new(),
        });
        let entry = HigherOrder {
            name: name.to_string(),
            constituents,
        };
        match self.hoc.iter_mut().find(|h| h.name == name) {
            Some(existing) => *existing = entry,
            None => self.hoc.push(entry),
        }
        Ok(())
    }

    pub fn hoc(&self) -> Option<&[HigherOrder]> {
        if self.hoc.is_empty() {
            None
        } else {
            Some(&self.hoc)
        }
    }

    pub fn path(&self) -> &PathMatrix {
        &self.path
    }

    pub fn scaled(&self) -> bool {
        self.scaled
    }

    pub fn default_scale(&self) -> Option<Scale> {
        self.default_scale
    }

    pub fn metric(&self) -> bool {
        self.default_scale.is_none()
            && self
                .lvs
                .iter()
                .all(|lv| lv.mvs.iter().all(|mv| mv.scale.is_none()))
    }

    pub fn lv(&self, name: &str) -> Option<&LatentVariable> {
        self.lvs.iter().find(|lv| lv.name == name)
    }

    pub fn lvs(&self) -> &[LatentVariable] {
        &self.lvs
    }

    pub fn mode(&self, name: &str) -> Result<Mode> {
        self.lv(name).map(|lv| lv.mode).ok_or_else(|| {
            PlsError::Configuration(format!("latent variable {name} has no declared mode"))
        })
    }

    /// Outer models of every LV with manifest variables, in path order. Scales
    /// are resolved against the default scale, and dropped in metric models.
    pub fn blocks(&self) -> Vec<Block> {
        let metric = self.metric();
        self.path
            .names()
            .iter()
            .filter_map(|name| self.lv(name))
            .filter(|lv| !lv.mvs.is_empty())
            .map(|lv| {
                let mvs = lv
                    .mvs
                    .iter()
                    .map(|mv| {
                        let scale = if metric {
                            None
                        } else {
                            mv.scale.or(self.default_scale)
                        };
                        MvSpec::new(mv.name.clone(), scale)
                    })
                    .collect();
                Block::new(lv.name.clone(), lv.mode, mvs)
            })
            .collect()
    }

    /// Every MV column the model uses. Metric data is centred and, when
    /// `scaled`, brought to unit sample variance (`n - 1` denominator).
    /// Non-metric data is kept raw; the calculator later brings unscaled
    /// MVs of non-metric models to unit population variance, like the
    /// quantified ones.
    pub fn treat(&self, data: &DataTable) -> Result<DataTable> {
        let metric = self.metric();
        let mut out = DataTable::with_rows(data.nrows());
        for block in self.blocks() {
            for mv in &block.mvs {
                if out.index_of(&mv.name).is_some() {
                    continue;
                }
                let column = data.require_column(&mv.name)?;
                let treated = if metric {
                    treat(column, true, self.scaled).map_err(|e| match e {
                        PlsError::Numerical(msg) => {
                            PlsError::Numerical(format!("{}: {msg}", mv.name))
                        }
                        other => other,
                    })?
                } else {
                    column.to_owned()
                };
                out.set_column(mv.name.clone(), treated)?;
            }
        }
        Ok(out)
    }

    fn upsert_lv(&mut self, lv: LatentVariable) {
        match self.lvs.iter_mut().find(|existing| existing.name == lv.name) {
            Some(existing) => *existing = lv,
            None => self.lvs.push(lv),
        }
    }
}

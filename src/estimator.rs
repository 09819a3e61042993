use std::collections::HashSet;

use plspm_weights::{
    DataTable, MvSpec, PathMatrix, PlsError, Result, Scale, WeightsCalculator, WeightsOutput,
};
use tracing::debug;

use crate::config::Config;
use crate::structure::Structure;

/// Runs the weights calculator over a configuration, re-estimating
/// higher-order constructs in a second stage.
#[derive(Debug, Clone)]
pub struct Estimator<'a> {
    config: &'a Config,
    hoc_path_first_stage: Option<PathMatrix>,
}

impl<'a> Estimator<'a> {
    pub fn new(config: &'a Config) -> Result<Self> {
        let hoc_path_first_stage = match config.hoc() {
            Some(_) => Some(hoc_path_first_stage(config)?),
            None => None,
        };
        Ok(Self {
            config,
            hoc_path_first_stage,
        })
    }

    pub fn config(&self) -> &Config {
        self.config
    }

    /// The path used by the first stage, when the model has higher-order constructs.
    pub fn first_stage_path(&self) -> Option<&PathMatrix> {
        self.hoc_path_first_stage.as_ref()
    }

    pub fn estimate<C: WeightsCalculator + ?Sized>(
        &self,
        calculator: &C,
        data: &DataTable,
    ) -> Result<WeightsOutput> {
        let path = self
            .hoc_path_first_stage
            .as_ref()
            .unwrap_or_else(|| self.config.path());

        let mut treated_data = self.config.treat(data)?;
        debug!(lvs = path.len(), rows = treated_data.nrows(), "first stage");
        let mut output = calculator.calculate(&self.config.blocks(), &treated_data, path)?;

        // Constituent scores from the first stage become the indicators of
        // each higher-order construct.
        if let Some(hocs) = self.config.hoc() {
            let scale = if self.config.metric() {
                None
            } else {
                Some(Scale::Num)
            };
            let manifest: HashSet<String> = treated_data.names().iter().cloned().collect();
            let mut extended = self.config.clone();
            for hoc in hocs {
                let mut new_mvs = Vec::with_capacity(hoc.constituents.len());
                for lv in &hoc.constituents {
                    // Constituents shared between constructs are not a clash.
                    if manifest.contains(lv) {
                        return Err(PlsError::Configuration(format!(
                            "indicator {lv} of {} collides with a manifest variable",
                            hoc.name
                        )));
                    }
                    let scores = output.scores.require_column(lv)?.to_owned();
                    treated_data.set_column(lv.clone(), scores)?;
                    new_mvs.push(MvSpec::new(lv.clone(), scale));
                }
                extended.add_lv(&hoc.name, self.config.mode(&hoc.name)?, new_mvs)?;
            }
            debug!(hocs = hocs.len(), "second stage");
            output = calculator.calculate(&extended.blocks(), &treated_data, extended.path())?;
        }

        Ok(output)
    }
}

/// Path for the first estimation stage: every higher-order construct is
/// replaced by its constituents, which take over its incoming and outgoing
/// edges.
pub fn hoc_path_first_stage(config: &Config) -> Result<PathMatrix> {
    let mut path = config.path().clone();
    for hoc in config.hoc().unwrap_or_default() {
        for name in std::iter::once(&hoc.name).chain(hoc.constituents.iter()) {
            if !path.contains(name) {
                return Err(PlsError::Configuration(format!(
                    "{name} of higher-order construct {} is not in the path matrix",
                    hoc.name
                )));
            }
        }

        let mut structure = Structure::new(&path);
        let predecessors = path.predecessors(&hoc.name)?;
        let successors = path.successors(&hoc.name)?;
        for lv in &predecessors {
            let targets = without(&hoc.constituents, lv);
            structure.add_path(&[lv], &targets)?;
        }
        for lv in &successors {
            let sources = without(&hoc.constituents, lv);
            structure.add_path(&sources, &[lv])?;
        }
        path = structure.path().drop_node(&hoc.name)?;
        debug!(
            hoc = %hoc.name,
            predecessors = predecessors.len(),
            successors = successors.len(),
            "expanded higher-order construct"
        );
    }
    Ok(path)
}

fn without<'a>(names: &'a [String], skip: &str) -> Vec<&'a str> {
    names
        .iter()
        .map(String::as_str)
        .filter(|n| *n != skip)
        .collect()
}

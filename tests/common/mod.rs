#![allow(dead_code)]

use std::cell::RefCell;

use ndarray::Array1;
use plspm::{
    Block, DataTable, OuterWeights, PathMatrix, PlsError, Result, WeightsCalculator,
    WeightsOutput,
};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand_distr::{Distribution, StandardNormal};

pub const HOC_MODEL: &str = "
    A =~ a1 + a2 + a3
    L1 =~ l11 + l12 + l13
    L2 =~ l21 + l22 + l23
    H =~ L1 + L2          # second order
    B =~ b1 + b2 + b3
    H ~ A
    B ~ H
";

pub const SIMPLE_MODEL: &str = "
    A =~ a1 + a2 + a3
    B =~ b1 + b2 + b3
    B ~ A
";

pub struct Simulated {
    pub data: DataTable,
    pub truth: DataTable,
}

fn normal(rng: &mut StdRng, n: usize) -> Array1<f64> {
    (0..n)
        .map(|_| {
            let v: f64 = StandardNormal.sample(&mut *rng);
            v
        })
        .collect()
}

/// `A -> H -> B` where `H` is the standardized sum of `L1` and `L2`, each LV
/// with three indicators loading 0.8.
pub fn simulate_hoc(n: usize, seed: u64) -> Simulated {
    let mut rng = StdRng::seed_from_u64(seed);
    let a = normal(&mut rng, n);
    let l1 = &a * 0.5 + &normal(&mut rng, n) * 0.75_f64.sqrt();
    let l2 = &a * 0.5 + &normal(&mut rng, n) * 0.75_f64.sqrt();
    let h_raw = &l1 + &l2;
    let h_sd = h_raw.std(1.0);
    let h = h_raw / h_sd;
    let b = &h * 0.6 + &normal(&mut rng, n) * 0.8;

    let mut data = DataTable::with_rows(n);
    for (prefix, lv) in [("a", &a), ("l1", &l1), ("l2", &l2), ("b", &b)] {
        for i in 1..=3 {
            let mv = lv * 0.8 + &normal(&mut rng, n) * 0.6 + 3.0;
            data.set_column(format!("{prefix}{i}"), mv).unwrap();
        }
    }
    let truth = DataTable::from_columns(
        n,
        vec![("A", a), ("L1", l1), ("L2", l2), ("H", h), ("B", b)],
    )
    .unwrap();
    Simulated { data, truth }
}

#[derive(Debug, Clone)]
pub struct Call {
    pub blocks: Vec<Block>,
    pub data: DataTable,
    pub path: PathMatrix,
}

/// Records every call; each LV's score is the column of its first MV.
#[derive(Default)]
pub struct Recording {
    pub calls: RefCell<Vec<Call>>,
}

impl WeightsCalculator for Recording {
    fn calculate(
        &self,
        blocks: &[Block],
        data: &DataTable,
        path: &PathMatrix,
    ) -> Result<WeightsOutput> {
        self.calls.borrow_mut().push(Call {
            blocks: blocks.to_vec(),
            data: data.clone(),
            path: path.clone(),
        });
        let mut scores = DataTable::with_rows(data.nrows());
        let mut weights = OuterWeights::default();
        for name in path.names() {
            let block = blocks
                .iter()
                .find(|b| &b.lv == name)
                .ok_or_else(|| PlsError::Configuration(format!("no block for {name}")))?;
            let first = &block.mvs[0].name;
            scores.set_column(name.clone(), data.require_column(first)?.to_owned())?;
            for mv in &block.mvs {
                weights.push(name, &mv.name, 1.0);
            }
        }
        Ok(WeightsOutput {
            final_data: data.clone(),
            scores,
            weights,
            iterations: 1,
        })
    }
}

pub struct Failing;

impl WeightsCalculator for Failing {
    fn calculate(
        &self,
        _blocks: &[Block],
        _data: &DataTable,
        _path: &PathMatrix,
    ) -> Result<WeightsOutput> {
        Err(PlsError::Numerical("singular matrix".to_string()))
    }
}

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use ndarray::Array2;

use plspm::logging::init_tracing;
use plspm::{Config, DataTable, PlsCalculator, Plspm, Scheme};

#[derive(Parser)]
#[command(name = "plspm")]
#[command(about = "Partial least squares path modeling", long_about = None)]
struct Cli {
    /// Model syntax file.
    #[arg(long, required = true)]
    model: PathBuf,
    /// Data file with a header row; comma or whitespace separated.
    #[arg(long, required = true)]
    data: PathBuf,
    #[arg(long, default_value = "centroid")]
    scheme: String,
    #[arg(long, default_value_t = 1e-7)]
    tolerance: f64,
    #[arg(long, default_value_t = 100)]
    max_iter: usize,
    /// Leave metric data unscaled (centred only).
    #[arg(long)]
    unscaled: bool,
    /// Output directory; scores go to stdout when absent.
    #[arg(long)]
    out: Option<PathBuf>,
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let model = fs::read_to_string(&cli.model).context("read model")?;
    let config = Config::from_model(&model)
        .context("build model")?
        .with_scaled(!cli.unscaled);
    let data = read_table(&cli.data).context("read data")?;
    let scheme: Scheme = cli.scheme.parse().context("parse scheme")?;
    let calculator = PlsCalculator::new(scheme)
        .with_tolerance(cli.tolerance)
        .with_max_iter(cli.max_iter);

    let fit = Plspm::fit(&config, &calculator, &data).context("estimate model")?;

    if let Some(out_dir) = cli.out {
        fs::create_dir_all(&out_dir).context("create output dir")?;
        write_table(out_dir.join("scores.tsv"), fit.scores())?;
        write_weights(out_dir.join("weights.tsv"), &fit)?;
        write_paths(out_dir.join("paths.tsv"), &fit)?;
    } else {
        write_table("/dev/stdout", fit.scores())?;
    }

    Ok(())
}

fn read_table(path: &Path) -> Result<DataTable> {
    let content = fs::read_to_string(path)?;
    let mut lines = content.lines().filter(|l| !l.trim().is_empty());
    let header = lines.next().context("data header")?;
    let names: Vec<String> = split_fields(header).map(str::to_string).collect();

    let mut values = Vec::new();
    let mut nrows = 0;
    for (i, line) in lines.enumerate() {
        let row: Vec<f64> = split_fields(line)
            .map(|s| s.parse::<f64>())
            .collect::<std::result::Result<Vec<_>, _>>()
            .with_context(|| format!("parse data row {}", i + 1))?;
        if row.len() != names.len() {
            return Err(anyhow::anyhow!(
                "data row {} has {} fields, header has {}",
                i + 1,
                row.len(),
                names.len()
            ));
        }
        values.extend(row);
        nrows += 1;
    }
    let values = Array2::from_shape_vec((nrows, names.len()), values)?;
    Ok(DataTable::new(names, values)?)
}

fn split_fields(line: &str) -> impl Iterator<Item = &str> {
    line.split(|c: char| c == ',' || c.is_whitespace())
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

fn write_table<P: AsRef<Path>>(path: P, table: &DataTable) -> Result<()> {
    let mut out = table.names().join("\t");
    out.push('\n');
    for row in table.values().rows() {
        let fields: Vec<String> = row.iter().map(|v| format!("{v:.10}")).collect();
        out.push_str(&fields.join("\t"));
        out.push('\n');
    }
    fs::write(path, out)?;
    Ok(())
}

fn write_weights<P: AsRef<Path>>(path: P, fit: &Plspm) -> Result<()> {
    let mut out = String::new();
    out.push_str("lv\tmv\tweight\tloading\n");
    for (w, l) in fit.weights().entries.iter().zip(&fit.loadings) {
        out.push_str(&format!(
            "{}\t{}\t{:.10}\t{:.10}\n",
            w.lv, w.mv, w.weight, l.loading
        ));
    }
    fs::write(path, out)?;
    Ok(())
}

fn write_paths<P: AsRef<Path>>(path: P, fit: &Plspm) -> Result<()> {
    let coefficients = &fit.inner.path_coefficients;
    let mut out = String::new();
    out.push_str("from\tto\testimate\n");
    for (s, from) in coefficients.names.iter().enumerate() {
        for (d, to) in coefficients.names.iter().enumerate() {
            let value = coefficients.values[[s, d]];
            if value != 0.0 {
                out.push_str(&format!("{from}\t{to}\t{value:.10}\n"));
            }
        }
    }
    for (lv, r2) in &fit.inner.r_squared {
        out.push_str(&format!("{lv}\tR2\t{r2:.10}\n"));
    }
    fs::write(path, out)?;
    Ok(())
}

use ndarray::{Array1, Array2, array};
use plspm_weights::calculator::group_means;
use plspm_weights::treat::{correction, sample_sd, standardize};
use plspm_weights::{
    DataTable, PathMatrix, PlsError, Result, Scale, ScaleContext,
};

struct FixedContext {
    grouped: Array1<f64>,
}

impl ScaleContext for FixedContext {
    fn mv_grouped_by_lv(&self, _lv: &str, _mv: &str) -> Result<Array1<f64>> {
        Ok(self.grouped.clone())
    }

    fn correction(&self) -> f64 {
        correction(self.grouped.len())
    }
}

#[test]
fn path_matrix_edges_and_neighbours() {
    let path = PathMatrix::from_edges(["A", "H", "B"], &[("A", "H"), ("H", "B")])
        .expect("path");
    assert!(path.get("A", "H").unwrap());
    assert!(!path.get("H", "A").unwrap());
    assert_eq!(path.predecessors("H").unwrap(), vec!["A".to_string()]);
    assert_eq!(path.successors("H").unwrap(), vec!["B".to_string()]);
    assert!(path.connected(0, 1) && path.connected(1, 0));
    assert!(!path.connected(0, 2));
    assert_eq!(
        path.edges(),
        vec![
            ("A".to_string(), "H".to_string()),
            ("H".to_string(), "B".to_string())
        ]
    );
}

#[test]
fn path_matrix_drop_node_keeps_remaining_edges() {
    let path = PathMatrix::from_edges(["A", "H", "B"], &[("A", "H"), ("A", "B")]).unwrap();
    let dropped = path.drop_node("H").unwrap();
    assert_eq!(dropped.names(), &["A".to_string(), "B".to_string()]);
    assert_eq!(dropped.values().dim(), (2, 2));
    assert!(dropped.get("A", "B").unwrap());
    assert!(matches!(dropped.get("A", "H"), Err(PlsError::UnknownNode(n)) if n == "H"));
}

#[test]
fn path_matrix_rejects_self_loops_and_duplicates() {
    let mut path = PathMatrix::new(["A", "B"]).unwrap();
    assert!(matches!(path.set("A", "A", true), Err(PlsError::Configuration(_))));
    assert!(matches!(path.set("A", "C", true), Err(PlsError::UnknownNode(_))));
    assert!(PathMatrix::new(["A", "A"]).is_err());
    for i in 0..path.len() {
        assert_eq!(path.values()[[i, i]], 0);
    }
}

#[test]
fn data_table_set_and_select() {
    let mut table = DataTable::with_rows(3);
    table.set_column("x", array![1.0, 2.0, 3.0]).unwrap();
    table.set_column("y", array![4.0, 5.0, 6.0]).unwrap();
    table.set_column("x", array![7.0, 8.0, 9.0]).unwrap();
    assert_eq!(table.names(), &["x".to_string(), "y".to_string()]);
    assert_eq!(table.column("x").unwrap()[0], 7.0);

    let selected = table.select(&["y", "x"]).unwrap();
    assert_eq!(selected.names(), &["y".to_string(), "x".to_string()]);
    assert!(matches!(
        table.select(&["z"]),
        Err(PlsError::Configuration(_))
    ));
    assert!(table.set_column("short", array![1.0]).is_err());
    assert!(
        DataTable::new(
            vec!["a".to_string(), "a".to_string()],
            Array2::zeros((2, 2))
        )
        .is_err()
    );
}

#[test]
fn standardize_and_correction() {
    let column = array![1.0, 2.0, 3.0, 4.0, 10.0];
    let z = standardize(column.view()).unwrap();
    assert!(z.mean().unwrap().abs() < 1e-12);
    assert!((sample_sd(z.view()) - 1.0).abs() < 1e-12);
    assert!((correction(5) - (5.0_f64 / 4.0).sqrt()).abs() < 1e-15);

    let constant = array![2.0, 2.0, 2.0];
    assert!(matches!(
        standardize(constant.view()),
        Err(PlsError::Numerical(_))
    ));
}

#[test]
fn raw_scale_is_identity_of_grouped_column() {
    let ctx = FixedContext {
        grouped: array![0.5, -1.0, 0.5, 2.0],
    };
    let out = Scale::Raw.scale("lv", "mv", &ctx).unwrap();
    assert_eq!(out, ctx.mv_grouped_by_lv("lv", "mv").unwrap());
}

#[test]
fn num_ord_nom_scales_agree() {
    let ctx = FixedContext {
        grouped: array![0.5, -1.0, 0.5, 2.0, 3.5, -0.25],
    };
    let num = Scale::Num.scale("lv", "mv", &ctx).unwrap();
    let ord = Scale::Ord.scale("lv", "mv", &ctx).unwrap();
    let nom = Scale::Nom.scale("lv", "mv", &ctx).unwrap();
    assert_eq!(num, ord);
    assert_eq!(num, nom);

    let n = num.len() as f64;
    assert!(num.mean().unwrap().abs() < 1e-12);
    let sum_sq: f64 = num.iter().map(|v| v * v).sum();
    assert!((sum_sq - n).abs() < 1e-9);
}

#[test]
fn scale_names_round_trip() {
    for scale in [Scale::Num, Scale::Raw, Scale::Ord, Scale::Nom] {
        assert_eq!(scale.to_string().parse::<Scale>().unwrap(), scale);
    }
    assert_eq!("ord".parse::<Scale>().unwrap(), Scale::Ord);
    assert!(matches!(
        "interval".parse::<Scale>(),
        Err(PlsError::Configuration(_))
    ));
}

#[test]
fn group_means_average_within_categories() {
    let keys = array![1.0, 2.0, 1.0, 3.0, 2.0];
    let values = array![1.0, 10.0, 3.0, 5.0, 20.0];
    let out = group_means(keys.view(), values.view());
    assert_eq!(out, array![2.0, 15.0, 2.0, 5.0, 15.0]);
}

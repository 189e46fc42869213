use antenna_match::prelude::*;
use std::f64::consts::PI;

fn main() {
    // Series RLC resonator tuned near 2.45 GHz, seen from a 50 Ω port.
    let (r, l, c) = (42.0, 3.0e-9, 1.406e-12);
    let z0 = 50.0;

    let samples: Vec<Sample> = linspace(2.0e9, 3.0e9, 201)
        .into_iter()
        .map(|f| {
            let w = 2.0 * PI * f;
            let z = CScalar::new(r, w * l - 1.0 / (w * c));
            Sample::new(f, (z - z0) / (z + z0))
        })
        .collect();

    let dataset = AntennaDataset::new("rlc_antenna", samples).expect("monotonic sweep");
    let evaluator = ImpedanceMatchEvaluator::new(z0);

    for target in [2.4e9, 2.45e9, 2.9e9] {
        match evaluator.evaluate_dataset(&dataset, target) {
            Ok(report) => println!("{report}\n"),
            Err(err) => eprintln!("{err}"),
        }
    }
}

use ratsolve::{
    domains::rational::Rational,
    printer::{PrintOptions, VectorPrinter},
    tensors::matrix::Matrix,
};

fn main() {
    let system = [["1/2", "1/3", "1"], ["1/4", "-1", "-1/2"], ["3/4", "-2/3", "1/2"]];

    println!("Solve linear system in x\u{20D7}:");
    for r in &system {
        println!("\t ({}).x\u{20D7} = {}", r[..2].join(","), r[2]);
    }

    let rows: Vec<Vec<Rational>> = system
        .iter()
        .map(|r| r.iter().map(|s| s.parse().unwrap()).collect())
        .collect();

    let mut m = Matrix::from_nested_vec(rows).unwrap();

    match m.solve() {
        Ok(sol) => {
            println!("Row echelon form:\n{}", m);
            println!(
                "x\u{20D7} = {{{}}}",
                VectorPrinter::new(sol.values(), PrintOptions::with_decimals(4))
            );
            if !sol.is_determined() {
                println!("The system is not fully determined");
            }
        }
        Err(e) => panic!("Could not solve {:?}", e),
    }
}

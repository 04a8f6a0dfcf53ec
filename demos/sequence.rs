use echo_nn::{ActivationFunction, CostFunction, Matrix, NetConfig, RecurrentNetwork};

/// Many-to-one echo task: after seeing a short binary sequence, the network
/// should reproduce the last symbol it saw.
fn main() {
    let config = NetConfig::new(500, 0.05, ActivationFunction::Tanh, CostFunction::Mse)
        .with_activation(0, ActivationFunction::Identity)
        .with_activation(2, ActivationFunction::Identity);

    let mut network =
        RecurrentNetwork::new_seeded(&[1, 4, 1], config, 7).expect("valid topology and config");

    let sequences: Vec<Vec<Matrix>> = vec![
        vec![0.0, 0.0, 1.0],
        vec![1.0, 0.0, 1.0],
        vec![0.0, 1.0, 0.0],
        vec![1.0, 1.0, 0.0],
    ]
    .into_iter()
    .map(|steps| steps.into_iter().map(|v| Matrix::column(&[v])).collect())
    .collect();

    let outputs: Vec<Matrix> = sequences
        .iter()
        .map(|sequence| sequence[sequence.len() - 1].clone())
        .collect();

    let before = network.evaluate(&sequences, &outputs).expect("matching sets");
    let last = network.train(&sequences, &outputs).expect("matching sets");
    println!("echo task: cost {before:.6} -> {last:.6}");

    for (sequence, expected) in sequences.iter().zip(outputs.iter()) {
        let output = network.output(sequence).expect("compatible sequence");
        println!(
            "last symbol {} -> predicted {:.4}",
            expected.get(0, 0),
            output.get(0, 0)
        );
    }
}

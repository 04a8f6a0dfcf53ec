use echo_nn::{ActivationFunction, CostFunction, FeedForwardNetwork, Matrix, NetConfig};

fn main() {
    // Sigmoid everywhere except the raw input layer.
    let config = NetConfig::new(10_000, 0.5, ActivationFunction::Sigmoid, CostFunction::Mse)
        .with_activation(0, ActivationFunction::Identity);

    let mut network = FeedForwardNetwork::new_seeded(&[2, 3, 1], config, 42)
        .expect("valid topology and config");

    let inputs = vec![
        Matrix::column(&[0.0, 0.0]),
        Matrix::column(&[0.0, 1.0]),
        Matrix::column(&[1.0, 0.0]),
        Matrix::column(&[1.0, 1.0]),
    ];
    let outputs = vec![
        Matrix::column(&[0.0]),
        Matrix::column(&[1.0]),
        Matrix::column(&[1.0]),
        Matrix::column(&[0.0]),
    ];

    let before = network.evaluate(&inputs, &outputs).expect("matching sets");
    let last = network.train(&inputs, &outputs).expect("matching sets");
    println!("XOR: cost {before:.6} -> {last:.6}");

    for input in &inputs {
        let output = network.output(input).expect("compatible input");
        println!(
            "Input: [{}, {}] -> Output: {:.4}",
            input.get(0, 0),
            input.get(1, 0),
            output.get(0, 0)
        );
    }
}

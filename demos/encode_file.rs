use std::env;
use std::fs;

fn main() {
    let fp = env::args().nth(1).expect("Please provide path to input file as first argument.");

    huffc::encode(&fp, "encoded.huff").expect("Failed to encode the input file.");
    huffc::decode("encoded.huff", "decoded.txt").expect("Failed to decode encoded.huff.");

    let before = fs::read(&fp).unwrap();
    let after = fs::read("decoded.txt").unwrap();
    let packed = fs::metadata("encoded.huff").unwrap().len();

    println!(
        "{} bytes -> {} bytes, round trip {}",
        before.len(),
        packed,
        if before == after { "ok" } else { "FAILED" }
    );
}

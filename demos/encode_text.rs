use huffc::{build_tree, derive_codes, Frequencies};
use std::io::Cursor;

fn main() {
    let s = String::from("Hello my name is Sam!");

    let tree = build_tree(&Frequencies::from_bytes(s.as_bytes())).unwrap();
    for (symbol, code) in derive_codes(&tree).iter() {
        let bits: String = code.iter().by_vals().map(|b| if b { '1' } else { '0' }).collect();
        println!("{:?} {}", symbol as char, bits);
    }

    let mut encoded = Cursor::new(Vec::new());
    let summary = huffc::encode_to(s.as_bytes(), &mut encoded).unwrap();
    println!("{:?}", summary);

    let dec = huffc::decode_from(&mut Cursor::new(encoded.into_inner())).map(String::from_utf8);
    println!("{:?}", dec);
}

//! Using the value!, sequence! and record! macros.
//!
//! Run with: cargo run --example macro

use binval::{record, sequence, to_vec, value, Value};
use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    let flag = value!(true);
    let number = value!(42);
    let text = value!("Hello, binval!");

    println!("Primitives:");
    println!("  bool:   {:?} -> {:02x?}", flag, to_vec(&flag)?);
    println!("  number: {:?} -> {:02x?}", number, to_vec(&number)?);
    println!("  text:   {:?} -> {} bytes\n", text, to_vec(&text)?.len());

    let numbers = sequence![1, 2, 3, 4, 5];
    println!("Sequence: {:?}", numbers);

    let config = record! {
        "name": "service",
        "port": 8080,
        "features": ["auth", "metrics"],
        "limits": { "connections": 100, "timeout_ms": 2500 }
    };
    println!("Record:   {:?}\n", config);

    let value = Value::Record(config);
    let bytes = to_vec(&value)?;
    println!("Encoded record in {} bytes", bytes.len());
    assert_eq!(binval::from_slice(&bytes)?, value);
    println!("✓ Round-trip successful");

    Ok(())
}

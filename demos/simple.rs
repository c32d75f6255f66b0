//! Basic binary encoding and decoding of a record.
//!
//! Run with: cargo run --example simple

use binval::{from_slice, to_vec, RecordValue, Value};
use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    let users = Value::from(vec![
        Value::Record(RecordValue::of([
            ("id", Value::from(42)),
            ("name", Value::from("Alice Johnson")),
            ("email", Value::from("alice@example.com")),
        ])),
        Value::Record(RecordValue::of([
            ("id", Value::from(43)),
            ("name", Value::from("Bob Smith")),
            ("email", Value::from("bob@example.com")),
        ])),
    ]);

    let bytes = to_vec(&users)?;
    println!("Encoded {} bytes:", bytes.len());
    for chunk in bytes.chunks(16) {
        let line: Vec<String> = chunk.iter().map(|b| format!("{:02x}", b)).collect();
        println!("  {}", line.join(" "));
    }

    let users_back = from_slice(&bytes)?;
    assert_eq!(users, users_back);
    println!("\n✓ Round-trip successful");
    println!("As JSON: {}", serde_json::to_string_pretty(&users_back)?);

    Ok(())
}

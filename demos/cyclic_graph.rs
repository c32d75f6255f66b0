//! Shared and self-referential structures.
//!
//! Sequences and records are shared handles: the same instance can appear in
//! several places, or inside itself. Each instance is written once and later
//! occurrences become small references.
//!
//! Run with: cargo run --example cyclic_graph

use binval::{from_slice, to_vec, RecordValue, Value};
use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    // a doubly linked pair: a.next = b, b.prev = a
    let a = RecordValue::of([("name", Value::from("a"))]);
    let b = RecordValue::of([("name", Value::from("b"))]);
    a.set("next", Value::Record(b.clone()));
    b.set("prev", Value::Record(a.clone()));
    a.set("self", Value::Record(a.clone()));

    let root = Value::Record(a.clone());
    let bytes = to_vec(&root)?;
    println!("Encoded cyclic graph in {} bytes: {:02x?}", bytes.len(), bytes);
    println!("Debug view: {:?}", root);

    let back = from_slice(&bytes)?;
    let a2 = back.as_record().ok_or("expected a record")?;
    let b2 = a2.get("next").ok_or("missing next")?;
    let prev = b2
        .as_record()
        .and_then(|r| r.get("prev"))
        .ok_or("missing prev")?;

    println!("\nb.prev is a:   {}", prev.ptr_eq(&back));
    println!("a.self is a:   {}", a2.get("self").is_some_and(|v| v.ptr_eq(&back)));
    println!("equal graphs:  {}", back == root);

    // shared, not cyclic: one string referenced three times
    let label = Value::from("a label long enough to notice");
    let repeated = Value::from(vec![label.clone(), label.clone(), label]);
    let distinct = Value::from(vec![
        Value::from("a label long enough to notice"),
        Value::from("a label long enough to notice"),
        Value::from("a label long enough to notice"),
    ]);
    println!(
        "\nthree aliases: {} bytes, three copies: {} bytes",
        to_vec(&repeated)?.len(),
        to_vec(&distinct)?.len()
    );

    // Rc cycles are not reclaimed automatically
    a.clear();
    b.clear();
    a2.clear();
    if let Some(b2) = b2.as_record() {
        b2.clear();
    }

    Ok(())
}

//! Annotating values and property names with attributes.
//!
//! Run with: cargo run --example attributes

use binval::{
    from_slice, to_vec, Attribute, AttributeSet, IntegerValue, PropertyName, RecordValue,
    StringValue, Value, ValueKind,
};
use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    let units = AttributeSet::from_pairs([("unit", Some("ms")), ("measured", None)])?;
    let latency = Value::Integer(IntegerValue::of(125).with_attributes(units));

    let mut pinned = AttributeSet::new();
    pinned.insert(Attribute::flag("pinned")?);

    let record = RecordValue::empty();
    record.set("latency", latency);
    record.set(PropertyName::new("host").with_attributes(pinned), Value::from("db-1"));
    // a typed null can still carry attributes
    record.set(
        "owner",
        Value::null(ValueKind::String).with_attributes(AttributeSet::from_pairs([(
            "reason",
            Some("unassigned"),
        )])?),
    );
    record.set(
        "label",
        Value::String(StringValue::of("primary").with_attributes(AttributeSet::from_pairs([
            ("lang", Some("en")),
        ])?)),
    );

    let value = Value::Record(record);
    let bytes = to_vec(&value)?;
    println!("Encoded {} bytes", bytes.len());

    let back = from_slice(&bytes)?;
    let back = back.as_record().ok_or("expected a record")?;
    for (name, value) in back.entries() {
        println!(
            "  {:<8} [{}] {:?} attributes: [{}]",
            name.as_str(),
            name.attributes(),
            value,
            value.attributes()
        );
    }

    match Attribute::new("9lives", None) {
        Ok(_) => println!("unexpected"),
        Err(e) => println!("\nrejected key: {}", e),
    }

    Ok(())
}

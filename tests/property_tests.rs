//! Property-based tests - roundtrip guarantees over generated values
//!
//! These complement the integration tests by checking that every encoded
//! value decodes back to an equal value, and that attribute sets behave as
//! sets regardless of insertion order.

use binval::{
    from_slice, to_vec, varint, AttributeSet, Decimal, RecordValue, StringValue, SymbolValue,
    Value,
};
use chrono::{DateTime, TimeDelta, Utc};
use num_bigint::{BigInt, Sign};
use proptest::prelude::*;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

fn roundtrip(value: &Value) -> bool {
    match to_vec(value) {
        Ok(bytes) => match from_slice(&bytes) {
            Ok(back) => back == *value,
            Err(e) => {
                eprintln!("Decode failed: {}", e);
                eprintln!("Encoded was: {:02x?}", bytes);
                false
            }
        },
        Err(e) => {
            eprintln!("Encode failed: {}", e);
            false
        }
    }
}

fn big_int() -> impl Strategy<Value = BigInt> {
    (any::<bool>(), prop::collection::vec(any::<u32>(), 0..6)).prop_map(|(negative, digits)| {
        let sign = if negative { Sign::Minus } else { Sign::Plus };
        BigInt::new(sign, digits)
    })
}

fn attribute_key() -> impl Strategy<Value = String> {
    "[A-Za-z_]([.-]?[A-Za-z0-9_]){0,6}"
}

fn attribute_set() -> impl Strategy<Value = AttributeSet> {
    prop::collection::vec(
        (attribute_key(), proptest::option::of("[ -~]{0,8}")),
        0..4,
    )
    .prop_map(|pairs| {
        AttributeSet::from_pairs(pairs.iter().map(|(k, v)| (k.as_str(), v.as_deref()))).unwrap()
    })
}

fn scalar() -> impl Strategy<Value = Value> {
    prop_oneof![
        any::<bool>().prop_map(Value::from),
        big_int().prop_map(Value::from),
        (big_int(), -40i64..40).prop_map(|(s, e)| Value::from(Decimal::new(s, e))),
        any::<i64>().prop_map(|n| Value::from(TimeDelta::nanoseconds(n))),
        (-10_000_000_000i64..10_000_000_000, 0u32..1_000_000_000).prop_map(|(s, n)| {
            Value::from(DateTime::<Utc>::from_timestamp(s, n).unwrap())
        }),
        any::<String>().prop_map(Value::from),
        prop::collection::vec(any::<u16>(), 0..16)
            .prop_map(|units| Value::String(StringValue::from_utf16(units))),
        prop::collection::vec(any::<u8>(), 0..16)
            .prop_map(|bytes| Value::Symbol(SymbolValue::from_latin1(&bytes))),
        prop::collection::vec(any::<u8>(), 0..32).prop_map(Value::from),
    ]
}

fn annotated_scalar() -> impl Strategy<Value = Value> {
    (scalar(), attribute_set(), any::<bool>()).prop_map(|(value, attributes, null)| {
        let value = if null { Value::null(value.kind()) } else { value };
        value.with_attributes(attributes)
    })
}

fn tree() -> impl Strategy<Value = Value> {
    annotated_scalar().prop_recursive(4, 48, 6, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..6).prop_map(Value::from),
            prop::collection::vec(("[a-z]{0,6}", inner), 0..6)
                .prop_map(|props| Value::Record(RecordValue::of(props))),
        ]
    })
}

proptest! {
    #[test]
    fn prop_scalar_roundtrip(value in annotated_scalar()) {
        prop_assert!(roundtrip(&value));
    }

    #[test]
    fn prop_tree_roundtrip(value in tree()) {
        prop_assert!(roundtrip(&value));
    }

    #[test]
    fn prop_encoding_is_deterministic(value in tree()) {
        prop_assert_eq!(to_vec(&value).unwrap(), to_vec(&value).unwrap());
    }

    #[test]
    fn prop_integer_magnitude_is_minimal(n in big_int()) {
        let bytes = to_vec(&Value::from(n.clone())).unwrap();
        let (_, magnitude) = n.to_bytes_le();
        if n.sign() == Sign::NoSign {
            prop_assert_eq!(bytes, vec![0x02]);
        } else {
            prop_assert_ne!(*magnitude.last().unwrap(), 0);
            prop_assert!(bytes.ends_with(&magnitude));
        }
    }

    #[test]
    fn prop_varint_roundtrip(n in any::<u64>()) {
        let mut encoded = Vec::new();
        varint::encode_u64(n, &mut encoded);
        prop_assert_eq!(encoded.len(), varint::encoded_len(n));
        let mut bytes = vec![0x88];
        bytes.extend(&encoded);
        // a Blob header declaring n bytes: decoding with a tiny limit must
        // report exactly n back (or succeed for n == 0)
        let options = binval::CodecOptions::new().with_max_length(0);
        match binval::from_slice_with_options(&bytes, options) {
            Ok(_) => prop_assert_eq!(n, 0),
            Err(binval::Error::LengthLimitExceeded { declared, .. }) => prop_assert_eq!(declared, n),
            Err(e) => prop_assert!(false, "unexpected error {:?}", e),
        }
    }

    #[test]
    fn prop_attribute_set_order_independent(
        pairs in prop::collection::vec((attribute_key(), proptest::option::of("[a-z]{0,4}")), 0..6)
    ) {
        let forward = AttributeSet::from_pairs(
            pairs.iter().map(|(k, v)| (k.as_str(), v.as_deref())),
        ).unwrap();
        let backward = AttributeSet::from_pairs(
            pairs.iter().rev().map(|(k, v)| (k.as_str(), v.as_deref())),
        ).unwrap();
        prop_assert_eq!(&forward, &backward);

        let hash = |set: &AttributeSet| {
            let mut hasher = DefaultHasher::new();
            set.hash(&mut hasher);
            hasher.finish()
        };
        prop_assert_eq!(hash(&forward), hash(&backward));
    }

    #[test]
    fn prop_truncation_never_panics(value in tree(), cut in any::<prop::sample::Index>()) {
        let bytes = to_vec(&value).unwrap();
        let len = cut.index(bytes.len());
        prop_assert!(from_slice(&bytes[..len]).unwrap_err().is_truncation());
    }
}

/// Builds a [`Value`](crate::Value) from a literal-like description.
///
/// Square brackets build a sequence, braces with string-literal keys build a
/// record, anything else goes through `Value::from`. Elements are single
/// token trees, so wrap negative numbers and compound expressions in
/// parentheses.
///
/// ```rust
/// use binval::value;
///
/// let v = value!({
///     "name": "Alice",
///     "scores": [1, 2, (-3)],
///     "active": true
/// });
/// let record = v.as_record().unwrap();
/// assert_eq!(record.len(), 3);
/// ```
#[macro_export]
macro_rules! value {
    (true) => {
        $crate::Value::from(true)
    };

    (false) => {
        $crate::Value::from(false)
    };

    ([ $($elem:tt),* $(,)? ]) => {
        $crate::Value::Sequence($crate::sequence![$($elem),*])
    };

    ({ $($key:literal : $value:tt),* $(,)? }) => {
        $crate::Value::Record($crate::record!{$($key: $value),*})
    };

    ($other:expr) => {
        $crate::Value::from($other)
    };
}

/// Builds a [`SequenceValue`](crate::SequenceValue); elements follow the
/// rules of [`value!`].
#[macro_export]
macro_rules! sequence {
    () => {
        $crate::SequenceValue::empty()
    };

    ($($elem:tt),+ $(,)?) => {
        $crate::SequenceValue::of(::std::vec![$($crate::value!($elem)),+])
    };
}

/// Builds a [`RecordValue`](crate::RecordValue) from `"name": value` pairs;
/// values follow the rules of [`value!`].
#[macro_export]
macro_rules! record {
    () => {
        $crate::RecordValue::empty()
    };

    ($($key:literal : $value:tt),+ $(,)?) => {{
        let record = $crate::RecordValue::empty();
        $(
            record.set($key, $crate::value!($value));
        )+
        record
    }};
}

//! Wire format reference.
//!
//! This module documents the byte layout produced by [`to_vec`](crate::to_vec)
//! and accepted by [`from_slice`](crate::from_slice). It contains no code.
//!
//! # Overview
//!
//! An encoded stream is one value (or, through [`Serializer`](crate::Serializer),
//! several root values back to back). There is no file header, no magic
//! number and no version byte: the byte sequence itself is the format.
//!
//! Every value is framed as
//!
//! ```text
//! [type metadata] [attribute set, if Annotated] [body, if not Null]
//! ```
//!
//! # Varints
//!
//! Unsigned integers of any size are written seven bits at a time, least
//! significant group first. The high bit of each byte is set when another
//! byte follows.
//!
//! ```text
//! 0       00
//! 1       01
//! 127     7f
//! 128     80 01
//! 300     ac 02
//! ```
//!
//! # Type metadata
//!
//! ```text
//! bit   7         6        5           4      3 2 1 0
//!       Overflow  Custom   Annotated   Null   type tag
//! ```
//!
//! | Tag | Type      | Custom metadata                                  |
//! |-----|-----------|--------------------------------------------------|
//! | 1   | Boolean   | none; the `Custom` bit is the value              |
//! | 2   | Integer   | `(magnitude bytes << 1) \| non-negative`         |
//! | 3   | Decimal   | `(magnitude bytes << 2) \| scale sign << 1 \| sign` |
//! | 4   | Duration  | as Integer, over nanoseconds                     |
//! | 5   | Timestamp | as Integer, over nanoseconds since the Unix epoch |
//! | 6   | String    | UTF-16 code unit count                           |
//! | 7   | Symbol    | byte count                                       |
//! | 8   | Blob      | byte count                                       |
//! | 9   | Sequence  | item count                                       |
//! | 10  | Record    | property count                                   |
//! | 11  | Reference | target address                                   |
//!
//! Tags 0 and 12 through 15 are never written and are rejected on read.
//!
//! `Overflow` is set exactly when the custom metadata is non-zero, in which
//! case the metadata follows the fixed byte as a varint. Zero integers, zero
//! decimals, empty texts, empty blobs and empty containers therefore take a
//! single byte:
//!
//! ```text
//! Integer 0        02
//! Boolean true     41
//! Boolean false    01
//! null String      16
//! empty Sequence   09
//! ```
//!
//! A null value never carries custom metadata, and the `Custom` bit is only
//! valid on a non-null Boolean.
//!
//! # Attribute sets
//!
//! Present only when `Annotated` is set (and always present for record
//! property names):
//!
//! ```text
//! count
//! repeated count times:
//!     key length, key bytes (UTF-8)
//!     00                                 (no value)
//!   | 01, value length, value bytes      (UTF-8)
//! ```
//!
//! Attributes are written in their canonical order (lexicographic over the
//! `key` or `key:value` rendering), so equal sets produce equal bytes.
//!
//! # Bodies
//!
//! | Type      | Body                                                     |
//! |-----------|----------------------------------------------------------|
//! | Boolean   | none                                                     |
//! | Integer   | magnitude, unsigned little-endian, minimal length        |
//! | Decimal   | scale magnitude as varint, then the significand magnitude |
//! | Duration  | as Integer                                               |
//! | Timestamp | as Integer                                               |
//! | String    | two bytes per code unit, little-endian                   |
//! | Symbol    | one byte per character (U+0000 to U+00FF)               |
//! | Blob      | raw bytes                                                |
//! | Sequence  | each item, framed                                        |
//! | Record    | per property: name length, name bytes, name attribute set, framed value |
//! | Reference | none                                                     |
//!
//! Keeping the sign in the metadata lets magnitudes be plain unsigned bytes:
//! `-128` is `82 02 80`, with no two's-complement padding byte.
//!
//! # References
//!
//! Strings, symbols, sequences and records are reference kinds. During one
//! pass each instance, null ones included, receives an address the first
//! time it is met, counting from zero in depth-first order. The first
//! occurrence is written in full; every later occurrence of the same
//! instance is written as a Reference header (tag 11) whose custom metadata
//! is the address. A reader assigns addresses in the same order:
//!
//! * a sequence or record is registered as soon as its header has been
//!   read, before its children, so a child may refer to it;
//! * a string or symbol is registered after its body has been read;
//! * booleans, numbers, durations, timestamps and blobs are never
//!   registered.
//!
//! A reference to an address that has not been registered yet is an error.
//! References carry no flags: `Null`, `Annotated` or `Custom` on tag 11 is
//! rejected.
//!
//! ```text
//! r = {"self": r}
//!
//! 8a 01          Record, one property        (address 0)
//! 04 73 65 6c 66 name "self"
//! 00             no name attributes
//! 0b             Reference to address 0
//! ```

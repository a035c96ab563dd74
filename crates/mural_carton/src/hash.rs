//! Fast fingerprints of resolved output using xxHash3.
//!
//! Used to compare two resolution passes without keeping both outputs around.

use serde_json::Value;
use xxhash_rust::xxh3::Xxh3;

/// Hash a sequence of `(key, value)` pairs independent of iteration order.
///
/// Values are hashed canonically: nested object keys are visited in sorted
/// order, so two maps with the same entries always hash the same.
pub fn hash_entries<'a, I>(entries: I) -> u64
where
    I: IntoIterator<Item = (&'a str, &'a Value)>,
{
    let mut sorted: Vec<(&str, &Value)> = entries.into_iter().collect();
    sorted.sort_unstable_by(|a, b| a.0.cmp(b.0));

    let mut hasher = Xxh3::new();
    for (key, value) in sorted {
        hasher.update(key.as_bytes());
        hasher.update(&[0xff]);
        feed(&mut hasher, value);
    }
    hasher.digest()
}

fn feed(hasher: &mut Xxh3, value: &Value) {
    match value {
        Value::Null => hasher.update(b"n"),
        Value::Bool(b) => hasher.update(if *b { b"t" } else { b"f" }),
        Value::Number(n) => {
            hasher.update(b"#");
            hasher.update(n.to_string().as_bytes());
        }
        Value::String(s) => {
            hasher.update(b"s");
            hasher.update(s.as_bytes());
            hasher.update(&[0]);
        }
        Value::Array(items) => {
            hasher.update(b"[");
            for item in items {
                feed(hasher, item);
            }
            hasher.update(b"]");
        }
        Value::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort_unstable();
            hasher.update(b"{");
            for key in keys {
                hasher.update(key.as_bytes());
                hasher.update(&[0xff]);
                feed(hasher, &map[key.as_str()]);
            }
            hasher.update(b"}");
        }
    }
}

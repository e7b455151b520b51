//! JSON canónico: claves ordenadas y números en forma textual fija.
//!
//! Dos payloads semánticamente iguales deben producir el mismo string sin
//! importar el orden de inserción de claves ni la representación original
//! del número (`1.0` y `1` canonicalizan igual; `-0.0` canonicaliza a `0`).

use serde_json::{Number, Value};
use std::collections::BTreeMap;

pub fn to_canonical_json(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => canonical_number(n),
        Value::String(s) => serde_json::to_string(s).unwrap_or_default(),
        Value::Array(arr) => {
            let items: Vec<String> = arr.iter().map(to_canonical_json).collect();
            format!("[{}]", items.join(","))
        }
        Value::Object(map) => {
            let mut tree = BTreeMap::new();
            for (k, v) in map {
                tree.insert(k, to_canonical_json(v));
            }
            let items: Vec<String> = tree
                .into_iter()
                .map(|(k, v)| format!("{}:{}", serde_json::to_string(&k).unwrap_or_default(), v))
                .collect();
            format!("{{{}}}", items.join(","))
        }
    }
}

/// Forma textual fija de un número JSON.
/// Enteros sin parte fraccional; flotantes con el round-trip más corto de
/// `f64` (Display de Rust); un flotante de valor entero colapsa al entero.
fn canonical_number(n: &Number) -> String {
    if let Some(i) = n.as_i64() {
        return i.to_string();
    }
    if let Some(u) = n.as_u64() {
        return u.to_string();
    }
    match n.as_f64() {
        Some(f) if f == 0.0 => "0".to_string(), // cubre -0.0
        Some(f) if f.fract() == 0.0 && f.abs() < 9e15 => format!("{}", f as i64),
        Some(f) => format!("{f}"),
        None => n.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn object_keys_are_sorted() {
        let a = json!({"b": 1, "a": 2});
        let b = json!({"a": 2, "b": 1});
        assert_eq!(to_canonical_json(&a), to_canonical_json(&b));
        assert_eq!(to_canonical_json(&a), r#"{"a":2,"b":1}"#);
    }

    #[test]
    fn numbers_canonicalize_to_fixed_text() {
        assert_eq!(to_canonical_json(&json!(1.0)), "1");
        assert_eq!(to_canonical_json(&json!(-0.0)), "0");
        assert_eq!(to_canonical_json(&json!(1.5)), "1.5");
        assert_eq!(to_canonical_json(&json!(42)), "42");
    }

    #[test]
    fn nested_structures_are_stable() {
        let v = json!({"z": [1, {"y": 2.0, "x": null}], "a": "s"});
        assert_eq!(to_canonical_json(&v), r#"{"a":"s","z":[1,{"x":null,"y":2}]}"#);
    }
}

//! Deserializadores tolerantes para las respuestas del backend
//!
//! El backend no es consistente con los tipos: `ativo` llega como 1/0 o true/false,
//! los teléfonos a veces como número, los ids del distribuidor como texto.

use serde::{de, Deserialize, Deserializer};
use serde_json::Value;

/// `1`, `"1"`, `true` → true; todo lo demás → false
pub fn flag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Bool(b) => b,
        Value::Number(n) => n.as_i64().map_or(false, |v| v != 0),
        Value::String(s) => matches!(s.trim(), "1" | "true" | "S" | "s"),
        _ => false,
    })
}

/// Texto opcional que puede llegar como número
pub fn opt_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) if s.trim().is_empty() => None,
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        Some(Value::Bool(b)) => Some(b.to_string()),
        Some(other) => Some(other.to_string()),
    })
}

/// Entero opcional que puede llegar como texto
pub fn opt_i64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<i64>, D::Error> {
    let value = Option::<Value>::deserialize(deserializer)?;
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => n
            .as_i64()
            .map(Some)
            .ok_or_else(|| de::Error::custom(format!("id inválido: {}", n))),
        Some(Value::String(s)) if s.trim().is_empty() => Ok(None),
        Some(Value::String(s)) => s
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| de::Error::custom(format!("id inválido: {}", s))),
        Some(other) => Err(de::Error::custom(format!("id inválido: {}", other))),
    }
}

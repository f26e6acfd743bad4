//! Helpers de dinero
//!
//! El backend manda precios a veces como número (8.5) y a veces como texto ("8.50").
//! Internamente todo se maneja con `Decimal` para que los totales del carrito sean exactos.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{de, Deserialize, Deserializer, Serializer};
use std::str::FromStr;

/// Formatear valor en reales como en la pantalla del PDV ("R$ 32.00")
pub fn format_brl(value: Decimal) -> String {
    format!("R$ {}", to_cents(value))
}

/// Redondear a 2 casas (centavos)
pub fn to_cents(value: Decimal) -> Decimal {
    let mut rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(2);
    rounded
}

/// Parsear texto del backend o del teclado ("8,50", "8.50", "8.5")
pub fn parse_decimal(raw: &str) -> Option<Decimal> {
    let normalized = raw.trim().replace(',', ".");
    if normalized.is_empty() {
        return None;
    }
    Decimal::from_str(&normalized)
        .or_else(|_| Decimal::from_scientific(&normalized))
        .ok()
}

fn decimal_from_value<E: de::Error>(value: serde_json::Value) -> Result<Option<Decimal>, E> {
    match value {
        serde_json::Value::Null => Ok(None),
        serde_json::Value::Number(n) => parse_decimal(&n.to_string())
            .map(Some)
            .ok_or_else(|| E::custom(format!("número inválido: {}", n))),
        serde_json::Value::String(s) if s.trim().is_empty() => Ok(None),
        serde_json::Value::String(s) => parse_decimal(&s)
            .map(Some)
            .ok_or_else(|| E::custom(format!("valor monetário inválido: {}", s))),
        other => Err(E::custom(format!("esperado número ou texto, recebido {}", other))),
    }
}

/// Decimal que acepta número o texto; serializa como número JSON
pub mod flexible {
    use super::*;

    pub fn serialize<S: Serializer>(value: &Decimal, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(value.to_f64().unwrap_or_default())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Decimal, D::Error> {
        let value = serde_json::Value::deserialize(deserializer)?;
        Ok(decimal_from_value::<D::Error>(value)?.unwrap_or_default())
    }
}

/// Decimal que viaja como texto con 2 casas ("32.00"), formato de `contas_receber`
pub mod as_text {
    use super::*;

    pub fn serialize<S: Serializer>(value: &Decimal, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&to_cents(*value).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Decimal, D::Error> {
        let value = serde_json::Value::deserialize(deserializer)?;
        Ok(decimal_from_value::<D::Error>(value)?.unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Serialize;

    #[derive(Debug, Serialize, Deserialize)]
    struct Precio {
        #[serde(with = "flexible")]
        preco: Decimal,
        #[serde(with = "as_text")]
        valor: Decimal,
    }

    #[test]
    fn test_format_brl() {
        assert_eq!(format_brl(Decimal::new(32, 0)), "R$ 32.00");
        assert_eq!(format_brl(Decimal::new(2350, 2)), "R$ 23.50");
        assert_eq!(format_brl(Decimal::new(10005, 3)), "R$ 10.01");
    }

    #[test]
    fn test_parse_decimal() {
        assert_eq!(parse_decimal("8,50"), Some(Decimal::new(850, 2)));
        assert_eq!(parse_decimal(" 15 "), Some(Decimal::new(15, 0)));
        assert_eq!(parse_decimal(""), None);
        assert_eq!(parse_decimal("abc"), None);
    }

    #[test]
    fn test_flexible_accepts_number_and_text() {
        let a: Precio = serde_json::from_str(r#"{"preco": 8.5, "valor": "32.00"}"#).unwrap();
        assert_eq!(a.preco, Decimal::new(85, 1));
        assert_eq!(a.valor, Decimal::new(3200, 2));

        let b: Precio = serde_json::from_str(r#"{"preco": "8.50", "valor": 32}"#).unwrap();
        assert_eq!(b.preco, Decimal::new(850, 2));
        assert_eq!(b.valor, Decimal::new(32, 0));

        assert!(serde_json::from_str::<Precio>(r#"{"preco": "oito", "valor": 1}"#).is_err());
    }

    #[test]
    fn test_serialization_shapes() {
        let p = Precio {
            preco: Decimal::new(850, 2),
            valor: Decimal::new(235, 1),
        };
        let json = serde_json::to_value(&p).unwrap();
        assert_eq!(json["preco"], serde_json::json!(8.5));
        assert_eq!(json["valor"], serde_json::json!("23.50"));
    }
}

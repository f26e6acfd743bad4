//! Utilidades de validación
//!
//! Este módulo contiene funciones helper para validación de datos
//! de formularios (cadastro de clientes, check-in) y conversión de tipos.

use chrono::{NaiveDate, NaiveDateTime};
use lazy_static::lazy_static;
use regex::Regex;
use validator::ValidationError;

/// Formato de fecha usado por el backend en las ventas ("yyyy-MM-dd HH:mm:ss")
pub const API_DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

lazy_static! {
    static ref CEP_REGEX: Regex = Regex::new(r"^\d{5}-?\d{3}$").unwrap();
    static ref NON_DIGIT_REGEX: Regex = Regex::new(r"\D").unwrap();
}

/// Quitar todo lo que no sea dígito (teléfonos, CEP, CPF/CNPJ)
pub fn only_digits(value: &str) -> String {
    NON_DIGIT_REGEX.replace_all(value, "").into_owned()
}

/// Validar y convertir string a fecha
pub fn validate_date(value: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| {
        let mut error = ValidationError::new("date");
        error.add_param("value".into(), &value.to_string());
        error.add_param("format".into(), &"YYYY-MM-DD".to_string());
        error
    })
}

/// Validar y convertir la fecha de venta del backend
pub fn validate_api_datetime(value: &str) -> Result<NaiveDateTime, ValidationError> {
    NaiveDateTime::parse_from_str(value, API_DATETIME_FORMAT)
        .or_else(|_| NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S"))
        .or_else(|_| {
            validate_date(value)
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
                .ok_or(())
        })
        .map_err(|_| {
            let mut error = ValidationError::new("datetime");
            error.add_param("value".into(), &value.to_string());
            error.add_param("format".into(), &"YYYY-MM-DD HH:MM:SS".to_string());
            error
        })
}

/// Validar que un string no esté vacío
pub fn validate_not_empty(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut error = ValidationError::new("not_empty");
        error.add_param("value".into(), &value.to_string());
        return Err(error);
    }
    Ok(())
}

/// Validar teléfono brasileño: DDD + número (10 u 11 dígitos), con o sin máscara
pub fn validate_phone(value: &str) -> Result<(), ValidationError> {
    let clean_phone = only_digits(value);
    if clean_phone.len() < 10 || clean_phone.len() > 11 {
        let mut error = ValidationError::new("phone");
        error.add_param("value".into(), &value.to_string());
        return Err(error);
    }
    Ok(())
}

/// Validar CEP (00000-000 o 00000000)
pub fn validate_cep(value: &str) -> Result<(), ValidationError> {
    if !CEP_REGEX.is_match(value.trim()) {
        let mut error = ValidationError::new("cep");
        error.add_param("value".into(), &value.to_string());
        error.add_param("format".into(), &"00000-000".to_string());
        return Err(error);
    }
    Ok(())
}

/// Validar formato de coordenadas GPS (simplificado)
pub fn validate_coordinates(lat: f64, lng: f64) -> Result<(), ValidationError> {
    if !(-90.0..=90.0).contains(&lat) {
        let mut error = ValidationError::new("latitude");
        error.add_param("value".into(), &lat);
        error.add_param("range".into(), &"-90.0 to 90.0".to_string());
        return Err(error);
    }

    if !(-180.0..=180.0).contains(&lng) {
        let mut error = ValidationError::new("longitude");
        error.add_param("value".into(), &lng);
        error.add_param("range".into(), &"-180.0 to 180.0".to_string());
        return Err(error);
    }

    Ok(())
}

/// Parsear coordenadas que llegan como texto del backend
pub fn parse_coordinates(lat: &str, lng: &str) -> Option<(f64, f64)> {
    let lat: f64 = lat.trim().replace(',', ".").parse().ok()?;
    let lng: f64 = lng.trim().replace(',', ".").parse().ok()?;
    validate_coordinates(lat, lng).ok()?;
    Some((lat, lng))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_date() {
        assert!(validate_date("2024-01-15").is_ok());
        assert!(validate_date("2024/01/15").is_err());
    }

    #[test]
    fn test_validate_api_datetime() {
        let dt = validate_api_datetime("2024-01-24 14:30:00").unwrap();
        assert_eq!(dt.format("%H:%M").to_string(), "14:30");
        assert!(validate_api_datetime("2024-01-24T14:30:00").is_ok());
        assert!(validate_api_datetime("2024-01-24").is_ok());
        assert!(validate_api_datetime("24/01/2024").is_err());
    }

    #[test]
    fn test_validate_phone() {
        assert!(validate_phone("(11) 99999-9999").is_ok());
        assert!(validate_phone("1133334444").is_ok());
        assert!(validate_phone("99999-9999").is_err());
        assert!(validate_phone("+55 (11) 99999-9999").is_err());
    }

    #[test]
    fn test_validate_cep() {
        assert!(validate_cep("01310-100").is_ok());
        assert!(validate_cep("01310100").is_ok());
        assert!(validate_cep("0131-0100").is_err());
        assert!(validate_cep("abc").is_err());
    }

    #[test]
    fn test_only_digits() {
        assert_eq!(only_digits("(11) 99999-1234"), "11999991234");
        assert_eq!(only_digits(""), "");
    }

    #[test]
    fn test_validate_coordinates() {
        assert!(validate_coordinates(-23.55, -46.63).is_ok());
        assert!(validate_coordinates(91.0, -75.0).is_err());
        assert!(validate_coordinates(45.0, -181.0).is_err());
    }

    #[test]
    fn test_parse_coordinates() {
        assert_eq!(parse_coordinates("-23.5", "-46.6"), Some((-23.5, -46.6)));
        assert_eq!(parse_coordinates("-23,5", "-46,6"), Some((-23.5, -46.6)));
        assert_eq!(parse_coordinates("", "-46.6"), None);
        assert_eq!(parse_coordinates("120", "0"), None);
    }
}

//! Field validation for payout account requests.
//!
//! Each validator returns `AppError::BadRequest` naming the offending field so the
//! message can be surfaced to the caller verbatim.

use crate::server::error::AppError;

/// Ensures a required text field is present and not just whitespace.
///
/// # Arguments
/// - `field` - Field name used in the error message
/// - `value` - Submitted value
///
/// # Returns
/// - `Ok(())` - Value has non-whitespace content
/// - `Err(AppError::BadRequest)` - Value is empty
pub fn require_non_empty(field: &str, value: &str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::BadRequest(format!("{} is required", field)));
    }

    Ok(())
}

/// Validates an Indian PAN: five letters, four digits, one letter (`AAAAA9999A`).
pub fn validate_pan(pan: &str) -> Result<(), AppError> {
    let bytes = pan.as_bytes();
    let valid = bytes.len() == 10
        && bytes[..5].iter().all(u8::is_ascii_uppercase)
        && bytes[5..9].iter().all(u8::is_ascii_digit)
        && bytes[9].is_ascii_uppercase();

    if !valid {
        return Err(AppError::BadRequest(
            "PAN must be in the format AAAAA9999A".to_string(),
        ));
    }

    Ok(())
}

/// Validates a GSTIN: fifteen uppercase alphanumeric characters.
pub fn validate_gst(gst: &str) -> Result<(), AppError> {
    let valid = gst.len() == 15
        && gst
            .bytes()
            .all(|b| b.is_ascii_digit() || b.is_ascii_uppercase());

    if !valid {
        return Err(AppError::BadRequest(
            "GST number must be 15 alphanumeric characters".to_string(),
        ));
    }

    Ok(())
}

/// Validates an IFSC code: four letters, a zero, then six alphanumerics (`AAAA0XXXXXX`).
pub fn validate_ifsc(ifsc: &str) -> Result<(), AppError> {
    let bytes = ifsc.as_bytes();
    let valid = bytes.len() == 11
        && bytes[..4].iter().all(u8::is_ascii_uppercase)
        && bytes[4] == b'0'
        && bytes[5..]
            .iter()
            .all(|b| b.is_ascii_digit() || b.is_ascii_uppercase());

    if !valid {
        return Err(AppError::BadRequest(
            "IFSC code must be in the format AAAA0XXXXXX".to_string(),
        ));
    }

    Ok(())
}

/// Validates a bank account number: 9 to 18 digits.
pub fn validate_account_number(account_number: &str) -> Result<(), AppError> {
    let valid = (9..=18).contains(&account_number.len())
        && account_number.bytes().all(|b| b.is_ascii_digit());

    if !valid {
        return Err(AppError::BadRequest(
            "Account number must be 9 to 18 digits".to_string(),
        ));
    }

    Ok(())
}

/// Loose email check: a non-empty local part and a dotted domain.
pub fn validate_email(email: &str) -> Result<(), AppError> {
    let valid = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
        }
        None => false,
    };

    if !valid {
        return Err(AppError::BadRequest("Email address is invalid".to_string()));
    }

    Ok(())
}

/// Phone numbers are 10 to 15 digits with an optional leading `+`.
pub fn validate_phone(phone: &str) -> Result<(), AppError> {
    let digits = phone.strip_prefix('+').unwrap_or(phone);
    let valid =
        (10..=15).contains(&digits.len()) && digits.bytes().all(|b| b.is_ascii_digit());

    if !valid {
        return Err(AppError::BadRequest("Phone number is invalid".to_string()));
    }

    Ok(())
}

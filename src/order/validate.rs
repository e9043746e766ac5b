use crate::model::Cart;

/// Letters and whitespace only, at least one letter-or-space after trimming.
pub fn is_name_valid(name: &str) -> bool {
    let name = name.trim();
    !name.is_empty() && name.chars().all(|c| c.is_alphabetic() || c.is_whitespace())
}

/// Decimal digits only.
pub fn is_phone_valid(phone: &str) -> bool {
    let phone = phone.trim();
    !phone.is_empty() && phone.chars().all(|c| c.is_ascii_digit())
}

pub fn checkout_enabled(name: &str, phone: &str, cart: &Cart) -> bool {
    is_name_valid(name) && is_phone_valid(phone) && !cart.is_empty()
}

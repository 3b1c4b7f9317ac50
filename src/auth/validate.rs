/// Validate a dish name: required, at most 80 characters.
pub fn validate_dish_name(name: &str) -> Option<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Some("O nome do prato é obrigatório.".to_string());
    }
    if trimmed.chars().count() > 80 {
        return Some("O nome do prato deve ter no máximo 80 caracteres.".to_string());
    }
    None
}

/// Validate an email: must contain '@' and '.', max 254 chars.
pub fn validate_email(email: &str) -> Option<String> {
    let trimmed = email.trim();
    if trimmed.is_empty() {
        return Some("O e-mail é obrigatório.".to_string());
    }
    if trimmed.len() > 254 {
        return Some("O e-mail deve ter no máximo 254 caracteres.".to_string());
    }
    if !trimmed.contains('@') || !trimmed.contains('.') {
        return Some("Informe um endereço de e-mail válido.".to_string());
    }
    None
}

/// Validate a password: min 8 chars on create.
pub fn validate_password(password: &str) -> Option<String> {
    if password.is_empty() {
        return Some("A senha é obrigatória.".to_string());
    }
    if password.len() < 8 {
        return Some("A senha deve ter pelo menos 8 caracteres.".to_string());
    }
    None
}

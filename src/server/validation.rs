use crate::server::response::ApiError;

const MAX_USERNAME_LEN: usize = 64;
const MAX_NAME_LEN: usize = 120;
const MAX_TITLE_LEN: usize = 200;

fn validate_required(value: &str, label: &str, max_len: usize) -> Result<(), String> {
    if value.trim().is_empty() {
        return Err(format!("{label} é obrigatório"));
    }
    if value.len() > max_len {
        return Err(format!("{label} não pode exceder {max_len} caracteres"));
    }
    Ok(())
}

pub fn validate_username(username: &str) -> Result<(), ApiError> {
    if username.contains(char::is_whitespace) {
        return Err(ApiError::bad_request(
            "O nome de usuário não pode conter espaços",
        ));
    }
    validate_required(username, "O nome de usuário", MAX_USERNAME_LEN).map_err(ApiError::bad_request)
}

pub fn validate_password(password: &str) -> Result<(), ApiError> {
    if password.is_empty() {
        return Err(ApiError::bad_request("A senha é obrigatória"));
    }
    Ok(())
}

pub fn validate_name(name: &str) -> Result<(), ApiError> {
    validate_required(name, "O nome", MAX_NAME_LEN).map_err(ApiError::bad_request)
}

pub fn validate_title(title: &str) -> Result<(), ApiError> {
    validate_required(title, "O título", MAX_TITLE_LEN).map_err(ApiError::bad_request)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_values_rejected() {
        assert!(validate_username("").is_err());
        assert!(validate_username("   ").is_err());
        assert!(validate_password("").is_err());
        assert!(validate_name("").is_err());
        assert!(validate_title("").is_err());
    }

    #[test]
    fn test_username_whitespace_rejected() {
        assert!(validate_username("maria silva").is_err());
        assert!(validate_username("maria").is_ok());
    }

    #[test]
    fn test_length_limits() {
        assert!(validate_username(&"a".repeat(MAX_USERNAME_LEN)).is_ok());
        assert!(validate_username(&"a".repeat(MAX_USERNAME_LEN + 1)).is_err());
        assert!(validate_title(&"t".repeat(MAX_TITLE_LEN + 1)).is_err());
    }
}

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde_json::json;
use std::fmt;

/// Application error taxonomy. Domain outcomes carry the user-facing
/// message the client shows as-is; infrastructure failures map to 5xx and
/// are logged server-side.
#[derive(Debug, PartialEq, Eq)]
pub enum AppError {
    Unauthenticated,
    InvalidCredentials,
    Forbidden,
    RateLimited,
    Validation(String),
    DuplicateName,
    DuplicateEmail,
    AlreadyVoted,
    NotFound,
    Persistence(String),
    Hash(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Unauthenticated => {
                write!(f, "Você precisa estar autenticado para fazer isso.")
            }
            AppError::InvalidCredentials => write!(f, "E-mail ou senha incorretos."),
            AppError::Forbidden => {
                write!(f, "Apenas administradores podem executar esta ação.")
            }
            AppError::RateLimited => {
                write!(f, "Muitas tentativas de login. Tente novamente mais tarde.")
            }
            AppError::Validation(msg) => write!(f, "{msg}"),
            AppError::DuplicateName => write!(f, "Este prato já foi sugerido!"),
            AppError::DuplicateEmail => write!(f, "Este e-mail já está cadastrado."),
            AppError::AlreadyVoted => write!(f, "Você já votou neste prato."),
            AppError::NotFound => write!(f, "Prato não encontrado."),
            AppError::Persistence(msg) => write!(f, "{msg}"),
            AppError::Hash(msg) => write!(f, "Erro ao processar a senha: {msg}"),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Unauthenticated | AppError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::DuplicateName | AppError::DuplicateEmail | AppError::AlreadyVoted => {
                StatusCode::CONFLICT
            }
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::Persistence(_) | AppError::Hash(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        if self.status_code().is_server_error() {
            log::error!("{self}");
        }
        HttpResponse::build(self.status_code()).json(json!({
            "success": false,
            "message": self.to_string(),
        }))
    }
}

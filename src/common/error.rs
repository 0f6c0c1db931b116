use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// Nosso tipo de erro, com `thiserror` para melhor ergonomia.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("E-mail já existe")]
    EmailAlreadyExists,

    #[error("Credenciais inválidas")]
    InvalidCredentials,

    #[error("Token inválido")]
    InvalidToken,

    #[error("Usuário não encontrado")]
    UserNotFound,

    #[error("Registro não encontrado")]
    NotFound,

    #[error("Mês inválido: {0}")]
    InvalidMonth(i32),

    // O pagamento ou tem mês+ano (alvo único) ou uma lista de meses
    // (distribuído) — nunca os dois ao mesmo tempo, nunca meio preenchido.
    #[error("Alvo do pagamento inconsistente")]
    InvalidPaymentTarget,

    #[error("Entrada de vendas em lote inválida: {0}")]
    InvalidBatchInput(String),

    #[error("Fonte não encontrada: {0}")]
    FontNotFound(String),

    // Variante para erros de banco de dados (sqlx)
    #[error("Erro de banco de dados")]
    DatabaseError(#[from] sqlx::Error),

    // Variante genérica para qualquer outro erro inesperado.
    // `anyhow::Error` é ótimo para capturar o contexto do erro.
    #[error("Erro interno do servidor")]
    InternalServerError(#[from] anyhow::Error),

    #[error("Erro de Bcrypt: {0}")]
    BcryptError(#[from] bcrypt::BcryptError),

    #[error("Erro de JWT: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),
}

// Helper para montar um erro de validação de um campo só (para checagens
// que o derive do validator não cobre, como Decimal > 0)
pub fn validation_error(field: &str, message: &str) -> AppError {
    let mut err = validator::ValidationErrors::new();
    let mut validation_err = validator::ValidationError::new("invalid_value");
    validation_err.message = Some(message.to_string().into());

    // Leak seguro para erro estático
    let static_field: &'static str = Box::leak(field.to_string().into_boxed_str());
    err.add(static_field.into(), validation_err);

    AppError::ValidationError(err)
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            // Retorna todos os detalhes da validação, campo a campo.
            AppError::ValidationError(errors) => {
                let mut details = std::collections::HashMap::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors.iter()
                        .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
                        .collect();
                    details.insert(field.to_string(), messages);
                }
                let body = Json(json!({
                    "error": "Um ou mais campos são inválidos.",
                    "details": details,
                }));
                return (StatusCode::BAD_REQUEST, body).into_response();
            }
            AppError::EmailAlreadyExists => (StatusCode::CONFLICT, "Este e-mail já está em uso.".to_string()),
            AppError::InvalidCredentials => (StatusCode::UNAUTHORIZED, "E-mail ou senha inválidos.".to_string()),
            AppError::InvalidToken => (StatusCode::UNAUTHORIZED, "Token de autenticação inválido ou ausente.".to_string()),
            AppError::UserNotFound => (StatusCode::NOT_FOUND, "Usuário não encontrado.".to_string()),
            AppError::NotFound => (StatusCode::NOT_FOUND, "Registro não encontrado.".to_string()),
            AppError::InvalidMonth(m) => (
                StatusCode::BAD_REQUEST,
                format!("Mês inválido: {}. Use um valor entre 1 e 12.", m),
            ),
            AppError::InvalidPaymentTarget => (
                StatusCode::BAD_REQUEST,
                "Informe mês e ano (alvo único) OU a lista de meses (distribuído), nunca os dois.".to_string(),
            ),
            AppError::InvalidBatchInput(msg) => (StatusCode::BAD_REQUEST, msg),

            AppError::DatabaseError(sqlx::Error::RowNotFound) => {
                (StatusCode::NOT_FOUND, "Registro não encontrado.".to_string())
            }

            // Todos os outros erros viram 500. O `tracing` loga a mensagem
            // detalhada que o `thiserror` nos deu.
            ref e => {
                tracing::error!("Erro Interno do Servidor: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Ocorreu um erro inesperado.".to_string())
            }
        };

        // Resposta padrão para erros simples que só têm uma mensagem.
        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}

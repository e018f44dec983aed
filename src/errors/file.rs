use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::SERVER_VERSION;

#[derive(Error, Debug)]
pub enum FileError {
    #[error("File not found")]
    NotFound,

    #[error("Directory listing is not allowed")]
    Forbidden,

    #[error("Error accessing file")]
    Access(#[source] std::io::Error),
}

impl FileError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::Access(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for FileError {
    fn into_response(self) -> Response {
        error_response(self.status(), &self.to_string())
    }
}

/// Plain-text error page in the `HTTP <code>: Static Server <version> - <message>` form
pub fn error_response(status: StatusCode, message: &str) -> Response {
    let body = format!(
        "HTTP {}: Static Server {} - {}\n",
        status.as_u16(),
        SERVER_VERSION,
        message
    );

    (status, body).into_response()
}

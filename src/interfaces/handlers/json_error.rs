use actix_web::{HttpResponse, ResponseError};

use crate::errors::AuthError;

pub fn handle_auth_handler_error(err: AuthError) -> HttpResponse {
    err.error_response()
}

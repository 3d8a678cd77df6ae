use actix_web::web;

use crate::handlers::auth::{login, refresh_token};

pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(login);
    cfg.service(refresh_token);
}

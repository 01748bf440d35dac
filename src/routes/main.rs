use actix_web::{HttpResponse, Responder, get, web};
use actix_web_flash_messages::IncomingFlashMessages;
use pushkind_common::routes::{redirect, render_template};
use tera::Tera;

use crate::repository::DieselRepository;
use crate::routes::{base_context, not_found};
use crate::services::main::show_index;

#[get("/")]
pub async fn root() -> impl Responder {
    redirect("/catalog/")
}

#[get("/")]
pub async fn index(
    flash_messages: IncomingFlashMessages,
    repo: web::Data<DieselRepository>,
    tera: web::Data<Tera>,
) -> impl Responder {
    match show_index(repo.get_ref()) {
        Ok(overview) => {
            let mut context = base_context(&flash_messages, "index");
            context.insert("overview", &overview);
            render_template(&tera, "main/index.html", &context)
        }
        Err(err) => {
            log::error!("Failed to render catalog index: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

/// Default service for unmatched paths.
pub async fn fallback(
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    not_found(&tera, &flash_messages)
}

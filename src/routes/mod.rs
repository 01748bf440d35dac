use actix_web::HttpResponse;
use actix_web_flash_messages::IncomingFlashMessages;
use pushkind_common::routes::alert_level_to_str;
use tera::{Context, Tera};

pub mod categories;
pub mod main;
pub mod products;

pub fn base_context(flash_messages: &IncomingFlashMessages, current_page: &str) -> Context {
    let alerts = flash_messages
        .iter()
        .map(|f| (f.content(), alert_level_to_str(&f.level())))
        .collect::<Vec<_>>();

    let mut context = Context::new();
    context.insert("alerts", &alerts);
    context.insert("current_page", current_page);
    context
}

/// Renders the 404 page.
pub fn not_found(tera: &Tera, flash_messages: &IncomingFlashMessages) -> HttpResponse {
    let context = base_context(flash_messages, "not_found");
    HttpResponse::NotFound().body(tera.render("main/not_found.html", &context).unwrap_or_else(
        |e| {
            log::error!("Failed to render template 'main/not_found.html': {e}");
            String::new()
        },
    ))
}

//! Core library exports for the catalog service.
//!
//! With the `data` feature the crate exposes the domain, Diesel models and
//! repositories. The default `server` feature adds forms, services, view
//! models and the Actix-web routes, plus [`run`] to start the HTTP server.

#[cfg(feature = "data")]
pub mod domain;
#[cfg(feature = "server")]
pub mod dto;
#[cfg(feature = "data")]
pub mod error_conversions;
#[cfg(feature = "server")]
pub mod forms;
#[cfg(feature = "data")]
pub mod models;
#[cfg(feature = "data")]
pub mod repository;
#[cfg(feature = "server")]
pub mod routes;
#[cfg(feature = "data")]
pub mod schema;
#[cfg(feature = "server")]
pub mod services;

#[cfg(feature = "server")]
pub use server::{MIGRATIONS, run};

#[cfg(feature = "server")]
mod server {
    use std::io;

    use actix_files::Files;
    use actix_web::cookie::Key;
    use actix_web::{App, HttpServer, middleware, web};
    use actix_web_flash_messages::{FlashMessagesFramework, storage::CookieMessageStore};
    use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
    use pushkind_common::db::establish_connection_pool;
    use tera::Tera;

    use crate::models::config::ServerConfig;
    use crate::repository::DieselRepository;
    use crate::routes::categories::{
        create_category, create_category_form, delete_category, delete_category_form,
        show_categories, show_category, update_category, update_category_form,
    };
    use crate::routes::main::{fallback, index, root};
    use crate::routes::products::{
        create_product, create_product_form, delete_product, delete_product_form, show_product,
        show_products, update_product, update_product_form,
    };

    pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!();

    /// Opens the database, applies pending migrations and serves the catalog
    /// until the server stops.
    pub async fn run(server_config: ServerConfig) -> io::Result<()> {
        let pool = establish_connection_pool(&server_config.database_url).map_err(|e| {
            io::Error::other(format!("Failed to establish database connection: {e:?}"))
        })?;

        let mut conn = pool.get().map_err(io::Error::other)?;
        let applied = conn.run_pending_migrations(MIGRATIONS).map_err(io::Error::other)?;
        log::info!("Applied {} pending migrations", applied.len());
        drop(conn);

        let tera = Tera::new(&server_config.templates_dir)
            .map_err(|e| io::Error::other(format!("Template parsing error(s): {e}")))?;

        let secret = Key::try_from(server_config.secret.as_bytes())
            .map_err(|e| io::Error::other(format!("Invalid secret key: {e}")))?;
        let message_store = CookieMessageStore::builder(secret).build();
        let message_framework = FlashMessagesFramework::builder(message_store).build();

        let repo = web::Data::new(DieselRepository::new(pool));
        let tera = web::Data::new(tera);
        let bind_address = (server_config.address.clone(), server_config.port);

        log::info!(
            "Starting catalog server on {}:{}",
            server_config.address,
            server_config.port
        );

        HttpServer::new(move || {
            App::new()
                .wrap(message_framework.clone())
                .wrap(middleware::Logger::default())
                .service(Files::new("/assets", "./assets"))
                .service(root)
                .service(
                    web::scope("/catalog")
                        .service(index)
                        .service(show_categories)
                        .service(create_category_form)
                        .service(create_category)
                        .service(show_category)
                        .service(delete_category_form)
                        .service(delete_category)
                        .service(update_category_form)
                        .service(update_category)
                        .service(show_products)
                        .service(create_product_form)
                        .service(create_product)
                        .service(show_product)
                        .service(delete_product_form)
                        .service(delete_product)
                        .service(update_product_form)
                        .service(update_product),
                )
                .default_service(web::route().to(fallback))
                .app_data(repo.clone())
                .app_data(tera.clone())
        })
        .bind(bind_address)?
        .run()
        .await
    }
}

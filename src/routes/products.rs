use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use pushkind_common::routes::{redirect, render_template};
use tera::Tera;

use crate::dto::products::ProductFormView;
use crate::forms::products::ProductForm;
use crate::repository::DieselRepository;
use crate::routes::{base_context, not_found};
use crate::services::products::{
    create_product as create_product_service, delete_product as delete_product_service,
    new_product_form as new_product_form_service, product_deletion as product_deletion_service,
    product_form as product_form_service, show_product as show_product_service,
    show_products as show_products_service, update_product as update_product_service,
};
use crate::services::{ServiceError, Submission};

const PRODUCTS_URL: &str = "/catalog/products";

fn render_form(
    tera: &Tera,
    flash_messages: &IncomingFlashMessages,
    title: &str,
    view: &ProductFormView,
) -> HttpResponse {
    let mut context = base_context(flash_messages, "products");
    context.insert("title", title);
    context.insert("form", view);
    render_template(tera, "products/form.html", &context)
}

/// Folds the raw pairs so a repeated `category` key becomes a list.
fn product_form(pairs: Vec<(String, String)>) -> Result<ProductForm, HttpResponse> {
    ProductForm::from_pairs(pairs).map_err(|e| {
        log::warn!("Malformed product form: {e}");
        HttpResponse::BadRequest().finish()
    })
}

#[get("/products")]
pub async fn show_products(
    flash_messages: IncomingFlashMessages,
    repo: web::Data<DieselRepository>,
    tera: web::Data<Tera>,
) -> impl Responder {
    match show_products_service(repo.get_ref()) {
        Ok(products) => {
            let mut context = base_context(&flash_messages, "products");
            context.insert("products", &products);
            render_template(&tera, "products/index.html", &context)
        }
        Err(err) => {
            log::error!("Failed to render products: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[get("/product/create")]
pub async fn create_product_form(
    flash_messages: IncomingFlashMessages,
    repo: web::Data<DieselRepository>,
    tera: web::Data<Tera>,
) -> impl Responder {
    match new_product_form_service(repo.get_ref()) {
        Ok(view) => render_form(&tera, &flash_messages, "Create Product", &view),
        Err(err) => {
            log::error!("Failed to render product form: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/product/create")]
pub async fn create_product(
    flash_messages: IncomingFlashMessages,
    repo: web::Data<DieselRepository>,
    tera: web::Data<Tera>,
    web::Form(pairs): web::Form<Vec<(String, String)>>,
) -> impl Responder {
    let form = match product_form(pairs) {
        Ok(form) => form,
        Err(response) => return response,
    };

    match create_product_service(form, repo.get_ref()) {
        Ok(Submission::Saved(id)) => {
            FlashMessage::success("Product saved.").send();
            redirect(&format!("/catalog/product/{id}"))
        }
        Ok(Submission::Rejected(view)) => {
            render_form(&tera, &flash_messages, "Create Product", &view)
        }
        Err(err) => {
            log::error!("Failed to create product: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[get("/product/{product_id}")]
pub async fn show_product(
    product_id: web::Path<i32>,
    flash_messages: IncomingFlashMessages,
    repo: web::Data<DieselRepository>,
    tera: web::Data<Tera>,
) -> impl Responder {
    match show_product_service(product_id.into_inner(), repo.get_ref()) {
        Ok(product) => {
            let mut context = base_context(&flash_messages, "products");
            context.insert("product", &product);
            render_template(&tera, "products/detail.html", &context)
        }
        Err(ServiceError::NotFound) => not_found(&tera, &flash_messages),
        Err(err) => {
            log::error!("Failed to render product: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[get("/product/{product_id}/delete")]
pub async fn delete_product_form(
    product_id: web::Path<i32>,
    flash_messages: IncomingFlashMessages,
    repo: web::Data<DieselRepository>,
    tera: web::Data<Tera>,
) -> impl Responder {
    match product_deletion_service(product_id.into_inner(), repo.get_ref()) {
        Ok(product) => {
            let mut context = base_context(&flash_messages, "products");
            context.insert("product", &product);
            render_template(&tera, "products/delete.html", &context)
        }
        Err(ServiceError::NotFound) => redirect(PRODUCTS_URL),
        Err(err) => {
            log::error!("Failed to render product deletion: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/product/{product_id}/delete")]
pub async fn delete_product(
    product_id: web::Path<i32>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match delete_product_service(product_id.into_inner(), repo.get_ref()) {
        Ok(true) => {
            FlashMessage::success("Product deleted.").send();
            redirect(PRODUCTS_URL)
        }
        Ok(false) => redirect(PRODUCTS_URL),
        Err(err) => {
            log::error!("Failed to delete product: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[get("/product/{product_id}/update")]
pub async fn update_product_form(
    product_id: web::Path<i32>,
    flash_messages: IncomingFlashMessages,
    repo: web::Data<DieselRepository>,
    tera: web::Data<Tera>,
) -> impl Responder {
    match product_form_service(product_id.into_inner(), repo.get_ref()) {
        Ok(view) => render_form(&tera, &flash_messages, "Update Product", &view),
        Err(ServiceError::NotFound) => not_found(&tera, &flash_messages),
        Err(err) => {
            log::error!("Failed to render product form: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/product/{product_id}/update")]
pub async fn update_product(
    product_id: web::Path<i32>,
    flash_messages: IncomingFlashMessages,
    repo: web::Data<DieselRepository>,
    tera: web::Data<Tera>,
    web::Form(pairs): web::Form<Vec<(String, String)>>,
) -> impl Responder {
    let form = match product_form(pairs) {
        Ok(form) => form,
        Err(response) => return response,
    };

    match update_product_service(product_id.into_inner(), form, repo.get_ref()) {
        Ok(Submission::Saved(id)) => {
            FlashMessage::success("Product updated.").send();
            redirect(&format!("/catalog/product/{id}"))
        }
        Ok(Submission::Rejected(view)) => {
            render_form(&tera, &flash_messages, "Update Product", &view)
        }
        Err(ServiceError::NotFound) => redirect(PRODUCTS_URL),
        Err(err) => {
            log::error!("Failed to update product: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use pushkind_common::routes::{redirect, render_template};
use tera::Tera;

use crate::dto::categories::CategoryFormView;
use crate::forms::categories::CategoryForm;
use crate::repository::DieselRepository;
use crate::routes::{base_context, not_found};
use crate::services::categories::{
    CategoryDeletion, category_deletion_impact as category_deletion_impact_service,
    category_form as category_form_service, create_category as create_category_service,
    delete_category as delete_category_service, show_categories as show_categories_service,
    show_category as show_category_service, update_category as update_category_service,
};
use crate::services::{ServiceError, Submission};

const CATEGORIES_URL: &str = "/catalog/categories";

fn render_form(
    tera: &Tera,
    flash_messages: &IncomingFlashMessages,
    title: &str,
    view: &CategoryFormView,
) -> HttpResponse {
    let mut context = base_context(flash_messages, "categories");
    context.insert("title", title);
    context.insert("form", view);
    render_template(tera, "categories/form.html", &context)
}

#[get("/categories")]
pub async fn show_categories(
    flash_messages: IncomingFlashMessages,
    repo: web::Data<DieselRepository>,
    tera: web::Data<Tera>,
) -> impl Responder {
    match show_categories_service(repo.get_ref()) {
        Ok(categories) => {
            let mut context = base_context(&flash_messages, "categories");
            context.insert("categories", &categories);
            render_template(&tera, "categories/index.html", &context)
        }
        Err(err) => {
            log::error!("Failed to render categories: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[get("/category/create")]
pub async fn create_category_form(
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    render_form(
        &tera,
        &flash_messages,
        "Create Category",
        &CategoryFormView::default(),
    )
}

#[post("/category/create")]
pub async fn create_category(
    flash_messages: IncomingFlashMessages,
    repo: web::Data<DieselRepository>,
    tera: web::Data<Tera>,
    web::Form(form): web::Form<CategoryForm>,
) -> impl Responder {
    match create_category_service(form, repo.get_ref()) {
        Ok(Submission::Saved(id)) => {
            FlashMessage::success("Category saved.").send();
            redirect(&format!("/catalog/category/{id}"))
        }
        Ok(Submission::Rejected(view)) => {
            render_form(&tera, &flash_messages, "Create Category", &view)
        }
        Err(err) => {
            log::error!("Failed to create category: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[get("/category/{category_id}")]
pub async fn show_category(
    category_id: web::Path<i32>,
    flash_messages: IncomingFlashMessages,
    repo: web::Data<DieselRepository>,
    tera: web::Data<Tera>,
) -> impl Responder {
    match show_category_service(category_id.into_inner(), repo.get_ref()) {
        Ok(detail) => {
            let mut context = base_context(&flash_messages, "categories");
            context.insert("category", &detail.category);
            context.insert("products", &detail.products);
            render_template(&tera, "categories/detail.html", &context)
        }
        Err(ServiceError::NotFound) => not_found(&tera, &flash_messages),
        Err(err) => {
            log::error!("Failed to render category: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[get("/category/{category_id}/delete")]
pub async fn delete_category_form(
    category_id: web::Path<i32>,
    flash_messages: IncomingFlashMessages,
    repo: web::Data<DieselRepository>,
    tera: web::Data<Tera>,
) -> impl Responder {
    match category_deletion_impact_service(category_id.into_inner(), repo.get_ref()) {
        Ok(detail) => {
            let mut context = base_context(&flash_messages, "categories");
            context.insert("category", &detail.category);
            context.insert("products", &detail.products);
            render_template(&tera, "categories/delete.html", &context)
        }
        Err(ServiceError::NotFound) => redirect(CATEGORIES_URL),
        Err(err) => {
            log::error!("Failed to render category deletion: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/category/{category_id}/delete")]
pub async fn delete_category(
    category_id: web::Path<i32>,
    flash_messages: IncomingFlashMessages,
    repo: web::Data<DieselRepository>,
    tera: web::Data<Tera>,
) -> impl Responder {
    match delete_category_service(category_id.into_inner(), repo.get_ref()) {
        Ok(CategoryDeletion::Deleted) => {
            FlashMessage::success("Category deleted.").send();
            redirect(CATEGORIES_URL)
        }
        Ok(CategoryDeletion::Blocked(detail)) => {
            let mut context = base_context(&flash_messages, "categories");
            context.insert("category", &detail.category);
            context.insert("products", &detail.products);
            render_template(&tera, "categories/delete.html", &context)
        }
        Err(ServiceError::NotFound) => redirect(CATEGORIES_URL),
        Err(err) => {
            log::error!("Failed to delete category: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[get("/category/{category_id}/update")]
pub async fn update_category_form(
    category_id: web::Path<i32>,
    flash_messages: IncomingFlashMessages,
    repo: web::Data<DieselRepository>,
    tera: web::Data<Tera>,
) -> impl Responder {
    match category_form_service(category_id.into_inner(), repo.get_ref()) {
        Ok(view) => render_form(&tera, &flash_messages, "Update Category", &view),
        Err(ServiceError::NotFound) => not_found(&tera, &flash_messages),
        Err(err) => {
            log::error!("Failed to render category form: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/category/{category_id}/update")]
pub async fn update_category(
    category_id: web::Path<i32>,
    flash_messages: IncomingFlashMessages,
    repo: web::Data<DieselRepository>,
    tera: web::Data<Tera>,
    web::Form(form): web::Form<CategoryForm>,
) -> impl Responder {
    match update_category_service(category_id.into_inner(), form, repo.get_ref()) {
        Ok(Submission::Saved(id)) => {
            FlashMessage::success("Category updated.").send();
            redirect(&format!("/catalog/category/{id}"))
        }
        Ok(Submission::Rejected(view)) => {
            render_form(&tera, &flash_messages, "Update Category", &view)
        }
        Err(ServiceError::NotFound) => redirect(CATEGORIES_URL),
        Err(err) => {
            log::error!("Failed to update category: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

use config::{Config, Environment, File};
use pushkind_catalog::models::config::ServerConfig;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // APP_ENV selects the optional override file, e.g. config/production.yaml.
    let app_env = std::env::var("APP_ENV").unwrap_or_else(|_| "local".into());

    let settings = Config::builder()
        .add_source(File::with_name("config/default"))
        .add_source(File::with_name(&format!("config/{app_env}")).required(false))
        .add_source(Environment::with_prefix("APP"))
        .build();

    let settings = match settings {
        Ok(settings) => settings,
        Err(e) => {
            log::error!("Error loading settings: {e}");
            std::process::exit(1);
        }
    };

    let server_config = match settings.try_deserialize::<ServerConfig>() {
        Ok(server_config) => server_config,
        Err(e) => {
            log::error!("Error loading server config: {e}");
            std::process::exit(1);
        }
    };

    pushkind_catalog::run(server_config).await
}

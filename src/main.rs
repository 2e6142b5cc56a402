use actix_web::{middleware, web, App, HttpServer};

use schoold::config::Config;
use schoold::http::routes;
use schoold::http::types::AppState;
use schoold::{db, seed};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    let config = Config::from_env();
    let conn = db::open_db(&config.db_path)?;
    if seed::seed_if_empty(&conn)? {
        log::info!("seeded demo data into {}", config.db_path.display());
    }

    let state = web::Data::new(AppState::new(conn));

    log::info!("listening on 0.0.0.0:{}", config.port);
    HttpServer::new(move || {
        App::new()
            .wrap(middleware::Logger::default())
            .app_data(state.clone())
            .configure(routes::configure)
    })
    .bind(("0.0.0.0", config.port))?
    .run()
    .await?;

    Ok(())
}

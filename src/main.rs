//src/main.rs

use axum::{
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

// Declaração dos nossos módulos
mod common;
mod config;
mod db;
mod docs;
mod handlers;
mod middleware;
mod models;
mod services;

use crate::config::AppState;
use crate::middleware::auth::auth_guard;

#[tokio::main]
async fn main() {
    // Inicializa o logger
    tracing_subscriber::fmt().with_target(false).compact().init();

    // .expect() é bom aqui: se a configuração falhar, a aplicação não deve iniciar.
    let app_state = AppState::new()
        .await
        .expect("Falha ao inicializar o estado da aplicação.");

    // Roda as migrações do SQLx na inicialização
    sqlx::migrate!()
        .run(&app_state.db_pool)
        .await
        .expect("Falha ao rodar as migrações do banco de dados.");

    tracing::info!("✅ Migrações do banco de dados executadas com sucesso!");

    // Rotas de autenticação (públicas)
    let auth_routes = Router::new()
        .route("/register", post(handlers::auth::register))
        .route("/login", post(handlers::auth::login));

    // Rotas de usuário (protegidas pelo middleware)
    let user_routes = Router::new()
        .route("/me", get(handlers::auth::get_me))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let area_routes = Router::new()
        .route("/"
               ,post(handlers::areas::create_area)
               .get(handlers::areas::list_areas)
        )
        .route("/{id}"
               ,axum::routing::put(handlers::areas::update_area)
               .delete(handlers::areas::delete_area)
        )
        .route("/{id}/customers"
               ,get(handlers::areas::area_customers)
        );

    let milk_type_routes = Router::new()
        .route("/"
               ,post(handlers::milk_types::create_milk_type)
               .get(handlers::milk_types::list_milk_types)
        )
        .route("/{id}"
               ,axum::routing::put(handlers::milk_types::update_milk_type)
               .delete(handlers::milk_types::delete_milk_type)
        );

    let customer_routes = Router::new()
        .route("/"
               ,post(handlers::customers::create_customer)
               .get(handlers::customers::list_customers)
        )
        .route("/{id}"
               ,get(handlers::customers::get_customer)
               .put(handlers::customers::update_customer)
               .delete(handlers::customers::delete_customer)
        )
        .route("/{id}/months"
               ,get(handlers::customers::customer_months)
        )
        .route("/{id}/unpaid-months"
               ,get(handlers::customers::customer_unpaid_months)
        )
        .route("/{id}/balances/rebuild"
               ,post(handlers::customers::rebuild_customer_balances)
        )
        .route("/{id}/bill"
               ,get(handlers::documents::customer_bill)
        );

    let sale_routes = Router::new()
        .route("/"
               ,post(handlers::sales::create_sale)
               .get(handlers::sales::list_sales)
        )
        .route("/batch"
               ,post(handlers::sales::create_batch)
        )
        .route("/{id}"
               ,get(handlers::sales::get_sale)
               .put(handlers::sales::update_sale)
               .delete(handlers::sales::delete_sale)
        );

    let payment_routes = Router::new()
        .route("/"
               ,post(handlers::payments::create_payment)
               .get(handlers::payments::list_payments)
        )
        .route("/{id}"
               ,get(handlers::payments::get_payment)
               .put(handlers::payments::update_payment)
               .delete(handlers::payments::delete_payment)
        );

    let report_routes = Router::new()
        .route("/dashboard", get(handlers::reports::dashboard))
        .route("/daily", get(handlers::reports::daily_report))
        .route("/monthly", get(handlers::reports::monthly_report))
        .route("/customer-balances", get(handlers::reports::customer_balances));

    let settings_routes = Router::new()
        .route("/"
               ,get(handlers::settings::get_settings)
               .put(handlers::settings::update_settings)
        );

    // Tudo que mexe com dados da conta fica atrás do auth_guard
    let protected_routes = Router::new()
        .nest("/api/areas", area_routes)
        .nest("/api/milk-types", milk_type_routes)
        .nest("/api/customers", customer_routes)
        .nest("/api/sales", sale_routes)
        .nest("/api/payments", payment_routes)
        .nest("/api/reports", report_routes)
        .nest("/api/settings", settings_routes)
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    // Combina tudo no router principal
    let app = Router::new()
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", docs::ApiDoc::openapi()))
        .route("/api/health", get(|| async { "OK" }))
        .nest("/api/auth", auth_routes)
        .nest("/api/users", user_routes)
        .merge(protected_routes)
        .with_state(app_state);

    // Inicia o servidor
    let addr = "0.0.0.0:3000";
    let listener = TcpListener::bind(addr)
        .await
        .expect("Falha ao iniciar o listener TCP");
    tracing::info!("🚀 Servidor escutando em {}", listener.local_addr().unwrap());
    axum::serve(listener, app)
        .await
        .expect("Erro no servidor Axum");
}

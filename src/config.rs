// src/config.rs

use sqlx::{postgres::PgPoolOptions, PgPool};
use std::{env, time::Duration};

use crate::{
    db::{
        AreaRepository, BalanceRepository, CustomerRepository, MilkTypeRepository,
        PaymentRepository, ReportRepository, SaleRepository, SettingsRepository, UserRepository,
    },
    services::{
        auth::AuthService, billing_service::BillingService, catalog_service::CatalogService,
        customer_service::CustomerService, document_service::DocumentService,
        report_service::ReportService, sale_service::SaleService,
    },
};

// O estado compartilhado que será acessível em toda a aplicação
#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub auth_service: AuthService,
    pub catalog_service: CatalogService,
    pub customer_service: CustomerService,
    pub sale_service: SaleService,
    pub billing_service: BillingService,
    pub report_service: ReportService,
    pub document_service: DocumentService,
    pub settings_repo: SettingsRepository,
}

impl AppState {
    pub async fn new() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL").expect("DATABASE_URL deve ser definida");
        let jwt_secret = env::var("JWT_SECRET").expect("JWT_SECRET deve ser definido");

        // Conecta ao banco de dados, usando '?' para propagar erros
        let db_pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&database_url)
            .await?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        // --- Monta o grafo de dependências ---
        let user_repo = UserRepository::new(db_pool.clone());
        let area_repo = AreaRepository::new(db_pool.clone());
        let milk_type_repo = MilkTypeRepository::new(db_pool.clone());
        let customer_repo = CustomerRepository::new(db_pool.clone());
        let sale_repo = SaleRepository::new(db_pool.clone());
        let payment_repo = PaymentRepository::new(db_pool.clone());
        let balance_repo = BalanceRepository::new(db_pool.clone());
        let report_repo = ReportRepository::new(db_pool.clone());
        let settings_repo = SettingsRepository::new(db_pool.clone());

        let auth_service = AuthService::new(user_repo, jwt_secret);
        let catalog_service = CatalogService::new(area_repo, milk_type_repo.clone());
        let billing_service = BillingService::new(
            payment_repo.clone(),
            balance_repo.clone(),
            customer_repo.clone(),
        );
        let customer_service = CustomerService::new(
            customer_repo.clone(),
            milk_type_repo.clone(),
            sale_repo.clone(),
            payment_repo.clone(),
        );
        let sale_service = SaleService::new(
            sale_repo.clone(),
            milk_type_repo.clone(),
            customer_repo.clone(),
            billing_service.clone(),
        );
        let report_service = ReportService::new(report_repo);
        let document_service = DocumentService::new(
            customer_repo,
            sale_repo,
            milk_type_repo,
            balance_repo,
            settings_repo.clone(),
        );

        Ok(Self {
            db_pool,
            auth_service,
            catalog_service,
            customer_service,
            sale_service,
            billing_service,
            report_service,
            document_service,
            settings_repo,
        })
    }
}

// src/docs.rs

use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use utoipa::OpenApi;

use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Auth ---
        handlers::auth::register,
        handlers::auth::login,
        handlers::auth::get_me,

        // --- Settings ---
        handlers::settings::get_settings,
        handlers::settings::update_settings,

        // --- Areas ---
        handlers::areas::create_area,
        handlers::areas::list_areas,
        handlers::areas::update_area,
        handlers::areas::delete_area,
        handlers::areas::area_customers,

        // --- Milk Types ---
        handlers::milk_types::create_milk_type,
        handlers::milk_types::list_milk_types,
        handlers::milk_types::update_milk_type,
        handlers::milk_types::delete_milk_type,

        // --- Customers ---
        handlers::customers::create_customer,
        handlers::customers::list_customers,
        handlers::customers::get_customer,
        handlers::customers::update_customer,
        handlers::customers::delete_customer,
        handlers::customers::customer_months,
        handlers::customers::customer_unpaid_months,
        handlers::customers::rebuild_customer_balances,

        // --- Sales ---
        handlers::sales::create_sale,
        handlers::sales::create_batch,
        handlers::sales::list_sales,
        handlers::sales::get_sale,
        handlers::sales::update_sale,
        handlers::sales::delete_sale,

        // --- Payments ---
        handlers::payments::create_payment,
        handlers::payments::list_payments,
        handlers::payments::get_payment,
        handlers::payments::update_payment,
        handlers::payments::delete_payment,

        // --- Reports ---
        handlers::reports::dashboard,
        handlers::reports::daily_report,
        handlers::reports::monthly_report,
        handlers::reports::customer_balances,

        // --- Documents ---
        handlers::documents::customer_bill,
    ),
    components(
        schemas(
            // --- Auth ---
            models::auth::User,
            models::auth::RegisterUserPayload,
            models::auth::LoginUserPayload,
            models::auth::AuthResponse,

            // --- Catalog ---
            models::catalog::Area,
            models::catalog::MilkType,

            // --- Customers ---
            models::customer::Customer,
            models::customer::CustomerSummary,
            models::customer::CustomerDetail,

            // --- Billing ---
            models::billing::Period,
            models::billing::Sale,
            models::billing::Payment,
            models::billing::PaymentAllocation,
            models::billing::PaymentDetail,
            models::billing::BalanceStatus,
            models::billing::MonthlyBalance,
            models::billing::PeriodOutstanding,

            // --- Reports ---
            models::reports::DashboardSummary,
            models::reports::DailyReportEntry,
            models::reports::MonthlyReportEntry,
            models::reports::CustomerBalanceEntry,

            // --- Settings ---
            models::settings::BillingSettings,
            models::settings::UpdateSettingsRequest,

            // --- Payloads ---
            handlers::areas::AreaPayload,
            handlers::milk_types::MilkTypePayload,
            handlers::customers::CustomerPayload,
            handlers::sales::CreateSalePayload,
            handlers::sales::UpdateSalePayload,
            handlers::sales::BatchSalePayload,
            handlers::payments::PaymentPayload,
            handlers::payments::UpdatePaymentPayload,
        )
    ),
    tags(
        (name = "Auth", description = "Autenticação e Registro"),
        (name = "Users", description = "Dados do Usuário"),
        (name = "Settings", description = "Configurações de Faturamento"),
        (name = "Areas", description = "Áreas de Entrega"),
        (name = "MilkTypes", description = "Tipos de Leite e Tarifas"),
        (name = "Customers", description = "Clientes e Saldos Mensais"),
        (name = "Sales", description = "Vendas (Entregas de Leite)"),
        (name = "Payments", description = "Pagamentos e Distribuição Multi-Mês"),
        (name = "Reports", description = "Relatórios e Painel"),
        (name = "Documents", description = "Faturas em PDF")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        );
    }
}

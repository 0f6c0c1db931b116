// src/services/catalog_service.rs
//
// Áreas de entrega e tipos de leite — cadastros simples, o service só
// repassa para o repositório.

use rust_decimal::Decimal;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{AreaRepository, MilkTypeRepository},
    models::{catalog::{Area, MilkType}, customer::Customer},
};

#[derive(Clone)]
pub struct CatalogService {
    area_repo: AreaRepository,
    milk_type_repo: MilkTypeRepository,
}

impl CatalogService {
    pub fn new(area_repo: AreaRepository, milk_type_repo: MilkTypeRepository) -> Self {
        Self {
            area_repo,
            milk_type_repo,
        }
    }

    // --- ÁREAS ---

    pub async fn create_area(
        &self,
        user_id: Uuid,
        name: &str,
        description: Option<&str>,
    ) -> Result<Area, AppError> {
        self.area_repo.create(user_id, name, description).await
    }

    pub async fn list_areas(&self, user_id: Uuid) -> Result<Vec<Area>, AppError> {
        self.area_repo.list(user_id).await
    }

    pub async fn update_area(
        &self,
        user_id: Uuid,
        id: Uuid,
        name: &str,
        description: Option<&str>,
    ) -> Result<Area, AppError> {
        self.area_repo.update(user_id, id, name, description).await
    }

    // Os clientes da área voltam para "sem área"; ninguém é excluído junto
    pub async fn delete_area(&self, user_id: Uuid, id: Uuid) -> Result<(), AppError> {
        self.area_repo.delete(user_id, id).await?;
        tracing::info!("🗺️ Área {} removida; clientes ficaram sem área", id);
        Ok(())
    }

    pub async fn area_customers(
        &self,
        user_id: Uuid,
        area_id: Uuid,
    ) -> Result<Vec<Customer>, AppError> {
        self.area_repo
            .find_by_id(user_id, area_id)
            .await?
            .ok_or(AppError::NotFound)?;

        self.area_repo.list_customers(user_id, area_id).await
    }

    // --- TIPOS DE LEITE ---

    pub async fn create_milk_type(
        &self,
        user_id: Uuid,
        name: &str,
        rate_per_liter: Decimal,
    ) -> Result<MilkType, AppError> {
        self.milk_type_repo.create(user_id, name, rate_per_liter).await
    }

    pub async fn list_milk_types(&self, user_id: Uuid) -> Result<Vec<MilkType>, AppError> {
        self.milk_type_repo.list(user_id).await
    }

    pub async fn update_milk_type(
        &self,
        user_id: Uuid,
        id: Uuid,
        name: &str,
        rate_per_liter: Decimal,
    ) -> Result<MilkType, AppError> {
        self.milk_type_repo
            .update(user_id, id, name, rate_per_liter)
            .await
    }

    pub async fn delete_milk_type(&self, user_id: Uuid, id: Uuid) -> Result<(), AppError> {
        self.milk_type_repo.delete(user_id, id).await
    }
}

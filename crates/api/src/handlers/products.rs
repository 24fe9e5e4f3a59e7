//! Handlers for `/productos`.
//!
//! Listing is public. Writes sit behind the `require_auth` and
//! `require_admin` route layers (see `routes/products.rs`).

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use tienda_core::error::CoreError;
use tienda_core::types::DbId;
use tienda_db::models::product::{CreateProduct, Product, UpdateProduct};

use crate::error::{AppError, AppResult};
use crate::extract::{AppJson, AppPath};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

use super::accounts::Message;

/// Request body for creating or replacing a product.
#[derive(Debug, Default, Deserialize)]
pub struct ProductInput {
    #[serde(alias = "nombre")]
    pub name: Option<String>,
    #[serde(alias = "descripcion")]
    pub description: Option<String>,
    #[serde(alias = "precio")]
    pub price: Option<f64>,
}

impl ProductInput {
    /// Trimmed name, trimmed description and price, or a 400.
    fn validate(self) -> Result<(String, String, f64), CoreError> {
        let required = || CoreError::Validation("Todos los campos son obligatorios".into());

        let name = self
            .name
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty())
            .ok_or_else(required)?;
        let description = self
            .description
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty())
            .ok_or_else(required)?;
        let price = self.price.ok_or_else(required)?;

        if !price.is_finite() || price < 0.0 {
            return Err(CoreError::Validation(
                "El precio debe ser un número mayor o igual a 0".into(),
            ));
        }

        Ok((name, description, price))
    }
}

#[derive(Debug, Serialize)]
pub struct ProductList {
    pub products: Vec<Product>,
}

#[derive(Debug, Serialize)]
pub struct ProductSaved {
    pub mensaje: &'static str,
    pub product: Product,
}

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Product",
        id,
    })
}

/// POST /productos
pub async fn create_product(
    State(state): State<AppState>,
    admin: AuthUser,
    AppJson(input): AppJson<ProductInput>,
) -> AppResult<(StatusCode, Json<ProductSaved>)> {
    let (name, description, price) = input.validate()?;
    let product = state
        .products
        .insert_product(&CreateProduct {
            name,
            description,
            price,
        })
        .await?;

    tracing::info!(product_id = product.id, by = admin.account_id, "Product created");
    Ok((
        StatusCode::CREATED,
        Json(ProductSaved {
            mensaje: "Producto agregado",
            product,
        }),
    ))
}

/// GET /productos
pub async fn list_products(State(state): State<AppState>) -> AppResult<Json<ProductList>> {
    let products = state.products.list_products().await?;
    Ok(Json(ProductList { products }))
}

/// PUT /productos/{id}
pub async fn update_product(
    State(state): State<AppState>,
    admin: AuthUser,
    AppPath(id): AppPath<DbId>,
    AppJson(input): AppJson<ProductInput>,
) -> AppResult<Json<ProductSaved>> {
    let (name, description, price) = input.validate()?;
    let product = state
        .products
        .update_product(
            id,
            &UpdateProduct {
                name: Some(name),
                description: Some(description),
                price: Some(price),
            },
        )
        .await?
        .ok_or_else(|| not_found(id))?;

    tracing::info!(product_id = id, by = admin.account_id, "Product updated");
    Ok(Json(ProductSaved {
        mensaje: "Producto actualizado",
        product,
    }))
}

/// DELETE /productos/{id}
pub async fn delete_product(
    State(state): State<AppState>,
    admin: AuthUser,
    AppPath(id): AppPath<DbId>,
) -> AppResult<Json<Message>> {
    if !state.products.delete_product(id).await? {
        return Err(not_found(id));
    }

    tracing::info!(product_id = id, by = admin.account_id, "Product deleted");
    Ok(Json(Message {
        mensaje: "Producto eliminado correctamente",
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn input(name: &str, description: &str, price: Option<f64>) -> ProductInput {
        ProductInput {
            name: Some(name.to_string()),
            description: Some(description.to_string()),
            price,
        }
    }

    #[test]
    fn valid_input_is_trimmed() {
        let (name, description, price) = input(" Café ", " Tostado ", Some(12.5))
            .validate()
            .unwrap();
        assert_eq!(name, "Café");
        assert_eq!(description, "Tostado");
        assert_eq!(price, 12.5);
    }

    #[test]
    fn zero_price_is_allowed() {
        assert!(input("Muestra", "Gratis", Some(0.0)).validate().is_ok());
    }

    #[test]
    fn missing_or_blank_fields_are_rejected() {
        assert_matches!(
            input("", "desc", Some(1.0)).validate(),
            Err(CoreError::Validation(_))
        );
        assert_matches!(
            input("nombre", "  ", Some(1.0)).validate(),
            Err(CoreError::Validation(_))
        );
        assert_matches!(
            input("nombre", "desc", None).validate(),
            Err(CoreError::Validation(_))
        );
        assert_matches!(
            ProductInput::default().validate(),
            Err(CoreError::Validation(_))
        );
    }

    #[test]
    fn negative_or_non_finite_price_is_rejected() {
        assert_matches!(
            input("n", "d", Some(-0.01)).validate(),
            Err(CoreError::Validation(_))
        );
        assert_matches!(
            input("n", "d", Some(f64::NAN)).validate(),
            Err(CoreError::Validation(_))
        );
        assert_matches!(
            input("n", "d", Some(f64::INFINITY)).validate(),
            Err(CoreError::Validation(_))
        );
    }

    #[test]
    fn spanish_field_names_are_accepted() {
        let parsed: ProductInput =
            serde_json::from_str(r#"{"nombre":"Té","descripcion":"Verde","precio":3}"#).unwrap();
        assert_eq!(parsed.name.as_deref(), Some("Té"));
        assert_eq!(parsed.price, Some(3.0));
    }
}

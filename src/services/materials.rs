use pushkind_common::domain::auth::AuthenticatedUser;
use pushkind_common::pagination::{DEFAULT_ITEMS_PER_PAGE, Paginated};
use serde::{Deserialize, Serialize};

use crate::domain::material::{Material, MaterialListQuery, MaterialUsage, MaterialUsageSummary};
use crate::domain::money::{format_amount, input_amount};
use crate::forms::materials::MaterialForm;
use crate::repository::{MaterialReader, MaterialWriter, OrderReader};
use crate::services::{ServiceError, ServiceResult, ensure_manager, non_blank};

/// Query parameters accepted by the materials pages.
#[derive(Debug, Default, Deserialize)]
pub struct MaterialsQuery {
    /// Name or supplier fragment, or material code fragment on the usage page.
    pub search: Option<String>,
    /// Page requested by the UI (1-based).
    pub page: Option<usize>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MaterialView {
    #[serde(flatten)]
    pub material: Material,
    pub unit_price_display: String,
    /// Unit price as the edit form expects it.
    pub unit_price_input: String,
    pub total_value_display: String,
    pub is_low_stock: bool,
}

impl From<Material> for MaterialView {
    fn from(material: Material) -> Self {
        Self {
            unit_price_display: format_amount(i64::from(material.unit_price_cents)),
            unit_price_input: input_amount(i64::from(material.unit_price_cents)),
            total_value_display: format_amount(material.total_value_cents()),
            is_low_stock: material.is_low_stock(),
            material,
        }
    }
}

/// Data required to render the materials index template.
pub struct MaterialsPageData {
    pub materials: Paginated<MaterialView>,
    pub search: Option<String>,
}

pub fn load_materials<R>(
    repo: &R,
    user: &AuthenticatedUser,
    query: MaterialsQuery,
) -> ServiceResult<MaterialsPageData>
where
    R: MaterialReader + ?Sized,
{
    ensure_manager(user)?;

    let page = query.page.unwrap_or(1);
    let search = non_blank(query.search);

    let mut list_query =
        MaterialListQuery::new(user.hub_id).paginate(page, DEFAULT_ITEMS_PER_PAGE);
    if let Some(term) = search.as_ref() {
        list_query = list_query.search(term);
    }

    let (total, materials) = repo.list_materials(list_query).map_err(ServiceError::from)?;
    let items = materials.into_iter().map(MaterialView::from).collect();
    let total_pages = total.div_ceil(DEFAULT_ITEMS_PER_PAGE);

    Ok(MaterialsPageData {
        materials: Paginated::new(items, page, total_pages),
        search,
    })
}

pub fn create_material<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: MaterialForm,
) -> ServiceResult<Material>
where
    R: MaterialWriter + ?Sized,
{
    ensure_manager(user)?;

    let new_material = form
        .into_new_material(user.hub_id)
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    repo.create_material(&new_material)
        .map_err(ServiceError::from)
}

pub fn modify_material<R>(
    repo: &R,
    user: &AuthenticatedUser,
    material_id: i32,
    form: MaterialForm,
) -> ServiceResult<Material>
where
    R: MaterialWriter + ?Sized,
{
    ensure_manager(user)?;

    let updates = form
        .into_update_material(user.hub_id)
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    repo.update_material(material_id, user.hub_id, &updates)
        .map_err(ServiceError::from)
}

pub fn remove_material<R>(
    repo: &R,
    user: &AuthenticatedUser,
    material_id: i32,
) -> ServiceResult<()>
where
    R: MaterialWriter + ?Sized,
{
    ensure_manager(user)?;

    repo.delete_material(material_id, user.hub_id)
        .map_err(ServiceError::from)
}

/// Data required to render the material usage template.
pub struct MaterialUsageData {
    pub usage: Vec<MaterialUsage>,
    pub summary: MaterialUsageSummary,
    pub search: Option<String>,
}

/// Groups orders by their material code.
pub fn load_material_usage<R>(
    repo: &R,
    user: &AuthenticatedUser,
    query: MaterialsQuery,
) -> ServiceResult<MaterialUsageData>
where
    R: OrderReader + ?Sized,
{
    ensure_manager(user)?;

    let search = non_blank(query.search);
    let rows = repo
        .list_material_codes(user.hub_id, search.as_deref())
        .map_err(ServiceError::from)?;

    let usage = MaterialUsage::from_rows(&rows);
    let summary = MaterialUsageSummary::from_usage(&usage);

    Ok(MaterialUsageData {
        usage,
        summary,
        search,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::mock::{MockMaterialReader, MockMaterialWriter, MockShopRepository};
    use crate::services::test_support::{fixed_datetime, user_with_roles};
    use crate::{MANAGER_ROLE, SERVICE_ACCESS_ROLE};
    use pushkind_common::repository::errors::RepositoryError;

    fn manager() -> AuthenticatedUser {
        user_with_roles(&[SERVICE_ACCESS_ROLE, MANAGER_ROLE])
    }

    fn sample_material(id: i32, hub_id: i32) -> Material {
        Material {
            id,
            hub_id,
            name: "Italian wool".to_string(),
            description: None,
            unit_price_cents: 4_500_000,
            unit: "meter".to_string(),
            stock_quantity: 4.0,
            supplier: None,
            created_at: fixed_datetime(),
            updated_at: fixed_datetime(),
        }
    }

    fn form() -> MaterialForm {
        MaterialForm {
            name: "Italian wool".to_string(),
            description: None,
            unit_price: "45000".to_string(),
            unit: None,
            stock_quantity: Some("4".to_string()),
            supplier: None,
        }
    }

    #[test]
    fn materials_are_manager_only() {
        let repo = MockMaterialReader::new();

        let result = load_materials(
            &repo,
            &user_with_roles(&[SERVICE_ACCESS_ROLE]),
            MaterialsQuery::default(),
        );

        assert!(matches!(result, Err(ServiceError::Unauthorized)));
    }

    #[test]
    fn material_view_flags_low_stock() {
        let view = MaterialView::from(sample_material(1, 7));

        assert!(view.is_low_stock);
        assert_eq!(view.unit_price_display, "45,000₮");
        assert_eq!(view.total_value_display, "180,000₮");
    }

    #[test]
    fn create_material_stores_payload() {
        let mut repo = MockMaterialWriter::new();
        repo.expect_create_material()
            .withf(|material| material.hub_id == 7 && material.unit_price_cents == 4_500_000)
            .returning(|material| Ok(sample_material(3, material.hub_id)));

        let material = create_material(&repo, &manager(), form()).expect("material created");

        assert_eq!(material.id, 3);
    }

    #[test]
    fn modify_missing_material_is_not_found() {
        let mut repo = MockMaterialWriter::new();
        repo.expect_update_material()
            .returning(|_, _, _| Err(RepositoryError::NotFound));

        let result = modify_material(&repo, &manager(), 99, form());

        assert!(matches!(result, Err(ServiceError::NotFound)));
    }

    #[test]
    fn usage_groups_order_codes() {
        let mut repo = MockShopRepository::new();
        repo.expect_list_material_codes()
            .withf(|hub, search| *hub == 7 && search.is_none())
            .returning(|_, _| {
                Ok(vec![
                    ("W-1".to_string(), true),
                    ("W-1".to_string(), false),
                    ("L-9".to_string(), false),
                ])
            });

        let data = load_material_usage(&repo, &manager(), MaterialsQuery::default())
            .expect("usage loads");

        assert_eq!(data.summary.distinct_codes, 2);
        assert_eq!(data.summary.rarely_used_codes, 1);
        assert_eq!(data.usage[0].material_code, "W-1");
    }
}

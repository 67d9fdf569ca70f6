//! Persona rule fetches

use sqlx::SqlitePool;
use suki_common::db::models::PersonaRuleRow;
use suki_common::Result;

/// Fetch all active rule rows, ordered by id for deterministic snapshots
pub async fn fetch_active_rule_rows(pool: &SqlitePool) -> Result<Vec<PersonaRuleRow>> {
    let rows = sqlx::query_as::<_, PersonaRuleRow>(
        r#"
        SELECT id, role_name, priority, include_terms, exclude_terms,
               required_categories, active_hours, min_age, max_age,
               allowed_genders, min_basket_items, is_active
        FROM persona_rules
        WHERE is_active = 1
        ORDER BY id
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};
use uuid::Uuid;

use super::db_or_skip;
use crate::{product, user};

fn unique_digits() -> String {
    Uuid::new_v4().simple().to_string()[..20].to_string()
}

async fn insert_user(db: &sea_orm::DatabaseConnection, role: user::Role) -> anyhow::Result<user::Model> {
    let tag = unique_digits();
    let now = Utc::now().into();
    let am = user::ActiveModel {
        company_name: Set(format!("Model Test {tag}")),
        role: Set(role),
        inn: Set(format!("inn-{tag}")),
        bik: Set(format!("bik-{tag}")),
        kpp: Set(format!("kpp-{tag}")),
        payment_account: Set(format!("acc-{tag}")),
        legal_address: Set("Moscow, Tverskaya 1".into()),
        country: Set(Some("RU".into())),
        contact_number: Set(format!("+7{tag}")),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };
    Ok(am.insert(db).await?)
}

#[tokio::test]
async fn user_insert_and_filter_by_role() -> anyhow::Result<()> {
    let Some(db) = db_or_skip().await? else { return Ok(()) };

    let maker = insert_user(&db, user::Role::Maker).await?;
    assert!(maker.id > 0);
    assert_eq!(maker.role, user::Role::Maker);

    let makers = user::Entity::find()
        .filter(user::Column::Role.eq(user::Role::Maker))
        .all(&db)
        .await?;
    assert!(makers.iter().any(|u| u.id == maker.id));
    assert!(makers.iter().all(|u| u.role == user::Role::Maker));

    user::Entity::delete_by_id(maker.id).exec(&db).await?;
    Ok(())
}

#[tokio::test]
async fn duplicate_inn_is_rejected_by_unique_index() -> anyhow::Result<()> {
    let Some(db) = db_or_skip().await? else { return Ok(()) };

    let first = insert_user(&db, user::Role::Dealer).await?;
    let tag = unique_digits();
    let now = Utc::now().into();
    let clash = user::ActiveModel {
        company_name: Set("Clash".into()),
        role: Set(user::Role::Dealer),
        inn: Set(first.inn.clone()),
        bik: Set(format!("bik-{tag}")),
        kpp: Set(format!("kpp-{tag}")),
        payment_account: Set(format!("acc-{tag}")),
        legal_address: Set("Kazan".into()),
        country: Set(None),
        contact_number: Set(format!("+7{tag}")),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };
    let err = clash.insert(&db).await.expect_err("duplicate inn must fail");
    assert!(err.to_string().contains("uniq_user_inn"), "unexpected error: {err}");

    user::Entity::delete_by_id(first.id).exec(&db).await?;
    Ok(())
}

#[tokio::test]
async fn product_links_to_distributor_and_detaches_on_delete() -> anyhow::Result<()> {
    let Some(db) = db_or_skip().await? else { return Ok(()) };

    let distributor = insert_user(&db, user::Role::Distributor).await?;
    let p = product::create(&db, "Drill", 4990.0, "18V, 2 batteries", Some(distributor.id), None).await?;
    assert_eq!(p.distributor_id, Some(distributor.id));
    assert_eq!(p.maker_id, None);

    user::Entity::delete_by_id(distributor.id).exec(&db).await?;
    let reloaded = product::Entity::find_by_id(p.id).one(&db).await?.expect("product survives");
    assert_eq!(reloaded.distributor_id, None);

    product::Entity::delete_by_id(p.id).exec(&db).await?;
    Ok(())
}

#[tokio::test]
async fn product_create_validates_before_touching_db() -> anyhow::Result<()> {
    let Some(db) = db_or_skip().await? else { return Ok(()) };
    let err = product::create(&db, "  ", 10.0, "", None, None).await.unwrap_err();
    assert!(matches!(err, crate::errors::ModelError::Validation(_)));
    Ok(())
}

use chrono::{Datelike, NaiveDate, Utc};
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Statement};
use uuid::Uuid;

use engine::{
    AmountMinor, Engine, NewExpense, SettingsPatch, StoreError, UserSettings, monthly_summary,
};
use migration::MigratorTrait;

async fn engine_with_db() -> (Engine, DatabaseConnection) {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let backend = db.get_database_backend();
    db.execute(Statement::from_sql_and_values(
        backend,
        "INSERT INTO users (username, password) VALUES (?, ?)",
        vec!["alice".into(), "password".into()],
    ))
    .await
    .unwrap();
    let engine = Engine::builder().database(db.clone()).build();
    (engine, db)
}

fn fields(title: &str, amount: &str, date: NaiveDate) -> NewExpense {
    NewExpense {
        title: title.to_string(),
        category: "food_dining".to_string(),
        amount: amount.to_string(),
        date: Some(date),
        notes: None,
        payment_method: Some("upi".to_string()),
    }
}

fn today() -> NaiveDate {
    Utc::now().date_naive()
}

#[tokio::test]
async fn add_then_list_returns_newest_first() {
    let (engine, _db) = engine_with_db().await;

    let first = engine
        .add_expense("alice", fields("Chai", "10", today()))
        .await
        .unwrap();
    let second = engine
        .add_expense("alice", fields("Lunch", "150", today()))
        .await
        .unwrap();

    let list = engine.expenses("alice").await.unwrap();
    assert_eq!(list.len(), 2);
    assert!(list[0].created_at >= list[1].created_at);
    let ids: Vec<Uuid> = list.iter().map(|e| e.id).collect();
    assert!(ids.contains(&first.id));
    assert!(ids.contains(&second.id));
}

#[tokio::test]
async fn lists_are_scoped_to_the_owner() {
    let (engine, db) = engine_with_db().await;
    let backend = db.get_database_backend();
    db.execute(Statement::from_sql_and_values(
        backend,
        "INSERT INTO users (username, password) VALUES (?, ?)",
        vec!["bob".into(), "password".into()],
    ))
    .await
    .unwrap();

    engine
        .add_expense("alice", fields("Chai", "10", today()))
        .await
        .unwrap();
    engine
        .add_expense("bob", fields("Coffee", "30", today()))
        .await
        .unwrap();

    let alice = engine.expenses("alice").await.unwrap();
    assert_eq!(alice.len(), 1);
    assert_eq!(alice[0].title, "Chai");

    let bob = engine.expenses("bob").await.unwrap();
    assert_eq!(bob.len(), 1);
    assert_eq!(bob[0].title, "Coffee");
}

#[tokio::test]
async fn invalid_fields_leave_the_store_unchanged() {
    let (engine, _db) = engine_with_db().await;

    let err = engine
        .add_expense("alice", fields("", "10", today()))
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::Validation(_)));

    let err = engine
        .add_expense("alice", fields("Chai", "not-a-number", today()))
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::Validation(_)));

    let mut dateless = fields("Chai", "10", today());
    dateless.date = None;
    let err = engine.add_expense("alice", dateless).await.unwrap_err();
    assert!(matches!(err, StoreError::Validation(_)));

    assert!(engine.expenses("alice").await.unwrap().is_empty());
}

#[tokio::test]
async fn delete_is_idempotent() {
    let (engine, _db) = engine_with_db().await;

    let expense = engine
        .add_expense("alice", fields("Chai", "10", today()))
        .await
        .unwrap();

    engine.delete_expense("alice", expense.id).await.unwrap();
    assert!(engine.expenses("alice").await.unwrap().is_empty());

    // Deleting again (or a random id) is not an error.
    engine.delete_expense("alice", expense.id).await.unwrap();
    engine.delete_expense("alice", Uuid::new_v4()).await.unwrap();
}

#[tokio::test]
async fn delete_ignores_records_of_other_owners() {
    let (engine, db) = engine_with_db().await;
    let backend = db.get_database_backend();
    db.execute(Statement::from_sql_and_values(
        backend,
        "INSERT INTO users (username, password) VALUES (?, ?)",
        vec!["bob".into(), "password".into()],
    ))
    .await
    .unwrap();

    let expense = engine
        .add_expense("alice", fields("Chai", "10", today()))
        .await
        .unwrap();

    engine.delete_expense("bob", expense.id).await.unwrap();
    assert_eq!(engine.expenses("alice").await.unwrap().len(), 1);
}

#[tokio::test]
async fn settings_merge_write_keeps_absent_fields() {
    let (engine, _db) = engine_with_db().await;

    assert_eq!(
        engine.user_settings("alice").await.unwrap(),
        UserSettings::default()
    );

    let after_budget = engine
        .update_user_settings(
            "alice",
            SettingsPatch {
                monthly_budget: Some(AmountMinor::new(2000_00)),
                saving_goal: None,
            },
        )
        .await
        .unwrap();
    assert_eq!(after_budget.monthly_budget, Some(AmountMinor::new(2000_00)));
    assert_eq!(after_budget.saving_goal, None);

    let after_goal = engine
        .update_user_settings(
            "alice",
            SettingsPatch {
                monthly_budget: None,
                saving_goal: Some(AmountMinor::new(500_00)),
            },
        )
        .await
        .unwrap();
    // The budget from the first write must survive the second.
    assert_eq!(after_goal.monthly_budget, Some(AmountMinor::new(2000_00)));
    assert_eq!(after_goal.saving_goal, Some(AmountMinor::new(500_00)));
}

#[tokio::test]
async fn settings_last_write_wins() {
    let (engine, _db) = engine_with_db().await;

    for minor in [1000_00, 2500_00] {
        engine
            .update_user_settings(
                "alice",
                SettingsPatch {
                    monthly_budget: Some(AmountMinor::new(minor)),
                    saving_goal: None,
                },
            )
            .await
            .unwrap();
    }

    let settings = engine.user_settings("alice").await.unwrap();
    assert_eq!(settings.monthly_budget, Some(AmountMinor::new(2500_00)));
}

#[tokio::test]
async fn feed_pushes_full_snapshots_on_every_change() {
    let (engine, _db) = engine_with_db().await;

    let mut feed = engine.subscribe_expenses("alice").await.unwrap();

    // Primed: first next() resolves immediately with the current (empty) list.
    let initial = feed.next().await.unwrap();
    assert!(initial.is_empty());

    engine
        .add_expense("alice", fields("Chai", "10", today()))
        .await
        .unwrap();
    let after_add = feed.next().await.unwrap();
    assert_eq!(after_add.len(), 1);
    assert_eq!(after_add[0].title, "Chai");

    engine
        .delete_expense("alice", after_add[0].id)
        .await
        .unwrap();
    let after_delete = feed.next().await.unwrap();
    assert!(after_delete.is_empty());
}

#[tokio::test]
async fn dropped_feed_does_not_block_writes() {
    let (engine, _db) = engine_with_db().await;

    let feed = engine.subscribe_expenses("alice").await.unwrap();
    drop(feed);

    engine
        .add_expense("alice", fields("Chai", "10", today()))
        .await
        .unwrap();
    assert_eq!(engine.expenses("alice").await.unwrap().len(), 1);
}

#[tokio::test]
async fn adding_a_record_raises_the_monthly_total_by_its_amount() {
    let (engine, _db) = engine_with_db().await;
    let now = today();

    engine
        .add_expense("alice", fields("Chai", "300", now))
        .await
        .unwrap();
    let before = monthly_summary(
        &engine.expenses("alice").await.unwrap(),
        UserSettings::default(),
        now,
    );

    engine
        .add_expense("alice", fields("Lunch", "150", now))
        .await
        .unwrap();
    let after = monthly_summary(
        &engine.expenses("alice").await.unwrap(),
        UserSettings::default(),
        now,
    );

    assert_eq!(
        after.total_expenses.minor() - before.total_expenses.minor(),
        150_00
    );
}

#[tokio::test]
async fn deleting_a_record_removes_it_from_the_aggregates() {
    let (engine, _db) = engine_with_db().await;
    let now = today();

    let kept = engine
        .add_expense("alice", fields("Chai", "100", now))
        .await
        .unwrap();
    let dropped = engine
        .add_expense("alice", fields("Taxi", "250", now))
        .await
        .unwrap();
    assert_eq!(kept.owner_id, "alice");

    engine.delete_expense("alice", dropped.id).await.unwrap();

    let summary = monthly_summary(
        &engine.expenses("alice").await.unwrap(),
        UserSettings::default(),
        now,
    );
    assert_eq!(summary.total_expenses.minor(), 100_00);
    assert_eq!(
        summary.daily_average.minor(),
        100_00 / i64::from(now.day())
    );
}

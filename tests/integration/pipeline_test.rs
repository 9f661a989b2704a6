use db_to_json::config::DatasetSettings;
use db_to_json::{DatasetState, Pipeline, RowFailurePolicy};
use serde_json::json;

use crate::utils::{
    Fixture, dataset, items_dataset, people_dataset, products_dataset,
};

const PRODUCTS: &str = r"
INSERT INTO products (id, name, price, category) VALUES
    (1, 'pen', 1.5, 'office'),
    (2, 'ink', 'cheap', NULL),
    (3, 'pad', 2, 'office');
";

const PEOPLE: &str = r"
INSERT INTO people (user_id, full_name, date_of_birth, street, city, postal_code) VALUES
    (10, 'Ada Lovelace', '1815-12-10', '12 St James Sq', 'London', 'SW1Y');
";

const ITEMS: &str = r"
INSERT INTO items (id, name) VALUES (1, 'first'), (NULL, 'keyless'), (3, 'third');
";

#[test]
fn test_products_written_back_as_json() {
    let fixture = Fixture::new(PRODUCTS);
    let config = fixture.config(vec![("products", products_dataset())]);

    let summary = Pipeline::from_config(config).run();

    let outcome = summary.outcome("products").unwrap();
    assert_eq!(outcome.state, DatasetState::Done);
    assert_eq!(outcome.rows_fetched, 3);
    assert_eq!(outcome.rows_written, 3);
    assert_eq!(outcome.rows_affected, 3);

    let payloads = fixture.payloads("products", "id");
    let first = payloads[0].as_ref().unwrap();
    assert_eq!(first["id"], 1);
    assert_eq!(first["name"], "pen");
    assert_eq!(first["price"].as_f64(), Some(1.5));
    assert_eq!(first["category"], "office");
    // payload itself is not a field of the shape
    assert!(first.get("payload").is_none());

    let third = payloads[2].as_ref().unwrap();
    assert_eq!(third["price"].as_f64(), Some(2.0));
}

#[test]
fn test_coercion_miss_leaves_only_that_field_unset() {
    let fixture = Fixture::new(PRODUCTS);
    let config = fixture.config(vec![("products", products_dataset())]);

    Pipeline::from_config(config).run();

    let payloads = fixture.payloads("products", "id");
    let second = payloads[1].as_ref().unwrap();
    assert_eq!(second["id"], 2);
    assert_eq!(second["name"], "ink");
    assert!(second.get("price").is_none());
    assert!(second.get("category").is_none());
}

#[test]
fn test_person_uses_declared_json_keys() {
    let fixture = Fixture::new(PEOPLE);
    let config = fixture.config(vec![("people", people_dataset())]);

    let summary = Pipeline::from_config(config).run();
    assert_eq!(summary.count(DatasetState::Done), 1);

    let payloads = fixture.payloads("people", "user_id");
    let person = payloads[0].as_ref().unwrap();
    assert_eq!(person["id"], 10);
    assert_eq!(person["full_name"], "Ada Lovelace");
    assert_eq!(person["date_of_birth"], "1815-12-10");
    assert_eq!(person["postal_code"], "SW1Y");
    assert!(person.get("user_id").is_none());
}

#[test]
fn test_invalid_dataset_skipped_and_later_datasets_run() {
    let fixture = Fixture::new(&format!("{PRODUCTS}{PEOPLE}"));
    let config = fixture.config(vec![
        (
            "people",
            DatasetSettings {
                update_sql: None,
                ..people_dataset()
            },
        ),
        ("products", products_dataset()),
    ]);

    let summary = Pipeline::from_config(config).run();

    let people = summary.outcome("people").unwrap();
    assert_eq!(people.state, DatasetState::Skipped);
    assert_eq!(people.rows_fetched, 0);
    assert!(people.error.as_deref().unwrap().contains("updateSql"));
    assert_eq!(fixture.payloads("people", "user_id"), vec![None]);

    assert_eq!(summary.outcome("products").unwrap().state, DatasetState::Done);
    assert!(fixture.payloads("products", "id").iter().all(Option::is_some));
}

#[test]
fn test_missing_key_stops_dataset_but_not_run() {
    let fixture = Fixture::new(&format!("{ITEMS}{PRODUCTS}"));
    let config = fixture.config(vec![
        ("items", items_dataset()),
        ("products", products_dataset()),
    ]);

    let summary = Pipeline::from_config(config).run();

    let items = summary.outcome("items").unwrap();
    assert_eq!(items.state, DatasetState::Failed);
    assert_eq!(items.rows_written, 1);

    let payloads = fixture.payloads("items", "rowid");
    assert_eq!(payloads[0], Some(json!({"id": 1, "name": "first"})));
    assert_eq!(payloads[1], None);
    assert_eq!(payloads[2], None);

    assert_eq!(summary.outcome("products").unwrap().state, DatasetState::Done);
}

#[test]
fn test_skip_row_policy_continues_past_missing_key() {
    let fixture = Fixture::new(ITEMS);
    let mut config = fixture.config(vec![("items", items_dataset())]);
    config.options.row_failure_policy = RowFailurePolicy::SkipRow;

    let summary = Pipeline::from_config(config).run();

    let items = summary.outcome("items").unwrap();
    assert_eq!(items.state, DatasetState::Done);
    assert_eq!(items.rows_written, 2);
    assert_eq!(items.rows_skipped, 1);

    let payloads = fixture.payloads("items", "rowid");
    assert!(payloads[0].is_some());
    assert!(payloads[1].is_none());
    assert_eq!(payloads[2], Some(json!({"id": 3, "name": "third"})));
}

#[test]
fn test_read_error_marks_dataset_failed() {
    let fixture = Fixture::new(PRODUCTS);
    let config = fixture.config(vec![
        (
            "ghosts",
            dataset(
                "SELECT * FROM ghosts",
                "UPDATE ghosts SET payload = ? WHERE id = ?",
                "Product",
            ),
        ),
        ("products", products_dataset()),
    ]);

    let summary = Pipeline::from_config(config).run();

    assert_eq!(summary.outcome("ghosts").unwrap().state, DatasetState::Failed);
    assert_eq!(summary.outcome("products").unwrap().state, DatasetState::Done);
}

#[test]
fn test_unreachable_database_fails_every_dataset() {
    let fixture = Fixture::new(PRODUCTS);
    let mut config = fixture.config(vec![
        ("products", products_dataset()),
        ("people", people_dataset()),
    ]);
    config.connection.url = fixture
        .db_path
        .with_file_name("missing.db")
        .display()
        .to_string();

    let summary = Pipeline::from_config(config).run();

    assert_eq!(summary.count(DatasetState::Failed), 2);
    assert!(
        summary
            .outcomes
            .iter()
            .all(|o| o.error.as_deref().unwrap().starts_with("Connection error"))
    );
}

#[test]
fn test_dry_run_leaves_rows_untouched() {
    let fixture = Fixture::new(PRODUCTS);
    let mut config = fixture.config(vec![("products", products_dataset())]);
    config.options.dry_run = true;

    let summary = Pipeline::from_config(config).run();

    let outcome = summary.outcome("products").unwrap();
    assert_eq!(outcome.state, DatasetState::Done);
    assert_eq!(outcome.rows_written, 3);
    assert_eq!(outcome.rows_affected, 0);
    assert_eq!(fixture.payloads("products", "id"), vec![None, None, None]);
}

use db_to_json::{DatasetState, Pipeline, RowFailurePolicy, load_config};

use crate::utils::Fixture;

const SEED: &str = r"
INSERT INTO products (id, name, price) VALUES (1, 'pen', 1.5);
INSERT INTO people (user_id, full_name) VALUES (10, 'Ada Lovelace');
";

#[test]
fn test_properties_file_drives_pipeline() {
    let fixture = Fixture::new(SEED);
    let path = fixture.db_path.with_file_name("pipeline.properties");

    unsafe { std::env::set_var("DBJ_IT_DRIVER", "org.sqlite.JDBC") };
    let properties = format!(
        "# datasets to process\n\
         modules=products,people,orders\n\
         dbUrl={url}\n\
         dbDriver=${{DBJ_IT_DRIVER}}\n\
         products.fetchSql=SELECT * FROM products\n\
         products.updateSql=UPDATE products SET payload = ? WHERE id = ?\n\
         products.dtoClass=com.example.dto.Product\n\
         people.fetchSql=SELECT * \\\n    FROM people\n\
         people.updateSql=UPDATE people SET payload = ? WHERE user_id = ?\n\
         people.dtoClass=com.example.dto.Person\n\
         orders.fetchSql=SELECT * FROM orders\n",
        url = fixture.url()
    );
    std::fs::write(&path, properties).unwrap();

    let config = load_config(&path).unwrap();
    unsafe { std::env::remove_var("DBJ_IT_DRIVER") };
    assert_eq!(config.modules, vec!["products", "people", "orders"]);
    assert_eq!(config.connection.driver, "org.sqlite.JDBC");

    let summary = Pipeline::from_config(config).run();

    assert_eq!(summary.outcome("products").unwrap().state, DatasetState::Done);
    assert_eq!(summary.outcome("people").unwrap().state, DatasetState::Done);
    assert_eq!(summary.outcome("orders").unwrap().state, DatasetState::Skipped);

    let people = fixture.payloads("people", "user_id");
    assert_eq!(people[0].as_ref().unwrap()["full_name"], "Ada Lovelace");
}

#[test]
fn test_yaml_file_drives_pipeline() {
    let fixture = Fixture::new(SEED);
    let path = fixture.db_path.with_file_name("pipeline.yaml");

    let yaml = format!(
        r"
modules:
  - products
connection:
  driver: sqlite
  url: '{url}'
datasets:
  products:
    fetchSql: SELECT * FROM products
    updateSql: UPDATE products SET payload = ? WHERE id = ?
    dtoClass: Product
options:
  row_failure_policy: skip-row
  dry_run: true
",
        url = fixture.url()
    );
    std::fs::write(&path, yaml).unwrap();

    let config = load_config(&path).unwrap();
    assert_eq!(config.options.row_failure_policy, RowFailurePolicy::SkipRow);

    let summary = Pipeline::from_config(config).run();
    assert_eq!(summary.outcome("products").unwrap().state, DatasetState::Done);
    assert_eq!(fixture.payloads("products", "id"), vec![None]);
}

#[test]
fn test_missing_environment_variable_rejects_config() {
    let fixture = Fixture::new("");
    let path = fixture.db_path.with_file_name("pipeline.properties");
    std::fs::write(&path, "modules=a\ndbPassword=${DBJ_IT_UNSET_PASSWORD}\n").unwrap();

    let err = load_config(&path).unwrap_err();
    assert!(err.to_string().contains("DBJ_IT_UNSET_PASSWORD"));
}

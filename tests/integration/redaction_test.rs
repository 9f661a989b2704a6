use db_to_json::{DatasetState, Pipeline};
use serde_json::json;

use crate::utils::{Fixture, employees_dataset};

const EMPLOYEES: &str = r"
INSERT INTO employees
    (employee_id, employee_name, employee_age, active_status, employee_phone, street, city, zip_code)
VALUES
    (1, 'Grace', 41, 'ACTIVE', '555-1111,555-2222', '1 Main St', 'Springfield', '12345'),
    (2, 'Alan', 35, 'inactive', '555-3333', '2 Elm St', 'Shelbyville', '67890'),
    (3, 'Edsger', 50, NULL, '555-4444', '3 Oak St', 'Capital City', '11111'),
    (4, 'Barbara', 'unknown', 'active', NULL, NULL, 'Ogdenville', NULL);
";

fn run() -> Vec<Option<serde_json::Value>> {
    let fixture = Fixture::new(EMPLOYEES);
    let config = fixture.config(vec![("employees", employees_dataset())]);

    let summary = Pipeline::from_config(config).run();
    let outcome = summary.outcome("employees").unwrap();
    assert_eq!(outcome.state, DatasetState::Done);
    assert_eq!(outcome.rows_written, 4);

    fixture.payloads("employees", "employee_id")
}

#[test]
fn test_active_employee_gets_phones_and_address() {
    let payloads = run();

    assert_eq!(
        payloads[0],
        Some(json!({
            "employeeId": 1,
            "employeeName": "Grace",
            "employeeAge": 41,
            "employeePhone": ["555-1111", "555-2222"],
            "employeeAddress": {
                "street": "1 Main St",
                "city": "Springfield",
                "zipCode": "12345"
            }
        }))
    );
}

#[test]
fn test_inactive_employee_is_redacted() {
    let payloads = run();

    assert_eq!(
        payloads[1],
        Some(json!({"employeeId": 2, "employeeName": "Alan", "employeeAge": 35}))
    );
    // a null status counts as inactive
    assert_eq!(
        payloads[2],
        Some(json!({"employeeId": 3, "employeeName": "Edsger", "employeeAge": 50}))
    );
}

#[test]
fn test_active_employee_with_sparse_columns() {
    let payloads = run();

    // age is a coercion miss, phones are absent and the address keeps only its city
    assert_eq!(
        payloads[3],
        Some(json!({
            "employeeId": 4,
            "employeeName": "Barbara",
            "employeeAddress": {"city": "Ogdenville"}
        }))
    );
}

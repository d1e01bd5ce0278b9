use platform_db::{FieldErrorKind, employees::EmployeeDraft};
use serde_json::{Map, Value, json};

fn draft_with(field: &str, value: Value) -> EmployeeDraft {
    let mut body = Map::new();
    body.insert(field.to_string(), value);
    serde_json::from_value(Value::Object(body)).unwrap()
}

#[test]
fn missing_fields_fail_individually() {
    let errors = EmployeeDraft::default().validate().unwrap_err();
    for field in ["firstName", "lastName", "department"] {
        let err = errors.field(field).unwrap();
        assert_eq!(err.kind, FieldErrorKind::Required, "{field}");
    }
}

#[test]
fn non_string_values_fail_on_their_field() {
    for case in [json!({}), json!([])] {
        for field in ["firstName", "lastName", "department"] {
            let errors = draft_with(field, case.clone()).validate().unwrap_err();
            let err = errors.field(field).unwrap();
            assert_eq!(err.kind, FieldErrorKind::NotText, "{field} = {case}");
        }
    }
}

#[test]
fn well_formed_employee_validates() {
    let draft: EmployeeDraft = serde_json::from_value(json!({
        "firstName": "Jonathan",
        "lastName": "Wilson",
        "department": "5e5aedb36af09dc4837a5a16",
    }))
    .unwrap();
    assert!(draft.validate().is_ok());
}

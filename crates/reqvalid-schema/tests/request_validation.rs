use reqvalid_schema::{RequestValidator, SchemaError, ValidationError};
use serde_json::{json, Value};

fn query_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "sort": {
                "type": "string",
                "sortOptions": ["a", "-b", "+c"]
            }
        }
    })
}

fn body_validator() -> RequestValidator {
    let mut validator = RequestValidator::body();
    validator
        .add_schema(
            "bodySchema",
            &json!({
                "type": "object",
                "properties": {
                    "name": { "type": "string", "minLength": 2, "maxLength": 5 }
                }
            }),
        )
        .expect("body schema should compile");
    validator
}

fn query_validator() -> RequestValidator {
    let mut validator = RequestValidator::query();
    validator
        .add_schema("querySchema", &query_schema())
        .expect("query schema should compile");
    validator
}

fn query_errors(sort: &str) -> Option<Vec<ValidationError>> {
    let mut query = json!({ "sort": sort });
    query_validator()
        .errors("querySchema", &mut query)
        .expect("schema is registered")
}

#[test]
fn body_fails_when_invalid() {
    let mut body = json!({ "name": "1" });
    let errors = body_validator()
        .errors("bodySchema", &mut body)
        .unwrap()
        .expect("body should be invalid");

    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].code, "min_length");
    assert_eq!(errors[0].path, "/name");
}

#[test]
fn body_fails_fast_with_every_error() {
    let mut validator = body_validator();
    validator
        .add_schema(
            "user",
            &json!({
                "type": "object",
                "properties": {
                    "name": { "type": "string", "minLength": 2 },
                    "age": { "type": "integer" }
                },
                "required": ["name", "age", "email"]
            }),
        )
        .unwrap();

    let mut body = json!({ "name": "1", "age": "old" });
    let err = validator.validate("user", &mut body).unwrap_err();
    let SchemaError::Validation(errors) = err else {
        panic!("expected aggregate validation failure");
    };

    let mut codes: Vec<&str> = errors.errors().iter().map(|e| e.code.as_str()).collect();
    codes.sort_unstable();
    assert_eq!(codes, vec!["min_length", "required", "type"]);
}

#[test]
fn sort_succeeds_when_all_options_valid() {
    assert_eq!(query_errors("+a,-b,c"), None);
}

#[test]
fn sort_fails_when_option_does_not_exist() {
    let errors = query_errors("d").expect("sort should be invalid");
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].code, "sort_options");
    assert_eq!(errors[0].path, "?sort");
    assert_eq!(errors[0].message, "Sort option is not supported");
}

#[test]
fn sort_fails_when_option_has_different_modifier() {
    let errors = query_errors("+b").expect("sort should be invalid");
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].code, "sort_options");
    assert_eq!(errors[0].path, "?sort");
    assert_eq!(errors[0].message, "Sort option is not supported");
}

#[test]
fn sort_fails_on_duplicate_values() {
    let errors = query_errors("+a,-a").expect("sort should be invalid");
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].code, "sort_options");
    assert_eq!(
        errors[0].message,
        "Cannot specify sort option more than once"
    );
}

#[test]
fn sort_reports_one_error_for_several_bad_tokens() {
    let errors = query_errors("d,e,a,a").expect("sort should be invalid");
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].message, "Sort option is not supported");
}

#[test]
fn sort_in_body_context_keeps_json_pointer() {
    let mut validator = RequestValidator::body();
    validator.add_schema("sortBody", &query_schema()).unwrap();

    let mut body = json!({ "sort": "d" });
    let errors = validator.errors("sortBody", &mut body).unwrap().unwrap();
    assert_eq!(errors[0].path, "/sort");
    assert_eq!(errors[0].code, "sort_options");
}

#[test]
fn nested_query_paths_replace_only_leading_separator() {
    let mut validator = RequestValidator::query();
    validator
        .add_schema(
            "nested",
            &json!({
                "type": "object",
                "properties": {
                    "page": {
                        "type": "object",
                        "properties": { "size": { "type": "integer", "maximum": 100 } }
                    }
                }
            }),
        )
        .unwrap();

    let mut query = json!({ "page": { "size": "500" } });
    let errors = validator.errors("nested", &mut query).unwrap().unwrap();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].code, "maximum");
    assert_eq!(errors[0].path, "?page/size");
    assert_eq!(query, json!({ "page": { "size": 500 } }));
}

#[test]
fn malformed_sort_options_argument_fails_registration() {
    let mut validator = RequestValidator::query();
    for argument in [json!("a,-b"), json!(["a", 2]), json!(["a", "a"])] {
        let schema = json!({ "type": "string", "sortOptions": argument });
        assert!(matches!(
            validator.add_schema("bad", &schema),
            Err(SchemaError::CompileFailed { .. })
        ));
    }
}

#[test]
fn non_string_sort_is_reported_by_type_only() {
    let mut query = json!({ "sort": ["a"] });
    let errors = query_validator()
        .errors("querySchema", &mut query)
        .unwrap()
        .unwrap();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].code, "type");
    assert_eq!(errors[0].path, "?sort");
}

//! Integration tests for the sql module.

use crate::error::DbError;
use crate::sql::{ColumnMap, Patch, SearchQb, quote_ident};
use rust_decimal::Decimal;
use serde_json::{Value, json};

const JOBS: &str = "SELECT id, title, salary, equity, company_handle FROM jobs";
const COMPANIES: &str = "SELECT handle, name, description, num_employees, logo_url FROM companies";

fn json_object(value: Value) -> serde_json::Map<String, Value> {
    match value {
        Value::Object(map) => map,
        other => panic!("expected a JSON object, got {other}"),
    }
}

// ==================== SET fragments ====================

#[test]
fn test_set_clause_single_field() {
    let patch = Patch::new().set("name", "NewCo");
    let frag = patch.set_clause(&ColumnMap::new()).unwrap();
    assert_eq!(frag.sql, r#""name"=$1"#);
    assert_eq!(frag.params.len(), 1);
}

#[test]
fn test_set_clause_maps_and_numbers_in_payload_order() {
    let patch = Patch::new().set("firstName", "Aliya").set("age", 32i64);
    let columns = ColumnMap::new().map("firstName", "first_name");
    let frag = patch.set_clause(&columns).unwrap();
    assert_eq!(frag.sql, r#""first_name"=$1, "age"=$2"#);
    assert_eq!(frag.params.len(), 2);
}

#[test]
fn test_set_clause_three_fields_mixed_mapping() {
    let patch = Patch::new()
        .set("password", "x")
        .set("firstName", "Y")
        .set("lastName", "Z");
    let columns = ColumnMap::new()
        .map("firstName", "first_name")
        .map("lastName", "last_name");
    let frag = patch.set_clause(&columns).unwrap();
    assert_eq!(frag.sql, r#""password"=$1, "first_name"=$2, "last_name"=$3"#);
    assert_eq!(frag.params.len(), 3);
}

#[test]
fn test_set_clause_unmapped_fields_keep_their_name() {
    let patch = Patch::new()
        .set("description", "rebuilt")
        .set("numEmployees", 40i64)
        .set("logoUrl", "/logos/new.png");
    let columns = ColumnMap::new()
        .map("numEmployees", "num_employees")
        .map("logoUrl", "logo_url");
    let frag = patch.set_clause(&columns).unwrap();
    assert_eq!(
        frag.sql,
        r#""description"=$1, "num_employees"=$2, "logo_url"=$3"#
    );
}

#[test]
fn test_set_clause_rejects_empty_payload() {
    let err = Patch::new().set_clause(&ColumnMap::new()).unwrap_err();
    assert!(matches!(err, DbError::NoData));
}

#[test]
fn test_set_clause_quotes_awkward_field_names() {
    let patch = Patch::new().set(r#"weird"col"#, 1i64);
    let frag = patch.set_clause(&ColumnMap::new()).unwrap();
    assert_eq!(frag.sql, r#""weird""col"=$1"#);
}

#[test]
fn test_duplicate_field_keeps_first_position() {
    let patch = Patch::new()
        .set("title", "Engineer")
        .set("salary", 100i64)
        .set("title", "Senior Engineer");
    let frag = patch.set_clause(&ColumnMap::new()).unwrap();
    assert_eq!(frag.sql, r#""title"=$1, "salary"=$2"#);
    assert_eq!(frag.params.len(), 2);
}

#[test]
fn test_quote_ident_escapes_quotes() {
    assert_eq!(quote_ident("name"), r#""name""#);
    assert_eq!(quote_ident(r#"a"b"#), r#""a""b""#);
}

// ==================== JSON payloads ====================

#[test]
fn test_from_json_keeps_key_order() {
    let object = json_object(json!({
        "firstName": "Aliya",
        "age": 32,
        "active": true,
        "note": null
    }));
    let patch = Patch::from_json(&object).unwrap();
    assert_eq!(
        patch.fields().collect::<Vec<_>>(),
        ["firstName", "age", "active", "note"]
    );

    let columns = ColumnMap::new().map("firstName", "first_name");
    let frag = patch.set_clause(&columns).unwrap();
    assert_eq!(
        frag.sql,
        r#""first_name"=$1, "age"=$2, "active"=$3, "note"=$4"#
    );
    assert_eq!(frag.params.len(), 4);
}

#[test]
fn test_from_json_accepts_fractional_numbers() {
    let object = json_object(json!({"equity": 0.25}));
    let patch = Patch::from_json(&object).unwrap();
    assert_eq!(patch.len(), 1);
}

#[test]
fn test_from_json_rejects_nested_values() {
    let object = json_object(json!({"tags": ["a", "b"]}));
    let err = Patch::from_json(&object).unwrap_err();
    assert!(matches!(err, DbError::InvalidField { ref field, .. } if field == "tags"));

    let object = json_object(json!({"meta": {"k": "v"}}));
    let err = Patch::from_json(&object).unwrap_err();
    assert!(matches!(err, DbError::InvalidField { ref field, .. } if field == "meta"));
}

// ==================== Filtered search ====================

#[test]
fn test_search_no_filters_returns_base_verbatim() {
    let frag = SearchQb::new(JOBS)
        .at_least::<i64>("minSalary", "salary", None)
        .flag("hasEquity", "equity > ?", None, Decimal::ZERO)
        .contains("title", "title", None)
        .order_by("title")
        .build()
        .unwrap();
    assert_eq!(frag.sql, JOBS);
    assert!(frag.params.is_empty());
}

#[test]
fn test_search_all_filters_in_declaration_order() {
    let frag = SearchQb::new(JOBS)
        .at_least::<i64>("minSalary", "salary", Some("10"))
        .flag("hasEquity", "equity > ?", Some("true"), Decimal::ZERO)
        .contains("title", "title", Some("gineer"))
        .order_by("title")
        .build()
        .unwrap();
    assert_eq!(
        frag.sql,
        "SELECT id, title, salary, equity, company_handle FROM jobs \
         WHERE salary >= $1 AND equity > $2 AND title ILIKE '%'||$3||'%' ORDER BY title"
    );
    assert_eq!(frag.params.len(), 3);
}

#[test]
fn test_search_threshold_and_substring_without_flag() {
    let frag = SearchQb::new(JOBS)
        .at_least::<i64>("minSalary", "salary", Some("10"))
        .flag("hasEquity", "equity > ?", None, Decimal::ZERO)
        .contains("title", "title", Some("j"))
        .order_by("title")
        .build()
        .unwrap();
    assert_eq!(
        frag.sql,
        "SELECT id, title, salary, equity, company_handle FROM jobs \
         WHERE salary >= $1 AND title ILIKE '%'||$2||'%' ORDER BY title"
    );
    assert_eq!(frag.params.len(), 2);
}

#[test]
fn test_search_skipped_filters_renumber_densely() {
    let frag = SearchQb::new(JOBS)
        .at_least::<i64>("minSalary", "salary", None)
        .flag("hasEquity", "equity > ?", Some("true"), Decimal::ZERO)
        .contains("title", "title", Some("dev"))
        .order_by("title")
        .build()
        .unwrap();
    assert_eq!(
        frag.sql,
        "SELECT id, title, salary, equity, company_handle FROM jobs \
         WHERE equity > $1 AND title ILIKE '%'||$2||'%' ORDER BY title"
    );
    assert_eq!(frag.params.len(), 2);
}

#[test]
fn test_search_single_filter() {
    let frag = SearchQb::new(JOBS)
        .at_least::<i64>("minSalary", "salary", Some("90000"))
        .flag("hasEquity", "equity > ?", None, Decimal::ZERO)
        .contains("title", "title", None)
        .order_by("title")
        .build()
        .unwrap();
    assert_eq!(
        frag.sql,
        "SELECT id, title, salary, equity, company_handle FROM jobs \
         WHERE salary >= $1 ORDER BY title"
    );
    assert_eq!(frag.params.len(), 1);
}

#[test]
fn test_search_range_filters_share_a_column() {
    let frag = SearchQb::new(COMPANIES)
        .at_least::<i64>("minEmployees", "num_employees", Some("2"))
        .at_most::<i64>("maxEmployees", "num_employees", Some("50"))
        .contains("name", "name", Some("net"))
        .order_by("name")
        .build()
        .unwrap();
    assert_eq!(
        frag.sql,
        "SELECT handle, name, description, num_employees, logo_url FROM companies \
         WHERE num_employees >= $1 AND num_employees <= $2 AND name ILIKE '%'||$3||'%' ORDER BY name"
    );
    assert_eq!(frag.params.len(), 3);
}

#[test]
fn test_search_rejects_unparseable_numeric_input() {
    let err = SearchQb::new(COMPANIES)
        .at_least::<i64>("minEmployees", "num_employees", Some("lots"))
        .build()
        .unwrap_err();
    assert!(matches!(
        err,
        DbError::InvalidFilter { ref filter, ref value }
            if filter == "minEmployees" && value == "lots"
    ));
}

#[test]
fn test_search_rejects_empty_numeric_input() {
    let err = SearchQb::new(JOBS)
        .at_least::<i64>("minSalary", "salary", Some(""))
        .build()
        .unwrap_err();
    assert!(matches!(err, DbError::InvalidFilter { ref value, .. } if value.is_empty()));
}

#[test]
fn test_search_flag_false_leaves_no_trace() {
    let frag = SearchQb::new(JOBS)
        .at_least::<i64>("minSalary", "salary", Some("10"))
        .flag("hasEquity", "equity > ?", Some("false"), Decimal::ZERO)
        .contains("title", "title", None)
        .order_by("title")
        .build()
        .unwrap();
    assert_eq!(
        frag.sql,
        "SELECT id, title, salary, equity, company_handle FROM jobs \
         WHERE salary >= $1 ORDER BY title"
    );
    assert_eq!(frag.params.len(), 1);
}

#[test]
fn test_search_keeps_hostile_text_out_of_sql() {
    let hostile = "'; DROP TABLE jobs; --";
    let frag = SearchQb::new(JOBS)
        .contains("title", "title", Some(hostile))
        .order_by("title")
        .build()
        .unwrap();
    assert!(!frag.sql.contains("DROP TABLE"));
    assert_eq!(
        frag.sql,
        "SELECT id, title, salary, equity, company_handle FROM jobs \
         WHERE title ILIKE '%'||$1||'%' ORDER BY title"
    );
    assert_eq!(frag.params.len(), 1);
}

#[test]
fn test_search_build_is_repeatable() {
    let qb = SearchQb::new(JOBS)
        .at_least::<i64>("minSalary", "salary", Some("10"))
        .order_by("title");
    let first = qb.build().unwrap();
    let second = qb.build().unwrap();
    assert_eq!(first.sql, second.sql);
    assert_eq!(first.params.len(), second.params.len());
}

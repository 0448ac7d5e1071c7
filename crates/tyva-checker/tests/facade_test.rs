//! Integration tests for the checker facade: navigation, reported paths,
//! error surfaces and sharing

use std::sync::Arc;
use std::thread;
use tyva_checker::{
    create_checkers, Checker, CheckerError, Param, Prop, TypeNode, TypeSuite, Value,
};

fn suite_with_person() -> TypeSuite {
    let mut suite = TypeSuite::new();
    let s = suite.string_type();
    let n = suite.number_type();
    let greet = suite.func(vec![Param::new("times", n)], s);
    let person = suite.iface(
        &[],
        vec![
            Prop::new("name", s),
            Prop::new("age", n),
            Prop::new("greet", greet),
        ],
    );
    suite.define("Person", person);
    suite
}

fn person_checker() -> Checker {
    create_checkers(&[&suite_with_person()])
        .unwrap()
        .remove("Person")
        .unwrap()
}

#[test]
fn test_create_checkers_returns_user_names_only() {
    let checkers = create_checkers(&[&suite_with_person()]).unwrap();
    assert_eq!(checkers.len(), 1);
    assert!(checkers.contains_key("Person"));
    assert!(!checkers.contains_key("string"));
}

#[test]
fn test_later_suites_override_earlier() {
    let mut first = TypeSuite::new();
    let n = first.number_type();
    first.define("Id", n);

    let mut second = TypeSuite::new();
    let s = second.string_type();
    second.define("Id", s);

    let checkers = create_checkers(&[&first, &second]).unwrap();
    let id = &checkers["Id"];
    assert!(id.test(&Value::from("abc")));
    assert!(!id.test(&Value::from(3)));
}

#[test]
fn test_get_prop_navigates_and_prefixes_path() {
    let person = person_checker();
    let age = person.get_prop("age").unwrap();

    assert!(age.test(&Value::from(30)));
    let errors = age.validate(&Value::from("x")).unwrap();
    assert_eq!(errors[0].path, "value.age");
    assert_eq!(errors[0].message, "is not a number");
}

#[test]
fn test_get_prop_failures() {
    let person = person_checker();
    let err = person.get_prop("height").unwrap_err();
    assert_eq!(err.to_string(), "Type has no property 'height'");
    assert!(matches!(err, CheckerError::NoSuchProperty { .. }));

    let age = person.get_prop("age").unwrap();
    let err = age.get_prop("anything").unwrap_err();
    assert_eq!(err.to_string(), "Type is not an interface");
}

#[test]
fn test_get_prop_through_name_and_bases() {
    let mut suite = TypeSuite::new();
    let n = suite.number_type();
    let base = suite.iface(&[], vec![Prop::new("id", n)]);
    suite.define("Base", base);
    let child = suite.iface(&["Base"], vec![]);
    suite.define("Child", child);
    let alias = suite.name("Child");
    suite.define("ChildAlias", alias);

    let checkers = create_checkers(&[&suite]).unwrap();
    // Navigation follows name aliases and inherited bases.
    let id = checkers["ChildAlias"].get_prop("id").unwrap();
    assert!(id.test(&Value::from(1)));
    assert_eq!(
        id.validate(&Value::from("x")).unwrap()[0].path,
        "value.id"
    );
}

#[test]
fn test_method_navigation_failures() {
    let person = person_checker();
    let err = person.method_args("age").unwrap_err();
    assert_eq!(err.to_string(), "Property 'age' is not a method");
    let err = person.method_args("height").unwrap_err();
    assert_eq!(err.to_string(), "Type has no property 'height'");
}

#[test]
fn test_get_args_on_non_function() {
    let person = person_checker();
    let err = person.get_args().unwrap_err();
    assert_eq!(err.to_string(), "Type is not a function");
    let err = person.get_result().unwrap_err();
    assert_eq!(err.to_string(), "Type is not a function");
}

#[test]
fn test_get_args_and_result_on_function() {
    let mut suite = TypeSuite::new();
    let s = suite.string_type();
    let n = suite.number_type();
    let func = suite.func(vec![Param::new("x", n)], s);
    suite.define("Fmt", func);
    let fmt = &create_checkers(&[&suite]).unwrap()["Fmt"];

    let args = fmt.get_args().unwrap();
    assert!(args.test(&Value::Array(vec![Value::from(1)])));
    let result = fmt.get_result().unwrap();
    assert!(result.test(&Value::from("out")));
}

#[test]
fn test_set_reported_path() {
    let mut person = person_checker();
    person.set_reported_path("person");

    let errors = person
        .validate(&Value::object([
            ("name", Value::from("A")),
            ("greet", Value::Func)
        ]))
        .unwrap();
    assert_eq!(errors[0].path, "person.age");

    let age = person.get_prop("age").unwrap();
    assert_eq!(
        age.validate(&Value::from("x")).unwrap()[0].path,
        "person.age"
    );
}

#[test]
fn test_get_type() {
    let person = person_checker();
    assert!(matches!(person.get_type(), TypeNode::Iface(_)));
}

#[test]
fn test_checker_is_shareable_across_threads() {
    let person = Arc::new(person_checker());
    let mut handles = Vec::new();
    for i in 0..4 {
        let person = Arc::clone(&person);
        handles.push(thread::spawn(move || {
            let value = Value::object([
                ("name", Value::from("A")),
                ("age", Value::from(i)),
                ("greet", Value::Func),
            ]);
            assert!(person.test(&value));
            assert!(!person.test(&Value::Null));
        }));
    }
    for handle in handles {
        handle.join().unwrap();
    }
}

#[test]
fn test_error_detail_serialization() {
    let person = person_checker();
    let errors = person
        .validate(&Value::object([
            ("name", Value::from("A")),
            ("greet", Value::Func)
        ]))
        .unwrap();
    let json = serde_json::to_string(&errors[0]).unwrap();
    assert_eq!(json, r#"{"path":"value.age","message":"is missing"}"#);
}

#[test]
fn test_validation_error_fields() {
    let person = person_checker();
    let err = person
        .check(&Value::object([("age", Value::from(1)), ("greet", Value::Func)]))
        .unwrap_err();
    assert_eq!(err.path, "value.name");
    assert_eq!(err.message, "is missing");
    assert_eq!(err.details.len(), 1);
}

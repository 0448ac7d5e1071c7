//! Integration tests for tuples, rest elements, parameter lists and
//! function types

use tyva_checker::{create_checkers, Checker, Param, Prop, TypeSuite, Value};

fn string_then_numbers() -> Checker {
    // [string, ...number[]]
    let mut suite = TypeSuite::new();
    let s = suite.string_type();
    let n = suite.number_type();
    let nums = suite.array(n);
    let rest = suite.rest(nums);
    let tuple = suite.tuple(vec![s, rest]);
    suite.define("Row", tuple);
    create_checkers(&[&suite]).unwrap().remove("Row").unwrap()
}

#[test]
fn test_tuple_with_rest() {
    let row = string_then_numbers();

    assert!(row.test(&Value::Array(vec![Value::from("a")])));
    assert!(row.test(&Value::Array(vec![
        Value::from("a"),
        Value::from(1),
        Value::from(2),
        Value::from(3),
    ])));
    // The rest element consumes the tail even in strict mode.
    assert!(row.strict_test(&Value::Array(vec![
        Value::from("a"),
        Value::from(1),
        Value::from(2),
    ])));

    let bad = Value::Array(vec![Value::from("a"), Value::from("b")]);
    assert!(!row.test(&bad));
    let errors = row.validate(&bad).unwrap();
    assert_eq!(errors[0].path, "value[1]");
    assert_eq!(errors[0].message, "is not a number");
}

#[test]
fn test_tuple_rejects_non_array() {
    let row = string_then_numbers();
    let errors = row.validate(&Value::from("a")).unwrap();
    assert_eq!(errors[0].path, "value");
    assert_eq!(errors[0].message, "is not an array");
}

#[test]
fn test_fixed_tuple_strict_extraneous() {
    let mut suite = TypeSuite::new();
    let s = suite.string_type();
    let n = suite.number_type();
    let pair = suite.tuple(vec![s, n]);
    suite.define("Pair", pair);
    let pair = &create_checkers(&[&suite]).unwrap()["Pair"];

    let long = Value::Array(vec![Value::from("a"), Value::from(1), Value::from("x")]);
    // Plain mode tolerates excess elements.
    assert!(pair.test(&long));
    assert!(!pair.strict_test(&long));
    let errors = pair.strict_validate(&long).unwrap();
    assert_eq!(errors[0].path, "value[2]");
    assert_eq!(errors[0].message, "is extraneous");
}

#[test]
fn test_short_tuple_fails_at_missing_position() {
    let mut suite = TypeSuite::new();
    let s = suite.string_type();
    let n = suite.number_type();
    let pair = suite.tuple(vec![s, n]);
    suite.define("Pair", pair);
    let pair = &create_checkers(&[&suite]).unwrap()["Pair"];

    let short = Value::Array(vec![Value::from("a")]);
    assert!(!pair.test(&short));
    let errors = pair.validate(&short).unwrap();
    assert_eq!(errors[0].path, "value[1]");
    assert_eq!(errors[0].message, "is not a number");
}

#[test]
fn test_tuple_lists_every_bad_element() {
    let mut suite = TypeSuite::new();
    let n = suite.number_type();
    let nums = suite.array(n);
    suite.define("Numbers", nums);
    let nums = &create_checkers(&[&suite]).unwrap()["Numbers"];

    let bad = Value::Array(vec![Value::from(1), Value::from("x"), Value::from("y")]);
    let errors = nums.validate(&bad).unwrap();
    assert_eq!(errors.len(), 2);
    assert_eq!(errors[0].path, "value[1]");
    assert_eq!(errors[1].path, "value[2]");
}

#[test]
fn test_function_value_check() {
    let mut suite = TypeSuite::new();
    let n = suite.number_type();
    let func = suite.func(vec![Param::new("x", n)], n);
    suite.define("Calc", func);
    let calc = &create_checkers(&[&suite]).unwrap()["Calc"];

    assert!(calc.test(&Value::Func));
    assert!(!calc.test(&Value::from(3)));
    let errors = calc.validate(&Value::from(3)).unwrap();
    assert_eq!(errors[0].message, "is not a function");
}

#[test]
fn test_param_list_validation() {
    let mut suite = TypeSuite::new();
    let s = suite.string_type();
    let n = suite.number_type();
    let func = suite.func(vec![Param::new("x", n), Param::opt("label", s)], s);
    suite.define("Fmt", func);
    let fmt = &create_checkers(&[&suite]).unwrap()["Fmt"];
    let args = fmt.get_args().unwrap();

    assert!(args.test(&Value::Array(vec![Value::from(1)])));
    assert!(args.test(&Value::Array(vec![Value::from(1), Value::from("pt")])));
    // Optional parameter may be left off or undefined.
    assert!(args.test(&Value::Array(vec![Value::from(1), Value::Undefined])));

    let missing = Value::Array(vec![]);
    assert!(!args.test(&missing));
    let errors = args.validate(&missing).unwrap();
    assert_eq!(errors[0].path, "value.x");
    assert_eq!(errors[0].message, "is missing");

    let wrong = Value::Array(vec![Value::from(1), Value::from(2)]);
    let errors = args.validate(&wrong).unwrap();
    assert_eq!(errors[0].path, "value.label");
    assert_eq!(errors[0].message, "is not a string");
}

#[test]
fn test_param_list_strict_rejects_extra_args() {
    let mut suite = TypeSuite::new();
    let n = suite.number_type();
    let func = suite.func(vec![Param::new("x", n)], n);
    suite.define("Calc", func);
    let calc = &create_checkers(&[&suite]).unwrap()["Calc"];
    let args = calc.get_args().unwrap();

    let extra = Value::Array(vec![Value::from(1), Value::from(2)]);
    assert!(args.test(&extra));
    assert!(!args.strict_test(&extra));
    let errors = args.strict_validate(&extra).unwrap();
    assert_eq!(errors[0].path, "value[1]");
    assert_eq!(errors[0].message, "is extraneous");
}

#[test]
fn test_method_args_and_result() {
    let mut suite = TypeSuite::new();
    let s = suite.string_type();
    let n = suite.number_type();
    let greet = suite.func(vec![Param::new("times", n)], s);
    let greeter = suite.iface(&[], vec![Prop::new("name", s), Prop::new("greet", greet)]);
    suite.define("Greeter", greeter);
    let greeter = &create_checkers(&[&suite]).unwrap()["Greeter"];

    let args = greeter.method_args("greet").unwrap();
    assert!(args.test(&Value::Array(vec![Value::from(2)])));
    let errors = args.validate(&Value::Array(vec![])).unwrap();
    assert_eq!(errors[0].path, "value.greet.times");
    assert_eq!(errors[0].message, "is missing");

    let result = greeter.method_result("greet").unwrap();
    assert!(result.test(&Value::from("hi")));
    assert!(!result.test(&Value::from(3)));
}

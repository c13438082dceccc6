mod common;
use common::run;

#[test]
fn get_and_set_round_trip_through_fields() {
    let result = run(r#"
        class Foo {}
        var foo = Foo();
        foo.bar = 1;
        print foo.bar;
        foo.bar = 2;
        print foo.bar;
    "#);

    assert_eq!(result.stdout, "1\n2\n");
}

#[test]
fn getting_a_missing_field_is_a_runtime_error() {
    let result = run(r#"
        class Foo {}
        var foo = Foo();
        print foo.bar;
    "#);

    assert!(result.had_runtime_error);
    assert!(result.stderr.contains("Undefined property 'bar'."));
}

#[test]
fn get_on_a_non_instance_is_a_runtime_error() {
    for source in ["var foo = true; foo.bar;", "var foo = nil; foo.bar;", "var foo = \"str\"; foo.bar;"] {
        let result = run(source);
        assert!(result.had_runtime_error, "expected error for: {source}");
        assert!(result.stderr.contains("Only instances have properties."));
    }
}

#[test]
fn set_on_a_non_instance_is_a_runtime_error() {
    for source in ["var foo = true; foo.bar = 1;", "var foo = nil; foo.bar = 1;"] {
        let result = run(source);
        assert!(result.had_runtime_error, "expected error for: {source}");
        assert!(result.stderr.contains("Only instances have fields."));
    }
}

#[test]
fn fields_shadow_methods_of_the_same_name() {
    let result = run(r#"
        class Foo {
            bar() { return "method"; }
        }
        var foo = Foo();
        print foo.bar();
        foo.bar = "field";
        print foo.bar;
    "#);

    assert_eq!(result.stdout, "method\nfield\n");
}

mod common;
use common::run;

#[test]
fn this_is_bound_to_the_receiver() {
    let result = run(r#"
        class Foo {
            getThis() { return this; }
        }
        print Foo().getThis();
    "#);

    assert_eq!(result.stdout, "Foo instance\n");
}

#[test]
fn this_in_a_closure_inside_a_method_still_refers_to_the_receiver() {
    let result = run(r#"
        class Foo {
            getClosure() {
                fun closure() { return this.name; }
                return closure;
            }
            init(name) { this.name = name; }
        }
        var closure = Foo("Foo").getClosure();
        print closure();
    "#);

    assert_eq!(result.stdout, "Foo\n");
}

#[test]
fn nested_classes_each_keep_their_own_this() {
    let result = run(r#"
        class Outer {
            method() {
                fun f() {
                    class Inner {
                        method() { return this; }
                    }
                    return Inner().method();
                }
                return f();
            }
        }
        print Outer().method();
    "#);

    assert_eq!(result.stdout, "Inner instance\n");
}

#[test]
fn this_at_top_level_is_a_static_error() {
    let result = run("print this;");
    assert!(result.had_error);
    assert!(result.stderr.contains("Can't use 'this' outside of a class."));
}

#[test]
fn this_in_a_plain_function_is_a_static_error() {
    let result = run("fun notAMethod() { print this; }");
    assert!(result.had_error);
    assert!(result.stderr.contains("Can't use 'this' outside of a class."));
}

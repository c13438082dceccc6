mod common;
use common::run;

#[test]
fn super_calls_the_superclass_method_bound_to_the_subclass_instance() {
    let result = run(r#"
        class Base {
            method() { print "Base.method(" + this.name + ")"; }
        }
        class Derived < Base {
            init(name) { this.name = name; }
            method() { super.method(); }
        }
        Derived("arg").method();
    "#);

    assert_eq!(result.stdout, "Base.method(arg)\n");
}

#[test]
fn super_can_call_a_different_method_than_the_one_currently_running() {
    let result = run(r#"
        class Base {
            foo() { print "Base.foo()"; }
        }
        class Derived < Base {
            bar() {
                print "Derived.bar()";
                super.foo();
            }
        }
        Derived().bar();
    "#);

    assert_eq!(result.stdout, "Derived.bar()\nBase.foo()\n");
}

#[test]
fn super_is_resolved_through_indirect_ancestors() {
    let result = run(r#"
        class A {
            foo() { print "A.foo()"; }
        }
        class B < A {
            foo() { print "B.foo()"; }
        }
        class C < B {
            foo() { super.foo(); }
        }
        C().foo();
    "#);

    assert_eq!(result.stdout, "A.foo()\n");
}

#[test]
fn super_without_a_superclass_is_a_static_error() {
    let result = run(r#"
        class Base {
            method() { super.method(); }
        }
    "#);

    assert!(result.had_error);
    assert!(result.stderr.contains("Can't use 'super' in a class with no superclass."));
}

#[test]
fn super_outside_a_class_is_a_static_error() {
    let result = run("super.method();");
    assert!(result.had_error);
    assert!(result.stderr.contains("Can't use 'super' outside of a class."));
}

#[test]
fn super_can_reach_a_method_never_overridden_by_the_subclass() {
    let result = run(r#"
        class Base {
            foo() { print "Base.foo()"; }
        }
        class Derived < Base {
            bar() { super.foo(); }
        }
        Derived().bar();
    "#);

    assert_eq!(result.stdout, "Base.foo()\n");
}

#[test]
fn this_inside_a_superclass_method_still_refers_to_the_subclass_instance() {
    let result = run(r#"
        class Base {
            getName() { return this.name; }
        }
        class Derived < Base {
            init(name) { this.name = name; }
        }
        print Derived("instance").getName();
    "#);

    assert_eq!(result.stdout, "instance\n");
}

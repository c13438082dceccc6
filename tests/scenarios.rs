mod common;
use common::run;

#[test]
fn inheritance_chain_through_super_and_init() {
    let result = run(r#"
        class A {
            init(n) { this.n = n; }
            value() { return this.n; }
        }
        class B < A {
            init(n) { super.init(n + 1); }
        }
        class C < B {
            init(n) { super.init(n + 1); }
        }

        print C(4).value();
    "#);

    assert_eq!(result.stdout, "6\n");
}

#[test]
fn adding_a_number_to_a_string_is_a_runtime_error_with_a_line_number() {
    let result = run("print 1 + \"x\";");

    assert!(result.had_runtime_error);
    assert!(result.stderr.contains("Operands must be two numbers or two strings."));
    assert!(result.stderr.contains("[line 1]"));
}

#[test]
fn using_a_list_to_collect_values() {
    let result = run(r#"
        var l = list();
        l.add(1);
        l.add(2);
        print l;
    "#);

    assert_eq!(result.stdout, "[1, 2]\n");
}

#[test]
fn for_loop_desugars_to_a_while_loop() {
    let result = run(r#"
        for (var i = 0; i < 3; i = i + 1) {
            print i;
        }
    "#);

    assert_eq!(result.stdout, "0\n1\n2\n");
}

#[test]
fn a_closure_returned_from_a_function_keeps_its_environment_alive() {
    let result = run(r#"
        fun makeAdder(a) {
            fun adder(b) { return a + b; }
            return adder;
        }
        var add5 = makeAdder(5);
        print add5(3);
    "#);

    assert_eq!(result.stdout, "8\n");
}

#[test]
fn a_class_with_fields_and_a_method_touching_them() {
    let result = run(r#"
        class Counter {
            init() { this.count = 0; }
            increment() { this.count = this.count + 1; }
        }
        var c = Counter();
        c.increment();
        c.increment();
        print c.count;
    "#);

    assert_eq!(result.stdout, "2\n");
}

#[test]
fn recursive_fibonacci() {
    let result = run(r#"
        fun fib(n) {
            if (n < 2) return n;
            return fib(n - 1) + fib(n - 2);
        }
        print fib(10);
    "#);

    assert_eq!(result.stdout, "55\n");
}

#[test]
fn multiple_syntax_errors_are_all_reported_via_synchronization() {
    let result = run(r#"
        var a = ;
        var b = ;
    "#);

    assert!(result.had_error);
    let error_lines = result.stderr.lines().count();
    assert!(error_lines >= 2, "expected at least two reported errors, got: {}", result.stderr);
}

#[test]
fn an_undefined_global_reference_is_a_runtime_error_not_a_scan_or_parse_error() {
    let result = run("print doesNotExist;");

    assert!(!result.had_error);
    assert!(result.had_runtime_error);
}

#[test]
fn a_clean_script_reports_neither_error_flag() {
    let result = run("print \"ok\";");

    assert!(!result.had_error);
    assert!(!result.had_runtime_error);
}

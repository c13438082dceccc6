mod common;
use common::run;

#[test]
fn dangling_else_binds_to_the_nearest_if() {
    let result = run("if (true) if (false) print \"bad\"; else print \"good\";");
    assert_eq!(result.stdout, "good\n");
}

#[test]
fn else_branch_runs_when_condition_is_falsey() {
    let result = run(r#"
        if (true) print "good"; else print "bad";
        if (false) print "bad"; else print "good";
        if (false) print "bad"; else { print "block"; }
    "#);

    assert_eq!(result.stdout, "good\ngood\nblock\n");
}

#[test]
fn then_branch_runs_when_condition_is_truthy() {
    let result = run(r#"
        if (true) print "good";
        if (false) print "bad";
        if (true) { print "block"; }
    "#);

    assert_eq!(result.stdout, "good\nblock\n");
}

#[test]
fn truthiness_matches_lox_rules() {
    let result = run(r#"
        print !!false;
        print !!nil;
        print !!true;
        print !!0;
        print !!"";
    "#);

    assert_eq!(result.stdout, "false\nfalse\ntrue\ntrue\ntrue\n");
}

#[test]
fn a_class_literal_is_not_a_valid_branch_expression() {
    let result = run("if (true) class Foo {}");
    assert!(result.had_error);
    assert!(result.stderr.contains("Expect expression."));
}

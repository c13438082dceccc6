mod common;
use common::run;

#[test]
fn and_returns_the_first_falsey_operand_or_the_last() {
    let result = run(r#"
        print false and 1;
        print true and 1;
        print 1 and 2 and false;
        print 1 and 2 and 3;
    "#);

    assert_eq!(result.stdout, "false\n1\nfalse\n3\n");
}

#[test]
fn and_short_circuits() {
    let result = run(r#"
        fun sideEffect() { print "evaluated"; return true; }
        false and sideEffect();
    "#);

    assert_eq!(result.stdout, "");
}

#[test]
fn or_returns_the_first_truthy_operand_or_the_last() {
    let result = run(r#"
        print 1 or true;
        print false or 1;
        print false or false or true;
        print false or false or false;
    "#);

    assert_eq!(result.stdout, "1\n1\ntrue\nfalse\n");
}

#[test]
fn or_short_circuits() {
    let result = run(r#"
        fun sideEffect() { print "evaluated"; return true; }
        true or sideEffect();
    "#);

    assert_eq!(result.stdout, "");
}

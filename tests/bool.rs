mod common;
use common::run;

#[test]
fn equality() {
    let result = run(r#"
        print true == true;
        print true == false;
        print true == "true";
        print true == 1;
        print false == false;
        print false == true;
    "#);

    assert_eq!(result.stdout, "true\nfalse\nfalse\nfalse\ntrue\nfalse\n");
    assert!(!result.had_error);
}

#[test]
fn not() {
    let result = run(r#"
        print !true;
        print !false;
        print !!true;
    "#);

    assert_eq!(result.stdout, "false\ntrue\ntrue\n");
}

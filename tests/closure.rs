mod common;
use common::run;

#[test]
fn closures_capture_by_reference() {
    let result = run(r#"
        fun makeCounter() {
            var i = 0;
            fun count() {
                i = i + 1;
                print i;
            }
            return count;
        }

        var counter = makeCounter();
        counter();
        counter();
    "#);

    assert_eq!(result.stdout, "1\n2\n");
}

#[test]
fn assigning_to_a_closed_over_variable_is_visible_to_the_closure() {
    let result = run(r#"
        var f;
        var g;

        {
            var local = "local";
            fun f_() {
                print local;
                local = "after f";
                print local;
            }
            f = f_;

            fun g_() {
                print local;
                local = "after g";
                print local;
            }
            g = g_;
        }

        f();
        g();
    "#);

    assert_eq!(result.stdout, "local\nafter f\nafter f\nafter g\n");
}

#[test]
fn nested_closures_each_keep_their_own_binding() {
    let result = run(r#"
        fun f() {
            var a = "a";
            fun g() {
                var b = "b";
                fun h() {
                    var c = "c";
                    print a;
                    print b;
                    print c;
                }
                h();
            }
            g();
        }
        f();
    "#);

    assert_eq!(result.stdout, "a\nb\nc\n");
}

#[test]
fn closure_over_a_function_parameter() {
    let result = run(r#"
        fun f(param) {
            fun g() {
                print param;
            }
            g();
        }
        f("param");
    "#);

    assert_eq!(result.stdout, "param\n");
}

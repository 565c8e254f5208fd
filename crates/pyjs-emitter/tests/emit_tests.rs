//! End-to-end translation tests: source text in, JavaScript text out.

use pyjs_emitter::{translate, EmitError};
use pyjs_parser::parse;

fn translate_source(source: &str) -> String {
    let module = parse(source).expect("parse should succeed");
    translate(&module).expect("translation should succeed")
}

fn translate_error(source: &str) -> EmitError {
    let module = parse(source).expect("parse should succeed");
    translate(&module).expect_err("translation should fail")
}

// =============================================================================
// Declarations and hoisting
// =============================================================================

#[test]
fn module_assignment_folds_declaration() {
    assert_eq!(translate_source("a = 1\n"), "var a = 1;\n");
}

#[test]
fn reassignment_declares_only_once() {
    assert_eq!(translate_source("a = 1\na = 2\n"), "var a = 1;\na = 2;\n");
}

#[test]
fn branch_only_name_declares_inside_its_branch() {
    let output = translate_source("if c:\n    a = 1\n");
    assert_eq!(output, "if (c) {\n\tvar a = 1;\n}\n");
}

#[test]
fn branch_split_name_folds_into_first_assignment() {
    let output = translate_source("if True:\n    a = 1\nelse:\n    a = 2\n");
    assert_eq!(
        output,
        "if (True) {\n\tvar a = 1;\n} else {\n\ta = 2;\n}\n"
    );
}

#[test]
fn two_split_names_get_a_declaration_line() {
    let output = translate_source("if c:\n    a = 1\n    b = 2\nelse:\n    a = 3\n    b = 4\n");
    assert!(
        output.starts_with("var a, b;\nif (c) {"),
        "Output: {}",
        output
    );
    assert!(!output.contains("var a ="), "Output: {}", output);
}

#[test]
fn chained_assignment_is_not_folded() {
    assert_eq!(translate_source("a = b = 1\n"), "var a, b;\na = b = 1;\n");
}

#[test]
fn tuple_assignment_declares_elements() {
    assert_eq!(
        translate_source("a, b = pair\n"),
        "var a, b;\n[a, b] = pair;\n"
    );
}

#[test]
fn global_name_is_never_declared() {
    let output = translate_source("def f():\n    global counter\n    counter = 1\n");
    assert_eq!(output, "function f() {\n\tcounter = 1;\n}\n");
}

#[test]
fn function_scopes_are_independent() {
    let output = translate_source(
        "def outer():\n    x = 1\n    def inner():\n        y = 2\n    z = 3\n",
    );
    let expected = "function outer() {\n\tvar x = 1;\n\tfunction inner() {\n\t\tvar y = 2;\n\t}\n\tvar z = 3;\n}\n";
    assert_eq!(output, expected);
}

// =============================================================================
// Functions and lambdas
// =============================================================================

#[test]
fn function_definition_layout() {
    assert_eq!(
        translate_source("def add(a, b):\n    return a + b\n"),
        "function add(a, b) {\n\treturn a + b;\n}\n"
    );
}

#[test]
fn default_parameters_become_comments() {
    let output = translate_source("def f(a, b=2):\n    pass\n");
    assert!(
        output.contains("function f(a, b /*= 2*/) {"),
        "Output: {}",
        output
    );
}

#[test]
fn vararg_gets_ellipsis_suffix() {
    let output = translate_source("def f(a, *rest):\n    pass\n");
    assert!(
        output.contains("function f(a, rest...) {"),
        "Output: {}",
        output
    );
}

#[test]
fn lambda_is_a_single_line_function() {
    assert_eq!(
        translate_source("f = lambda x: x + 1\n"),
        "var f = function (x) { return x + 1; };\n"
    );
}

#[test]
fn bare_return_has_no_value() {
    let output = translate_source("def f():\n    return\n");
    assert_eq!(output, "function f() {\n\treturn;\n}\n");
}

// =============================================================================
// Control flow
// =============================================================================

#[test]
fn elif_chain_flattens_to_else_if() {
    let output = translate_source("if a:\n    x = 1\nelif b:\n    x = 2\nelse:\n    x = 3\n");
    let expected =
        "if (a) {\n\tvar x = 1;\n} else if (b) {\n\tx = 2;\n} else {\n\tx = 3;\n}\n";
    assert_eq!(output, expected);
}

#[test]
fn while_non_comparison_test_is_flagged() {
    let output = translate_source("while []:\n    pass\n");
    assert_eq!(
        output,
        "while ([]) /* WARNING: Empty containers are NOT false in Javascript! */ {\n}\n"
    );
}

#[test]
fn while_comparison_test_is_not_flagged() {
    let output = translate_source("while x < 3:\n    x += 1\n");
    assert_eq!(output, "while (x < 3) {\n\tx += 1;\n}\n");
}

#[test]
fn for_over_name_counts_with_synthesized_index() {
    let output = translate_source("for item in items:\n    f(item)\n");
    let expected = "for (var item$index = 0; item$index < items.length; ++item$index) {\n\titem = items[item$index];\n\tf(item);\n}\n";
    assert_eq!(output, expected);
}

#[test]
fn for_over_enumerate_uses_explicit_index() {
    let output = translate_source("for i, item in enumerate(items):\n    f(i)\n");
    let expected =
        "for (var i = 0; i < items.length; ++i) {\n\titem = items[i];\n\tf(i);\n}\n";
    assert_eq!(output, expected);
}

#[test]
fn other_for_shapes_enumerate_properties() {
    let output = translate_source("for k in obj.keys():\n    f(k)\n");
    assert_eq!(output, "for (var k in obj.keys()) {\n\tf(k);\n}\n");
}

#[test]
fn loop_else_is_rejected() {
    let err = translate_error("for x in xs:\n    pass\nelse:\n    pass\n");
    assert_eq!(err.to_string(), "Unsupported: for-else");
    let err = translate_error("while c:\n    pass\nelse:\n    pass\n");
    assert_eq!(err.to_string(), "Unsupported: while-else");
}

#[test]
fn break_and_continue() {
    let output = translate_source("while x < 3:\n    break\n");
    assert!(output.contains("\tbreak;\n"), "Output: {}", output);
    let output = translate_source("while x < 3:\n    continue\n");
    assert!(output.contains("\tcontinue;\n"), "Output: {}", output);
}

// =============================================================================
// Statements
// =============================================================================

#[test]
fn delete_slice_becomes_splice() {
    assert_eq!(translate_source("del x[1:3]\n"), "x.splice(1, 3);\n");
    assert_eq!(translate_source("del x[:]\n"), "x.splice(0, x.length);\n");
}

#[test]
fn delete_slice_with_unit_step_is_allowed() {
    assert_eq!(translate_source("del x[1:3:1]\n"), "x.splice(1, 3);\n");
}

#[test]
fn delete_slice_with_non_unit_step_is_rejected() {
    let err = translate_error("del x[1:3:2]\n");
    assert_eq!(err.to_string(), "Unsupported: slice deletion with a non-unit step");
}

#[test]
fn plain_delete_targets_are_batched() {
    assert_eq!(translate_source("del a, b\n"), "delete a, b;\n");
    assert_eq!(
        translate_source("del x[1:2], a\n"),
        "x.splice(1, 2);\ndelete a;\n"
    );
}

#[test]
fn raise_emits_bare_throw() {
    assert_eq!(translate_source("raise\n"), "throw");
    // The thrown expression is dropped; it must be appended by hand.
    assert_eq!(translate_source("raise ValueError\n"), "throw");
}

#[test]
fn import_becomes_var_bindings() {
    assert_eq!(
        translate_source("import os.path as p, sys\n"),
        "var p = import(\"os.path\"), sys = import(\"sys\");\n"
    );
}

#[test]
fn try_and_with_are_rejected() {
    let err = translate_error("try:\n    pass\nexcept:\n    pass\n");
    assert_eq!(err.to_string(), "Unsupported: Try");
    let err = translate_error("with open(path) as f:\n    pass\n");
    assert_eq!(err.to_string(), "Unsupported: With");
}

#[test]
fn pass_and_global_emit_nothing() {
    assert_eq!(translate_source("pass\n"), "");
    assert_eq!(translate_source("global a\n"), "");
}

// =============================================================================
// Expressions
// =============================================================================

#[test]
fn ternary_is_parenthesized() {
    assert_eq!(
        translate_source("r = a if t else b\n"),
        "var r = ((t) ? a : (b));\n"
    );
}

#[test]
fn comparison_chain_expands_pairwise() {
    assert_eq!(
        translate_source("r = a < b < c\n"),
        "var r = a < b && b < c;\n"
    );
}

#[test]
fn re_evaluated_comparand_is_flagged() {
    assert_eq!(
        translate_source("r = a < f(b) < c\n"),
        "var r = a < f(b) && f(b) /* WARNING: expression re-evaluated! */ < c;\n"
    );
}

#[test]
fn not_in_is_rejected() {
    let err = translate_error("r = a not in b\n");
    assert_eq!(err.to_string(), "Unsupported: operator 'not in'");
}

#[test]
fn identity_comparisons_stay_as_placeholders() {
    assert_eq!(translate_source("r = a is b\n"), "var r = a is b;\n");
    assert_eq!(translate_source("r = a is not b\n"), "var r = a !is b;\n");
}

#[test]
fn modulo_and_power_are_rejected() {
    assert_eq!(
        translate_error("r = a % b\n").to_string(),
        "Unsupported: operator '%'"
    );
    assert_eq!(
        translate_error("r = a ** b\n").to_string(),
        "Unsupported: operator '**'"
    );
    assert_eq!(
        translate_error("r = a // b\n").to_string(),
        "Unsupported: operator '//'"
    );
}

#[test]
fn boolean_operators_map_to_symbols() {
    assert_eq!(
        translate_source("r = a and b or not c\n"),
        "var r = a && b || !c;\n"
    );
}

#[test]
fn len_call_becomes_length_property() {
    assert_eq!(translate_source("n = len(xs)\n"), "var n = xs.length;\n");
}

#[test]
fn extend_call_becomes_push_apply() {
    assert_eq!(
        translate_source("xs.extend(ys)\n"),
        "Array.prototype.push.apply(xs, ys);\n"
    );
}

#[test]
fn subscript_forms() {
    assert_eq!(translate_source("r = x[0]\n"), "var r = x[0];\n");
    assert_eq!(translate_source("r = x[1:]\n"), "var r = x.slice(1);\n");
    assert_eq!(translate_source("r = x[1:2]\n"), "var r = x.slice(1, 2);\n");
    assert_eq!(translate_source("r = x[:2]\n"), "var r = x.slice(0, 2);\n");
}

#[test]
fn none_becomes_null() {
    assert_eq!(translate_source("x = None\n"), "var x = null;\n");
}

#[test]
fn literals_round_trip_textually() {
    assert_eq!(
        translate_source("x = [1, 2.5, \"s\"]\n"),
        "var x = [1, 2.5, \"s\"];\n"
    );
    assert_eq!(
        translate_source("x = {\"k\": 1}\n"),
        "var x = {\"k\": 1};\n"
    );
    assert_eq!(translate_source("x = (1, 2)\n"), "var x = [1, 2];\n");
}

#[test]
fn string_escapes_are_re_encoded() {
    assert_eq!(
        translate_source("s = 'a\\n\"b\"'\n"),
        "var s = \"a\\n\\\"b\\\"\";\n"
    );
}

#[test]
fn yield_is_flagged_inline() {
    let output = translate_source("def g():\n    yield 1\n");
    assert!(
        output.contains("yield(1) /* WARNING: Yield not supported */;"),
        "Output: {}",
        output
    );
}

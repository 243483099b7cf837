use sprig_syntax::{
    parse, ExpressionKind, InfixOperator, Lexer, Literal, ParseOptions, Parser, Program, Span,
    Statement,
};

fn parse_lenient(source: &str) -> (Program, Vec<String>) {
    parse(source, ParseOptions::default()).expect("lenient parse never fails")
}

fn parse_clean(source: &str) -> Program {
    let (program, errors) = parse_lenient(source);
    assert!(errors.is_empty(), "unexpected errors: {errors:?}");
    program
}

/// Renders the expression of a single expression statement.
fn render_expression(source: &str) -> String {
    let program = parse_clean(source);
    assert_eq!(program.statements.len(), 1, "{source}");
    match &program.statements[0] {
        Statement::Expression(statement) => statement.expression.to_string(),
        other => panic!("expected expression statement, found {other:?}"),
    }
}

#[test]
fn parses_let_with_integer_value() {
    let program = parse_clean("let x = 5;");
    assert_eq!(program.statements.len(), 1);

    let Statement::Variable(declaration) = &program.statements[0] else {
        panic!("expected variable declaration");
    };
    assert!(!declaration.constant);
    assert_eq!(declaration.identifier.name, "x");
    assert_eq!(declaration.identifier.span, Span::new(4, 5));
    let value = declaration.value.as_ref().expect("value");
    assert_eq!(value.kind, ExpressionKind::Literal(Literal::Integer(5)));
    assert_eq!(declaration.span, Span::new(0, 10));
    assert_eq!(program.span, Span::new(0, 10));
}

#[test]
fn let_without_value_is_allowed() {
    let program = parse_clean("let x;");
    let Statement::Variable(declaration) = &program.statements[0] else {
        panic!("expected variable declaration");
    };
    assert!(declaration.value.is_none());
    assert_eq!(declaration.span, Span::new(0, 6));
}

#[test]
fn const_without_value_is_rejected() {
    let (program, errors) = parse_lenient("const x;");
    assert!(program.statements.is_empty());
    assert_eq!(errors, vec!["constant `x` declared without value"]);
}

#[test]
fn const_with_value_is_constant() {
    let program = parse_clean("const answer = 42;");
    let Statement::Variable(declaration) = &program.statements[0] else {
        panic!("expected variable declaration");
    };
    assert!(declaration.constant);
    assert_eq!(program.statements[0].to_string(), "const answer = 42;");
}

#[test]
fn operator_precedence() {
    let cases = [
        ("1 + 2 * 3;", "(1 + (2 * 3))"),
        ("10 - 3 - 2;", "((10 - 3) - 2)"),
        ("-a * b;", "((-a) * b)"),
        ("!-a;", "(!(-a))"),
        ("a + b * c + d / e - f;", "(((a + (b * c)) + (d / e)) - f)"),
        ("5 > 4 == 3 < 4;", "((5 > 4) == (3 < 4))"),
        ("5 < 4 != 3 > 4;", "((5 < 4) != (3 > 4))"),
        (
            "3 + 4 * 5 == 3 * 1 + 4 * 5;",
            "((3 + (4 * 5)) == ((3 * 1) + (4 * 5)))",
        ),
        ("true != false;", "(true != false)"),
        ("!true == false;", "((!true) == false)"),
        ("a + add(b * c) + d;", "((a + add((b * c))) + d)"),
        (
            "add(a, b, 1, 2 * 3, 4 + 5, add(6, 7 * 8));",
            "add(a, b, 1, (2 * 3), (4 + 5), add(6, (7 * 8)))",
        ),
    ];

    for (source, expected) in cases {
        assert_eq!(render_expression(source), expected, "{source}");
    }
}

#[test]
fn infix_spans_start_at_left_operand() {
    let program = parse_clean("10 - 3 - 2;");
    let Statement::Expression(statement) = &program.statements[0] else {
        panic!("expected expression statement");
    };
    let ExpressionKind::Infix(outer) = &statement.expression.kind else {
        panic!("expected infix expression");
    };
    assert_eq!(outer.operator, InfixOperator::Subtract);
    assert_eq!(statement.expression.span, Span::new(0, 10));
    assert_eq!(outer.left.span, Span::new(0, 6));
    assert_eq!(outer.right.span, Span::new(9, 10));
    assert_eq!(statement.span, Span::new(0, 11));
}

#[test]
fn expression_statement_semicolon_is_optional() {
    let program = parse_clean("a + b\nc");
    assert_eq!(program.statements.len(), 2);
    assert_eq!(program.statements[0].to_string(), "(a + b);");
    assert_eq!(program.statements[1].to_string(), "c;");
}

#[test]
fn parses_object_literal_with_shorthand() {
    let program = parse_clean("let o = {a, b: 1};");
    let Statement::Variable(declaration) = &program.statements[0] else {
        panic!("expected variable declaration");
    };
    let value = declaration.value.as_ref().expect("value");
    let ExpressionKind::Object(object) = &value.kind else {
        panic!("expected object literal");
    };

    assert_eq!(object.properties.len(), 2);
    assert_eq!(object.properties[0].key.name, "a");
    assert_eq!(object.properties[0].value.to_string(), "a");
    assert_eq!(object.properties[0].span, Span::new(9, 10));
    assert_eq!(object.properties[1].key.name, "b");
    assert_eq!(
        object.properties[1].value.kind,
        ExpressionKind::Literal(Literal::Integer(1))
    );
    assert_eq!(object.properties[1].span, Span::new(12, 16));
    assert_eq!(value.span, Span::new(8, 17));
    assert_eq!(value.to_string(), "{a: a, b: 1}");
}

#[test]
fn object_literal_edge_forms() {
    assert_eq!(render_expression("{};"), "{}");
    assert_eq!(render_expression("{a, b,};"), "{a: a, b: b}");
    assert_eq!(
        render_expression("{sum: 1 + 2, f: function(x) { x; }};"),
        "{sum: (1 + 2), f: function(x) { x; }}"
    );
}

#[test]
fn object_literal_errors() {
    let (_, errors) = parse_lenient("let o = {a: 1");
    assert_eq!(errors[0], "object literal missing closing brace");

    let (_, errors) = parse_lenient("let o = {1: 2};");
    assert_eq!(errors[0], "expected identifier as object key, found INT");

    let (_, errors) = parse_lenient("let o = {a 1};");
    assert_eq!(errors[0], "expected `:` after object key `a`, found INT");

    let (_, errors) = parse_lenient("let o = {a: 1 b: 2};");
    assert_eq!(
        errors[0],
        "expected `,` or `}` after object property, found IDENT"
    );
}

#[test]
fn parses_array_literals() {
    assert_eq!(
        render_expression("[1, 2 * 2, \"three\"];"),
        "[1, (2 * 2), \"three\"]"
    );
    assert_eq!(render_expression("[];"), "[]");

    let (_, errors) = parse_lenient("[1, 2");
    assert_eq!(errors, vec!["expected `]` to close array literal, found EOF"]);

    let (_, errors) = parse_lenient("[1,];");
    assert_eq!(errors[0], "no prefix parse function for R_BRACKET");
}

#[test]
fn string_literal_keeps_source_quotes() {
    let program = parse_clean("\"hello world\";");
    let Statement::Expression(statement) = &program.statements[0] else {
        panic!("expected expression statement");
    };
    assert_eq!(
        statement.expression.kind,
        ExpressionKind::Literal(Literal::String("\"hello world\"".into()))
    );
    assert_eq!(statement.expression.span, Span::new(0, 13));
    assert_eq!(program.statements[0].to_string(), "\"hello world\";");
}

#[test]
fn deep_unary_nesting_is_reported_not_fatal() {
    let source = "-".repeat(10_000) + "1;";
    let (_, errors) = parse_lenient(&source);
    assert!(!errors.is_empty());
    assert_eq!(errors[0], "expression nesting exceeds 128 levels");
}

#[test]
fn deep_array_nesting_is_reported_not_fatal() {
    let source = "[".repeat(100_000);
    let (program, errors) = parse_lenient(&source);
    assert!(program.statements.is_empty());
    assert_eq!(errors[0], "expression nesting exceeds 128 levels");
}

#[test]
fn nesting_below_the_limit_still_parses() {
    let source = format!("{}1{};", "[".repeat(100), "]".repeat(100));
    let program = parse_clean(&source);
    assert_eq!(program.statements.len(), 1);
}

#[test]
fn unterminated_string_reports_errors_without_failing() {
    let (program, errors) = parse_lenient("let x = \"abc;");
    assert!(program.statements.is_empty());
    assert!(!errors.is_empty());
    assert_eq!(
        errors[0],
        "expected `;` to end declaration of `x`, found EOF"
    );
}

#[test]
fn integer_overflow_is_reported() {
    let (program, errors) = parse_lenient("99999999999999999999;");
    assert!(program.statements.is_empty());
    assert_eq!(
        errors[0],
        "could not parse `99999999999999999999` as integer"
    );
}

#[test]
fn parses_if_else_expression() {
    assert_eq!(
        render_expression("if (x < y) { x }"),
        "if ((x < y)) { x; }"
    );
    assert_eq!(
        render_expression("if (x < y) { x } else { y; z }"),
        "if ((x < y)) { x; } else { y; z; }"
    );
}

#[test]
fn if_expression_errors() {
    let (_, errors) = parse_lenient("if x { y }");
    assert_eq!(errors[0], "expected `(` following `if`, found IDENT");

    let (_, errors) = parse_lenient("if (x { y }");
    assert_eq!(errors[0], "expected `)` after if condition, found L_BRACE");

    let (_, errors) = parse_lenient("if (x) y");
    assert_eq!(errors[0], "expected `{` to begin if body, found IDENT");

    let (_, errors) = parse_lenient("if (x) { y } else z");
    assert_eq!(errors[0], "expected `{` after `else`, found IDENT");
}

#[test]
fn parses_function_declaration() {
    let program = parse_clean("function add(a, b) { return a + b; }");
    let Statement::Function(declaration) = &program.statements[0] else {
        panic!("expected function declaration");
    };
    assert_eq!(declaration.identifier.name, "add");
    let names: Vec<&str> = declaration
        .parameters
        .iter()
        .map(|parameter| parameter.name.as_str())
        .collect();
    assert_eq!(names, vec!["a", "b"]);
    assert_eq!(declaration.body.statements.len(), 1);
    assert!(matches!(
        declaration.body.statements[0],
        Statement::Return(_)
    ));
    assert_eq!(declaration.span, Span::new(0, 36));
    assert_eq!(
        program.statements[0].to_string(),
        "function add(a, b) { return (a + b); }"
    );
}

#[test]
fn parameter_lists_accept_trailing_comma_and_empty() {
    let program = parse_clean("function f(a,) { } function g() { }");
    assert_eq!(program.statements.len(), 2);
    assert_eq!(program.statements[0].to_string(), "function f(a) { }");
    assert_eq!(program.statements[1].to_string(), "function g() { }");
}

#[test]
fn function_declaration_errors() {
    let (_, errors) = parse_lenient("function (x) { x }");
    assert_eq!(errors[0], "expected identifier following `function`, found L_PAREN");

    let (_, errors) = parse_lenient("function f(1) { }");
    assert_eq!(errors[0], "expected parameter name, found INT");

    let (_, errors) = parse_lenient("function f(a b) { }");
    assert_eq!(errors[0], "expected `,` or `)` in parameter list, found IDENT");

    let (_, errors) = parse_lenient("function f(a");
    assert_eq!(errors, vec!["expected `)` to close parameter list"]);

    let (_, errors) = parse_lenient("function f(a) { let x = 1;");
    assert_eq!(errors, vec!["expected `}` to close block"]);
}

#[test]
fn parses_function_literal_and_call() {
    let program = parse_clean("let add = function(x, y) { x + y; };\nadd(1, 2);");
    assert_eq!(program.statements.len(), 2);
    assert_eq!(
        program.statements[0].to_string(),
        "let add = function(x, y) { (x + y); };"
    );

    let Statement::Expression(statement) = &program.statements[1] else {
        panic!("expected expression statement");
    };
    let ExpressionKind::Call(call) = &statement.expression.kind else {
        panic!("expected call expression");
    };
    assert_eq!(call.callee.to_string(), "add");
    assert_eq!(call.arguments.len(), 2);
    assert_eq!(statement.expression.span, Span::new(37, 46));
}

#[test]
fn call_argument_errors() {
    let (_, errors) = parse_lenient("add(1, 2");
    assert_eq!(errors, vec!["expected `)` to close argument list, found EOF"]);
}

#[test]
fn return_requires_expression_and_semicolon() {
    let (_, errors) = parse_lenient("return;");
    assert_eq!(
        errors,
        vec![
            "no prefix parse function for SEMICOLON",
            "expected expression following `return`",
        ]
    );

    let (_, errors) = parse_lenient("return 1");
    assert_eq!(errors, vec!["expected `;` after return value, found EOF"]);
}

#[test]
fn grouping_parentheses_are_not_expressions() {
    let (program, errors) = parse_lenient("(1 + 2) * 3;");
    assert_eq!(
        errors,
        vec![
            "no prefix parse function for L_PAREN",
            "no prefix parse function for R_PAREN",
            "no prefix parse function for ASTERISK",
        ]
    );
    let rendered: Vec<String> = program
        .statements
        .iter()
        .map(ToString::to_string)
        .collect();
    assert_eq!(rendered, vec!["(1 + 2);", "3;"]);
}

#[test]
fn recovers_and_keeps_later_statements() {
    let (program, errors) = parse_lenient("let = 5; let y = 2;");
    assert_eq!(
        errors,
        vec![
            "expected identifier following `let`, found ASSIGN",
            "no prefix parse function for ASSIGN",
        ]
    );
    let rendered: Vec<String> = program
        .statements
        .iter()
        .map(ToString::to_string)
        .collect();
    assert_eq!(rendered, vec!["5;", "let y = 2;"]);
}

#[test]
fn diagnostics_carry_offending_token_span() {
    let mut parser = Parser::new(Lexer::new("let = 5;"));
    parser.parse_program();
    let diagnostics = parser.into_diagnostics();
    assert_eq!(diagnostics.len(), 2);
    assert_eq!(diagnostics.entries()[0].span, Some(Span::new(4, 5)));
    assert_eq!(diagnostics.entries()[1].span, Some(Span::new(4, 5)));
}

#[test]
fn strict_mode_reports_every_error() {
    let source = "let = 5; const y; let z = 1;";
    let (_, lenient_errors) = parse_lenient(source);
    assert_eq!(lenient_errors.len(), 3);

    let error = parse(source, ParseOptions { fail_on_error: true })
        .expect_err("strict parse should fail");
    assert_eq!(error.errors, lenient_errors);
    assert!(error.to_string().starts_with("parser has 3 errors\n"));
    assert!(error
        .to_string()
        .contains("ERROR: constant `y` declared without value"));
}

#[test]
fn strict_mode_passes_clean_source() {
    let (program, errors) = parse("let x = 1;", ParseOptions { fail_on_error: true })
        .expect("clean source parses strictly");
    assert_eq!(program.statements.len(), 1);
    assert!(errors.is_empty());
}

#[test]
fn empty_source_is_an_empty_program() {
    let program = parse_clean("  // nothing here\n");
    assert!(program.statements.is_empty());
    assert_eq!(program.span, Span::new(0, 18));
}

#[test]
fn program_serializes_to_json() {
    let program = parse_clean("let x = -1;");
    let json = serde_json::to_value(&program).expect("serialize program");

    let declaration = &json["statements"][0]["variable"];
    assert_eq!(declaration["constant"], false);
    assert_eq!(declaration["identifier"]["name"], "x");
    assert_eq!(declaration["value"]["kind"]["prefix"]["operator"], "-");
    assert_eq!(
        declaration["value"]["kind"]["prefix"]["right"]["kind"]["literal"]["integer"],
        1
    );
    assert_eq!(json["span"]["end"], 11);
}

//! Parser tests. Trees are rendered as compact S-expressions so the
//! assertions stay readable.

use super::*;
use gexpr_ir::{ArrayLen, ExprKind, Literal, Span};
use pretty_assertions::assert_eq;

fn sexp(expr: &Expr) -> String {
    match &expr.kind {
        ExprKind::Ident(name) => name.clone(),
        ExprKind::Lit(Literal::Int(t) | Literal::Float(t) | Literal::Imag(t)) => t.clone(),
        ExprKind::Lit(Literal::Char(c)) => format!("'{c}'"),
        ExprKind::Lit(Literal::String(b)) => format!("{:?}", String::from_utf8_lossy(b)),
        ExprKind::CompositeLit { ty, elts } => {
            let elts: Vec<String> = elts.iter().map(sexp).collect();
            format!("(lit {} [{}])", sexp(ty), elts.join(" "))
        }
        ExprKind::KeyValue { key, value } => format!("{}:{}", sexp(key), sexp(value)),
        ExprKind::Paren(inner) => format!("({})", sexp(inner)),
        ExprKind::Selector { x, sel } => format!("{}.{}", sexp(x), sel.name),
        ExprKind::Index { x, index } => format!("(index {} {})", sexp(x), sexp(index)),
        ExprKind::Slice {
            x,
            low,
            high,
            max,
            slice3,
        } => {
            let part = |e: &Option<Box<Expr>>| e.as_ref().map_or("_".to_string(), |e| sexp(e));
            format!(
                "(slice{} {} {} {} {})",
                if *slice3 { "3" } else { "" },
                sexp(x),
                part(low),
                part(high),
                part(max)
            )
        }
        ExprKind::TypeAssert { x, ty } => format!("(assert {} {})", sexp(x), sexp(ty)),
        ExprKind::Call {
            fun,
            args,
            ellipsis,
        } => {
            let args: Vec<String> = args.iter().map(sexp).collect();
            format!(
                "(call {} {}{})",
                sexp(fun),
                args.join(" "),
                if *ellipsis { "..." } else { "" }
            )
        }
        ExprKind::Star(x) => format!("(* {})", sexp(x)),
        ExprKind::Unary { op, x } => format!("({op} {})", sexp(x)),
        ExprKind::Binary { op, x, y } => format!("({op} {} {})", sexp(x), sexp(y)),
        ExprKind::ArrayType { len, elem } => match len {
            ArrayLen::Slice => format!("[]{}", sexp(elem)),
            ArrayLen::Ellipsis => format!("[...]{}", sexp(elem)),
            ArrayLen::Fixed(n) => format!("[{}]{}", sexp(n), sexp(elem)),
        },
        ExprKind::MapType { key, value } => format!("map[{}]{}", sexp(key), sexp(value)),
        ExprKind::ChanType { dir, elem } => format!("chan{dir:?} {}", sexp(elem)),
        ExprKind::FuncType(sig) => {
            let params: Vec<String> = sig
                .params
                .iter()
                .map(|p| {
                    let name = p.name.as_ref().map_or(String::new(), |n| format!("{} ", n.name));
                    format!("{name}{}{}", if p.variadic { "..." } else { "" }, sexp(&p.ty))
                })
                .collect();
            let results: Vec<String> = sig.results.iter().map(|p| sexp(&p.ty)).collect();
            format!("func({}) ({})", params.join(", "), results.join(", "))
        }
        ExprKind::StructType(fields) => {
            let fields: Vec<String> = fields
                .iter()
                .map(|f| {
                    let names: Vec<&str> = f.names.iter().map(|n| n.name.as_str()).collect();
                    format!("{} {}", names.join(","), sexp(&f.ty)).trim().to_string()
                })
                .collect();
            format!("struct{{{}}}", fields.join("; "))
        }
        ExprKind::InterfaceType(methods) => {
            let names: Vec<&str> = methods.iter().map(|m| m.name.name.as_str()).collect();
            format!("interface{{{}}}", names.join("; "))
        }
    }
}

fn parse(source: &str) -> String {
    match parse_expr(source) {
        Ok(expr) => sexp(&expr),
        Err(err) => panic!("parse of {source:?} failed: {err}"),
    }
}

fn parse_err(source: &str) -> ParseErrorKind {
    match parse_expr(source) {
        Ok(expr) => panic!("parse of {source:?} unexpectedly gave {}", sexp(&expr)),
        Err(err) => err.kind,
    }
}

mod precedence {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn multiplicative_binds_tighter() {
        assert_eq!(parse("1+2*3"), "(+ 1 (* 2 3))");
        assert_eq!(parse("1<<2+3"), "(+ (<< 1 2) 3)");
    }

    #[test]
    fn left_associative() {
        assert_eq!(parse("a-b-c"), "(- (- a b) c)");
        assert_eq!(parse("1==2==true"), "(== (== 1 2) true)");
    }

    #[test]
    fn logical_levels() {
        assert_eq!(parse("a||b&&c==d"), "(|| a (&& b (== c d)))");
    }

    #[test]
    fn unary_binds_tighter_than_binary() {
        assert_eq!(parse("-a*^b"), "(* (- a) (^ b))");
        assert_eq!(parse("!(1==2)"), "(! ((== 1 2)))");
        assert_eq!(parse("*p+1"), "(+ (* p) 1)");
        assert_eq!(parse("&x.F"), "(& x.F)");
    }
}

mod postfix {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn calls_and_selectors() {
        assert_eq!(parse("a.F(1, 2)"), "(call a.F 1 2)");
        assert_eq!(parse("f(k, x...)"), "(call f k x...)");
        assert_eq!(parse("pkg.Func()(3)"), "(call (call pkg.Func ) 3)");
    }

    #[test]
    fn index_and_slices() {
        assert_eq!(parse("a[1]"), "(index a 1)");
        assert_eq!(parse("a[:]"), "(slice a _ _ _)");
        assert_eq!(parse("a[1:]"), "(slice a 1 _ _)");
        assert_eq!(parse("a[1:2:3]"), "(slice3 a 1 2 3)");
        assert_eq!(parse("a[::]"), "(slice3 a _ _ _)");
    }

    #[test]
    fn type_assertion() {
        assert_eq!(parse("x.(int)"), "(assert x int)");
        assert_eq!(parse("x.(*pkg.T)"), "(assert x (* pkg.T))");
    }

    #[test]
    fn conversions_of_type_literals() {
        assert_eq!(parse("[]int(nil)"), "(call []int nil)");
        assert_eq!(parse("(*int)(nil)"), "(call ((* int)) nil)");
        assert_eq!(
            parse("(func(int) string)(f)"),
            "(call (func(int) (string)) f)"
        );
    }
}

mod composite {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn keyed_and_positional() {
        assert_eq!(parse("T{1, 2}"), "(lit T [1 2])");
        assert_eq!(parse("pkg.T{A: 1, B: \"s\"}"), "(lit pkg.T [A:1 B:\"s\"])");
        assert_eq!(parse("[]int{1, 2, 3,}[1:3]"), "(slice (lit []int [1 2 3]) 1 3 _)");
    }

    #[test]
    fn array_forms() {
        assert_eq!(parse("[...]int{2: 1}"), "(lit [...]int [2:1])");
        assert_eq!(parse("[3]string{}"), "(lit [3]string [])");
        assert_eq!(
            parse("map[string]int{\"a\": 1}"),
            "(lit map[string]int [\"a\":1])"
        );
    }

    #[test]
    fn pointer_elements() {
        assert_eq!(
            parse("[]*([]int){&[]int{1}}"),
            "(lit [](* ([]int)) [(& (lit []int [1]))])"
        );
    }

    #[test]
    fn elided_types_are_rejected() {
        assert_eq!(
            parse_err("[][]int{{1}}"),
            ParseErrorKind::MissingCompositeType
        );
    }
}

mod types {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn channel_directions() {
        assert_eq!(parse("make(chan int)"), "(call make chanBoth int)");
        assert_eq!(parse("(<-chan int)(c)"), "(call (chanRecv int) c)");
        assert_eq!(parse("(chan<- int)(c)"), "(call (chanSend int) c)");
    }

    #[test]
    fn function_types() {
        assert_eq!(
            parse("func(a, b int, c ...string) (bool, error)"),
            "func(a int, b int, c ...string) (bool, error)"
        );
        assert_eq!(parse("func(int, ...int)"), "func(int, ...int) ()");
    }

    #[test]
    fn struct_types() {
        assert_eq!(
            parse("struct{S string; I, J int `json:\"i\"`; pkg.T; *U}{}"),
            "(lit struct{S string; I,J int; pkg.T; (* U)} [])"
        );
        assert_eq!(parse("struct{}{}"), "(lit struct{} [])");
    }

    #[test]
    fn interface_types() {
        assert_eq!(parse("interface{}(5)"), "(call interface{} 5)");
        assert_eq!(
            parse("interface{ M(int) string }(x)"),
            "(call interface{M} x)"
        );
    }
}

mod errors {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn trailing_tokens() {
        assert!(matches!(
            parse_err("1 2"),
            ParseErrorKind::Unexpected { .. }
        ));
    }

    #[test]
    fn missing_operand() {
        assert!(matches!(
            parse_err("1 +"),
            ParseErrorKind::ExpectedOperand { .. }
        ));
    }

    #[test]
    fn function_literal() {
        assert_eq!(parse_err("func() {}"), ParseErrorKind::FuncLit);
    }

    #[test]
    fn channel_receive() {
        assert_eq!(parse_err("<-c"), ParseErrorKind::Receive);
    }

    #[test]
    fn lexer_errors_surface() {
        let err = parse_expr("a $ b").unwrap_err();
        assert_eq!(err.span, Span::new(2, 3));
    }

    #[test]
    fn mixed_parameters() {
        assert_eq!(
            parse_err("func(a int, []string)"),
            ParseErrorKind::MixedParams
        );
    }
}

#[test]
fn spans_cover_whole_expression() {
    let expr = parse_expr("a + foo(1)").unwrap();
    assert_eq!(expr.span, Span::new(0, 10));
}

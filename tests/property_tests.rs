//! Property-based tests for the filter compiler.
//!
//! Run with: cargo test --test property_tests

use fql_compiler::{compile, CompileError, FieldAllowList, PlaceholderStyle};
use proptest::prelude::*;

const FIELDS: &[&str] = &["Age", "Status", "Data.Value", "x1"];
const COMPARATORS: &[&str] = &["=", "!=", "<", "<=", ">", ">="];
const OPERATORS: &[&str] = &["&&", "||", "AND", "OR", "and", "or"];

/// A filter as it is written, before scanning.
#[derive(Debug, Clone)]
enum Node {
    Predicate {
        field: &'static str,
        comparator: &'static str,
        value: String,
        literal_first: bool,
    },
    Group {
        op: &'static str,
        children: Vec<Node>,
    },
}

// ============================================================================
// Arbitrary generators
// ============================================================================

fn arb_predicate() -> impl Strategy<Value = Node> {
    (
        prop::sample::select(FIELDS),
        prop::sample::select(COMPARATORS),
        "[A-Za-z0-9 _.,;'()-]{0,10}",
        any::<bool>(),
    )
        .prop_map(|(field, comparator, value, literal_first)| Node::Predicate {
            field,
            comparator,
            value,
            literal_first,
        })
}

fn arb_group(inner: impl Strategy<Value = Node>) -> impl Strategy<Value = Node> {
    (
        prop::sample::select(OPERATORS),
        prop::collection::vec(inner, 1..4),
    )
        .prop_map(|(op, children)| Node::Group { op, children })
}

fn arb_filter() -> impl Strategy<Value = Node> {
    let node = arb_predicate().prop_recursive(3, 24, 4, |inner| arb_group(inner));
    arb_group(node)
}

// ============================================================================
// Helpers
// ============================================================================

fn allowed() -> FieldAllowList {
    FieldAllowList::new(FIELDS.iter().copied())
}

fn render(node: &Node) -> String {
    match node {
        Node::Predicate {
            field,
            comparator,
            value,
            literal_first: true,
        } => format!(r#""{value}" {comparator} {field}"#),
        Node::Predicate {
            field,
            comparator,
            value,
            literal_first: false,
        } => format!(r#"{field} {comparator} "{value}""#),
        Node::Group { op, children } => {
            let children: Vec<_> = children.iter().map(render).collect();
            format!("( {} )", children.join(&format!(" {op} ")))
        }
    }
}

fn expected_sql(node: &Node, sql: &mut String, args: &mut Vec<String>) {
    match node {
        Node::Predicate {
            field,
            comparator,
            value,
            ..
        } => {
            sql.push_str(&format!("{field} {comparator} ?"));
            args.push(value.clone());
        }
        Node::Group { op, children } => {
            let op = if matches!(*op, "&&" | "AND" | "and") {
                "AND"
            } else {
                "OR"
            };
            sql.push('(');
            for (i, child) in children.iter().enumerate() {
                if i > 0 {
                    sql.push(' ');
                    sql.push_str(op);
                }
                sql.push(' ');
                expected_sql(child, sql, args);
            }
            sql.push_str(" )");
        }
    }
}

/// Puts each argument back, quoted, in place of its `$n` marker.
fn substitute(sql: &str, args: &[String]) -> String {
    let mut out = sql.to_string();
    for (i, arg) in args.iter().enumerate().rev() {
        out = out.replace(&format!("${}", i + 1), &format!("\"{arg}\""));
    }
    out
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #[test]
    fn prop_allow_listed_filters_compile(filter in arb_filter()) {
        let fragment = compile(&render(&filter), &allowed()).unwrap();

        let mut sql = String::new();
        let mut args = Vec::new();
        expected_sql(&filter, &mut sql, &mut args);

        prop_assert_eq!(fragment.placeholder_count(), fragment.args.len());
        prop_assert_eq!(&fragment.sql, &sql);
        prop_assert_eq!(&fragment.args, &args);
    }

    #[test]
    fn prop_dollar_markers_are_sequential(filter in arb_filter()) {
        let fragment = compile(&render(&filter), &allowed()).unwrap();
        let count = fragment.args.len();
        let rewritten = fragment.rewrite(PlaceholderStyle::Dollar).unwrap();

        prop_assert!(!rewritten.sql.contains('?'));
        let markers: Vec<usize> = rewritten
            .sql
            .split('$')
            .skip(1)
            .map(|rest| {
                let digits: String = rest.chars().take_while(char::is_ascii_digit).collect();
                digits.parse().unwrap()
            })
            .collect();
        prop_assert_eq!(markers, (1..=count).collect::<Vec<_>>());
    }

    #[test]
    fn prop_substituted_arguments_recompile_to_the_same_fragment(filter in arb_filter()) {
        let fragment = compile(&render(&filter), &allowed()).unwrap();
        let rewritten = fragment.clone().rewrite(PlaceholderStyle::Dollar).unwrap();

        let recompiled = compile(&substitute(&rewritten.sql, &rewritten.args), &allowed()).unwrap();
        prop_assert_eq!(recompiled, fragment);
    }

    #[test]
    fn prop_unknown_fields_are_rejected(name in "[A-Za-z][A-Za-z0-9]{0,8}") {
        prop_assume!(!FIELDS.contains(&name.as_str()));
        prop_assume!(!name.eq_ignore_ascii_case("and") && !name.eq_ignore_ascii_case("or"));

        let input = format!(r#"Age = "1" && {name} = "2""#);
        match compile(&input, &allowed()) {
            Err(CompileError::Lexical(e)) => prop_assert!(e.message.contains(&name)),
            other => prop_assert!(false, "expected lexical error, got {:?}", other),
        }
    }

    #[test]
    fn prop_mismatched_boolean_pairs_are_rejected(
        first in prop::sample::select(vec!['&', '|']),
        second in prop::sample::select(vec!['&', '|', 'a', '=', '(', ' ', '"', '1']),
    ) {
        prop_assume!(first != second);

        let input = format!(r#"Age = "1" {first}{second} Status = "2""#);
        match compile(&input, &allowed()) {
            Err(CompileError::Lexical(e)) => {
                prop_assert!(e.message.starts_with("invalid boolean expression"));
                prop_assert!(e.message.contains(first));
            }
            other => prop_assert!(false, "expected lexical error, got {:?}", other),
        }
    }
}

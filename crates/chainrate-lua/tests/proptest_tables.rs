//! Property-based tests for the table shape rule.
//!
//! Tables are generated as syntax trees, evaluated, and checked against the
//! sequence/map decision and the positional numbering.

use chainrate_lua::syntax::*;
use chainrate_lua::{Key, Value, evaluate};
use proptest::prelude::*;

// ===========================================================================
// Generators
// ===========================================================================

/// A field description: `None` is positional, `Some(name)` is named.
fn arb_fields(max: usize) -> impl Strategy<Value = Vec<(Option<String>, f64)>> {
    proptest::collection::vec(
        (
            proptest::option::weighted(0.3, "[a-z]{1,6}"),
            -1.0e6..1.0e6f64,
        ),
        0..=max,
    )
}

fn build_table(fields: &[(Option<String>, f64)]) -> Expression {
    Expression::table(
        fields
            .iter()
            .map(|(name, value)| match name {
                Some(name) => TableField::Named {
                    name: name.clone(),
                    value: Expression::number(*value),
                },
                None => TableField::Positional(Expression::number(*value)),
            })
            .collect(),
    )
}

fn eval_table(table: Expression) -> Value {
    let chunk = Chunk::new(vec![Statement::assign("t", table)]);
    evaluate(&chunk)
        .expect("literal tables always evaluate")
        .get("t")
        .cloned()
        .expect("t is assigned")
}

// ===========================================================================
// Properties
// ===========================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Positional-only tables become sequences in declaration order.
    #[test]
    fn positional_tables_are_sequences(values in proptest::collection::vec(-1.0e6..1.0e6f64, 0..20)) {
        let fields: Vec<(Option<String>, f64)> = values.iter().map(|v| (None, *v)).collect();
        let value = eval_table(build_table(&fields));
        let expected: Vec<Value> = values.iter().map(|v| Value::Number(*v)).collect();
        prop_assert_eq!(value, Value::Sequence(expected));
    }

    /// Any named field turns the table into a map whose positional fields are
    /// numbered 0..N-1 in order.
    #[test]
    fn keyed_tables_are_maps(fields in arb_fields(20)) {
        prop_assume!(fields.iter().any(|(name, _)| name.is_some()));

        let value = eval_table(build_table(&fields));
        let map = value.as_map().expect("keyed table is a map");

        let positional: Vec<f64> = fields
            .iter()
            .filter(|(name, _)| name.is_none())
            .map(|(_, v)| *v)
            .collect();
        for (i, v) in positional.iter().enumerate() {
            prop_assert_eq!(map.get(&Key::Number(i as f64)), Some(&Value::Number(*v)));
        }

        // Named fields: the last occurrence of each name wins.
        for (name, _) in fields.iter().filter_map(|(n, v)| n.as_ref().map(|n| (n, v))) {
            let last = fields
                .iter()
                .rev()
                .find(|(n, _)| n.as_ref() == Some(name))
                .map(|(_, v)| *v)
                .unwrap();
            prop_assert_eq!(map.get(&Key::Text(name.clone())), Some(&Value::Number(last)));
        }
    }

    /// Nested tables decide their shape independently of their parent.
    #[test]
    fn nested_tables_decide_independently(inner in arb_fields(8), outer_named in any::<bool>()) {
        let inner_expr = build_table(&inner);
        let inner_value = eval_table(inner_expr.clone());

        let outer = if outer_named {
            Expression::table(vec![TableField::Named { name: "child".to_string(), value: inner_expr }])
        } else {
            Expression::table(vec![TableField::Positional(inner_expr)])
        };

        let value = eval_table(outer);
        let child = if outer_named {
            value.get("child").cloned()
        } else {
            value.as_sequence().and_then(|s| s.first().cloned())
        };
        prop_assert_eq!(child, Some(inner_value));
    }
}

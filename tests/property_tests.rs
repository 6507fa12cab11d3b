//! Property-based tests for the five-valued algebra and circuit evaluation.

use proptest::prelude::*;
use rothsim::graph::{Circuit, CircuitBuilder, GateType, Op, Value};

// ============================================================================
// Strategies
// ============================================================================

fn any_value() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Zero),
        Just(Value::One),
        Just(Value::D),
        Just(Value::DBar),
        Just(Value::X),
    ]
}

/// Values of the plain three valued logic.
fn ternary_value() -> impl Strategy<Value = Value> {
    prop_oneof![Just(Value::Zero), Just(Value::One), Just(Value::X)]
}

/// Values with both circuit components known.
fn known_value() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Zero),
        Just(Value::One),
        Just(Value::D),
        Just(Value::DBar),
    ]
}

fn any_op() -> impl Strategy<Value = Op> {
    prop_oneof![Just(Op::And), Just(Op::Or), Just(Op::Xor)]
}

fn gate_type() -> impl Strategy<Value = GateType> {
    prop_oneof![
        Just(GateType::And),
        Just(GateType::Nand),
        Just(GateType::Or),
        Just(GateType::Nor),
        Just(GateType::Xor),
        Just(GateType::Xnor),
        Just(GateType::Buff),
        Just(GateType::Not),
    ]
}

/// A gate declaration: type and fan-in positions. Positions are reduced modulo the number of
/// lines declared before the gate, which keeps the circuit acyclic.
#[derive(Debug, Clone)]
struct GateDecl {
    ty: GateType,
    fanin: Vec<usize>,
}

fn gate_decl() -> impl Strategy<Value = GateDecl> {
    (gate_type(), prop::collection::vec(any::<usize>(), 1..4)).prop_map(|(ty, mut fanin)| {
        if matches!(ty, GateType::Buff | GateType::Not) {
            fanin.truncate(1);
        }
        GateDecl { ty, fanin }
    })
}

/// Inputs, gates and the input vector of a random acyclic circuit.
fn random_circuit() -> impl Strategy<Value = (usize, Vec<GateDecl>, Vec<Value>)> {
    (1usize..6, prop::collection::vec(gate_decl(), 1..20)).prop_flat_map(|(inputs, gates)| {
        (
            Just(inputs),
            Just(gates),
            prop::collection::vec(any_value(), inputs),
        )
    })
}

// ============================================================================
// Helper functions
// ============================================================================

fn line_name(inputs: usize, i: usize) -> String {
    if i < inputs {
        format!("I{}", i)
    } else {
        format!("G{}", i - inputs)
    }
}

/// Builds the circuit, declaring gates in the order given by `order`.
/// Every gate is a primary output.
fn build(inputs: usize, gates: &[GateDecl], order: &[usize]) -> Circuit {
    let mut b = CircuitBuilder::new();
    for i in 0..inputs {
        b.input(line_name(inputs, i));
    }
    for g in 0..gates.len() {
        b.output(line_name(inputs, inputs + g));
    }
    for &g in order {
        let decl = &gates[g];
        let declared = inputs + g;
        let fanin: Vec<String> = decl
            .fanin
            .iter()
            .map(|f| line_name(inputs, f % declared))
            .collect();
        b.gate(line_name(inputs, declared), decl.ty, fanin);
    }
    b.build().unwrap()
}

// ============================================================================
// Algebra properties
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    #[test]
    fn prop_invert_involution(v in any_value()) {
        prop_assert_eq!(v.invert().invert(), v);
    }

    #[test]
    fn prop_apply_commutative(op in any_op(), a in any_value(), b in any_value()) {
        prop_assert_eq!(op.apply(a, b), op.apply(b, a));
    }

    #[test]
    fn prop_apply_associative_on_ternary(
        op in any_op(),
        a in ternary_value(),
        b in ternary_value(),
        c in ternary_value(),
    ) {
        prop_assert_eq!(op.apply(op.apply(a, b), c), op.apply(a, op.apply(b, c)));
    }

    #[test]
    fn prop_apply_associative_on_known(
        op in any_op(),
        a in known_value(),
        b in known_value(),
        c in known_value(),
    ) {
        prop_assert_eq!(op.apply(op.apply(a, b), c), op.apply(a, op.apply(b, c)));
    }

    #[test]
    fn prop_fold_of_two_is_apply(op in any_op(), a in any_value(), b in any_value()) {
        prop_assert_eq!(op.fold([a, b]), Some(op.apply(a, b)));
    }

    #[test]
    fn prop_fold_order_independent(
        op in any_op(),
        (values, shuffled) in prop::collection::vec(any_value(), 1..8)
            .prop_flat_map(|v| (Just(v.clone()), Just(v).prop_shuffle())),
    ) {
        prop_assert_eq!(op.fold(values), op.fold(shuffled));
    }

    #[test]
    fn prop_inverted_inputs_invert_xor(a in any_value(), b in any_value()) {
        prop_assert_eq!(Op::Xor.apply(a.invert(), b), Op::Xor.apply(a, b).invert());
    }
}

// ============================================================================
// Evaluation properties
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn prop_evaluation_independent_of_declaration_order(
        ((inputs, gates, vector), order) in random_circuit().prop_flat_map(|c| {
            let order: Vec<usize> = (0..c.1.len()).collect();
            (Just(c), Just(order).prop_shuffle())
        }),
    ) {
        let in_order: Vec<usize> = (0..gates.len()).collect();
        let mut a = build(inputs, &gates, &in_order);
        let mut b = build(inputs, &gates, &order);

        a.set_inputs(&vector).unwrap();
        b.set_inputs(&vector).unwrap();
        a.evaluate().unwrap();
        b.evaluate().unwrap();

        prop_assert_eq!(a.outputs().collect::<Vec<_>>(), b.outputs().collect::<Vec<_>>());
    }

    #[test]
    fn prop_evaluation_idempotent((inputs, gates, vector) in random_circuit()) {
        let order: Vec<usize> = (0..gates.len()).collect();
        let mut c = build(inputs, &gates, &order);
        c.set_inputs(&vector).unwrap();

        c.evaluate().unwrap();
        let first: Vec<Value> = c.outputs().collect();
        c.evaluate().unwrap();
        prop_assert_eq!(c.outputs().collect::<Vec<_>>(), first.clone());

        c.reset_values();
        c.set_inputs(&vector).unwrap();
        c.evaluate().unwrap();
        prop_assert_eq!(c.outputs().collect::<Vec<_>>(), first);
    }

    #[test]
    fn prop_evaluation_reaches_every_gate((inputs, gates, vector) in random_circuit()) {
        let order: Vec<usize> = (0..gates.len()).collect();
        let mut c = build(inputs, &gates, &order);
        c.set_inputs(&vector).unwrap();
        prop_assert_eq!(c.evaluate().unwrap(), gates.len());
    }

    #[test]
    fn prop_length_mismatch_keeps_inputs(
        (inputs, gates, vector) in random_circuit(),
        extra in any_value(),
    ) {
        let order: Vec<usize> = (0..gates.len()).collect();
        let mut c = build(inputs, &gates, &order);
        c.set_inputs(&vector).unwrap();
        c.evaluate().unwrap();
        let before: Vec<Value> = c.outputs().collect();

        let mut longer = vector.clone();
        longer.push(extra);
        prop_assert!(c.set_inputs(&longer).is_err());
        prop_assert!(c.set_inputs(&vector[1..]).is_err());

        c.evaluate().unwrap();
        prop_assert_eq!(c.outputs().collect::<Vec<_>>(), before);
    }
}

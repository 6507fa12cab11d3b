use crate::error::{Error, Result};
use num_enum::{IntoPrimitive, TryFromPrimitive};
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;
use strum::{EnumIter, EnumString};

/// A value of the five-valued Roth algebra.
///
/// Every value describes a line in the fault-free ("good") circuit and in the faulty circuit at
/// the same time. [D](Value::D) is good 1 / faulty 0 and [DBar](Value::DBar) is good 0 / faulty 1,
/// [X](Value::X) means at least one of the two is unknown.
///
/// The discriminants are the integer encoding used by command streams.
///
/// # Example
/// ```
/// # use rothsim::graph::Value;
/// assert_eq!(Value::try_from(2u8).unwrap(), Value::D);
/// assert_eq!(Value::D.invert(), Value::DBar);
/// assert_eq!(Value::D.good(), Some(true));
/// assert_eq!(Value::D.faulty(), Some(false));
/// ```
#[repr(u8)]
#[derive(
    Clone,
    Copy,
    Debug,
    Eq,
    PartialEq,
    Hash,
    Ord,
    PartialOrd,
    TryFromPrimitive,
    IntoPrimitive,
    EnumIter,
)]
pub enum Value {
    Zero = 0,
    One = 1,
    D = 2,
    DBar = 3,
    X = 4,
}
use Value::*;

const INVERT_TABLE: [Value; 5] = [One, Zero, DBar, D, X];

const AND_TABLE: [[Value; 5]; 5] = [
    [Zero, Zero, Zero, Zero, Zero],
    [Zero, One, D, DBar, X],
    [Zero, D, D, Zero, X],
    [Zero, DBar, Zero, DBar, X],
    [Zero, X, X, X, X],
];

const OR_TABLE: [[Value; 5]; 5] = [
    [Zero, One, D, DBar, X],
    [One, One, One, One, One],
    [D, One, D, One, X],
    [DBar, One, One, DBar, X],
    [X, One, X, X, X],
];

const XOR_TABLE: [[Value; 5]; 5] = [
    [Zero, One, D, DBar, X],
    [One, Zero, DBar, D, X],
    [D, DBar, Zero, One, X],
    [DBar, D, One, Zero, X],
    [X, X, X, X, X],
];

impl Value {
    /// Returns the inverted value, D and DBar swap and X stays X.
    #[inline(always)]
    pub fn invert(self) -> Value {
        INVERT_TABLE[self as usize]
    }

    /// Returns the value of the line in the fault-free circuit, None if unknown.
    pub fn good(self) -> Option<bool> {
        match self {
            Zero | DBar => Some(false),
            One | D => Some(true),
            X => None,
        }
    }

    /// Returns the value of the line in the faulty circuit, None if unknown.
    pub fn faulty(self) -> Option<bool> {
        match self {
            Zero | D => Some(false),
            One | DBar => Some(true),
            X => None,
        }
    }

    /// Builds a value from its good and faulty circuit components.
    /// If either component is unknown the result is [X].
    ///
    /// # Example
    /// ```
    /// # use rothsim::graph::Value;
    /// assert_eq!(Value::from_components(Some(true), Some(false)), Value::D);
    /// assert_eq!(Value::from_components(Some(false), Some(false)), Value::Zero);
    /// assert_eq!(Value::from_components(None, Some(true)), Value::X);
    /// ```
    pub fn from_components(good: Option<bool>, faulty: Option<bool>) -> Value {
        match (good, faulty) {
            (Some(false), Some(false)) => Zero,
            (Some(true), Some(true)) => One,
            (Some(true), Some(false)) => D,
            (Some(false), Some(true)) => DBar,
            _ => X,
        }
    }

    /// Returns [One] for true and [Zero] for false.
    pub fn from_bool(b: bool) -> Value {
        if b {
            One
        } else {
            Zero
        }
    }

    /// Returns true if `self` is [Zero] or [One].
    pub fn is_determined(self) -> bool {
        matches!(self, Zero | One)
    }

    /// Returns true if `self` carries a fault effect, [D] or [DBar].
    pub fn is_fault_effect(self) -> bool {
        matches!(self, D | DBar)
    }

    /// Long name of the value as used by human readable state reports.
    pub fn name(self) -> &'static str {
        match self {
            Zero => "Zero",
            One => "One",
            D => "D",
            DBar => "D_b",
            X => "X",
        }
    }

    /// Parses a single test vector character: '0', '1' or 'x' in any case.
    pub fn from_char(c: char) -> Option<Value> {
        match c {
            '0' => Some(Zero),
            '1' => Some(One),
            'x' | 'X' => Some(X),
            _ => None,
        }
    }
}

impl Default for Value {
    fn default() -> Self {
        X
    }
}

/// Short form used by the circuit state format: `0`, `1`, `D`, `D_b` or `X`.
impl Display for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Zero => write!(f, "0"),
            One => write!(f, "1"),
            D => write!(f, "D"),
            DBar => write!(f, "D_b"),
            X => write!(f, "X"),
        }
    }
}

impl FromStr for Value {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "0" => Ok(Zero),
            "1" => Ok(One),
            "D" | "d" => Ok(D),
            "D_b" | "D_B" | "d_b" => Ok(DBar),
            "X" | "x" => Ok(X),
            other => Err(Error::InvalidValue(other.to_string())),
        }
    }
}

/// Binary operations of the algebra.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, EnumString, strum::Display)]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
pub enum Op {
    And,
    Or,
    Xor,
}

impl Op {
    /// Returns the operation named `name`, case insensitively.
    ///
    /// # Example
    /// ```
    /// # use rothsim::graph::Op;
    /// assert_eq!(Op::from_name("and").unwrap(), Op::And);
    /// assert!(Op::from_name("nand").is_err());
    /// ```
    pub fn from_name(name: &str) -> Result<Op> {
        name.parse()
            .map_err(|_| Error::InvalidOperation(name.to_string()))
    }

    /// Returns the 5x5 lookup table of the operation, indexed by value discriminants.
    pub fn table(self) -> &'static [[Value; 5]; 5] {
        match self {
            Op::And => &AND_TABLE,
            Op::Or => &OR_TABLE,
            Op::Xor => &XOR_TABLE,
        }
    }

    /// Applies the operation to two values through its lookup table.
    #[inline(always)]
    pub fn apply(self, a: Value, b: Value) -> Value {
        self.table()[a as usize][b as usize]
    }

    /// Three valued accumulation of a single circuit component, None is unknown.
    #[inline(always)]
    fn accumulate(self, acc: Option<bool>, b: Option<bool>) -> Option<bool> {
        match self {
            Op::And => match (acc, b) {
                (Some(false), _) | (_, Some(false)) => Some(false),
                (Some(true), Some(true)) => Some(true),
                _ => None,
            },
            Op::Or => match (acc, b) {
                (Some(true), _) | (_, Some(true)) => Some(true),
                (Some(false), Some(false)) => Some(false),
                _ => None,
            },
            Op::Xor => match (acc, b) {
                (Some(a), Some(b)) => Some(a ^ b),
                _ => None,
            },
        }
    }

    /// Folds the operation over `values`, returns None if `values` is empty.
    ///
    /// The good and faulty components are folded separately and only collapsed into a
    /// [Value] at the end, so the result is the same for any ordering of `values`.
    /// For two operands this is exactly [Op::apply].
    ///
    /// # Example
    /// ```
    /// # use rothsim::graph::{Op, Value};
    /// use Value::*;
    /// assert_eq!(Op::And.fold([One, One, D]), Some(D));
    /// assert_eq!(Op::And.fold([D, DBar, X]), Some(Zero));
    /// assert_eq!(Op::And.fold([X, D, DBar]), Some(Zero));
    /// assert_eq!(Op::Or.fold(std::iter::empty()), None);
    /// ```
    pub fn fold<I: IntoIterator<Item = Value>>(self, values: I) -> Option<Value> {
        let mut values = values.into_iter();
        let first = values.next()?;
        let (good, faulty) = values.fold((first.good(), first.faulty()), |(g, f), v| {
            (self.accumulate(g, v.good()), self.accumulate(f, v.faulty()))
        });
        Some(Value::from_components(good, faulty))
    }
}

/// Combines `values` with `op`, see [Op::fold].
pub fn combine<I: IntoIterator<Item = Value>>(op: Op, values: I) -> Option<Value> {
    op.fold(values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_invert_is_involution() {
        for v in Value::iter() {
            assert_eq!(v.invert().invert(), v);
        }
        assert_eq!(Zero.invert(), One);
        assert_eq!(X.invert(), X);
    }

    #[test]
    fn test_tables_are_commutative() {
        for op in [Op::And, Op::Or, Op::Xor] {
            for a in Value::iter() {
                for b in Value::iter() {
                    assert_eq!(op.apply(a, b), op.apply(b, a), "{} {} {}", op, a, b);
                }
            }
        }
    }

    #[test]
    fn test_fold_matches_table_for_pairs() {
        for op in [Op::And, Op::Or, Op::Xor] {
            for a in Value::iter() {
                for b in Value::iter() {
                    assert_eq!(op.fold([a, b]), Some(op.apply(a, b)));
                }
            }
        }
    }

    #[test]
    fn test_fold_single() {
        assert_eq!(Op::Xor.fold([D]), Some(D));
        assert_eq!(combine(Op::Or, [X]), Some(X));
    }

    #[test]
    fn test_fold_is_order_independent() {
        for op in [Op::And, Op::Or, Op::Xor] {
            for a in Value::iter() {
                for b in Value::iter() {
                    for c in Value::iter() {
                        let reference = op.fold([a, b, c]);
                        assert_eq!(op.fold([a, c, b]), reference);
                        assert_eq!(op.fold([b, a, c]), reference);
                        assert_eq!(op.fold([b, c, a]), reference);
                        assert_eq!(op.fold([c, a, b]), reference);
                        assert_eq!(op.fold([c, b, a]), reference);
                    }
                }
            }
        }
    }

    #[test]
    fn test_components_round_trip() {
        for v in Value::iter() {
            assert_eq!(Value::from_components(v.good(), v.faulty()), v);
        }
    }

    #[test]
    fn test_op_from_name() {
        assert_eq!(Op::from_name("XOR").unwrap(), Op::Xor);
        assert_eq!(Op::from_name("Or").unwrap(), Op::Or);
        assert!(matches!(
            Op::from_name("NOT"),
            Err(Error::InvalidOperation(name)) if name == "NOT"
        ));
    }

    #[test]
    fn test_display_and_parse() {
        assert_eq!(DBar.to_string(), "D_b");
        assert_eq!(DBar.name(), "D_b");
        assert_eq!(Zero.name(), "Zero");
        for v in Value::iter() {
            assert_eq!(v.to_string().parse::<Value>().unwrap(), v);
        }
        assert!(matches!("2".parse::<Value>(), Err(Error::InvalidValue(v)) if v == "2"));
        assert!(matches!(" q ".parse::<Value>(), Err(Error::InvalidValue(v)) if v == "q"));
    }

    #[test]
    fn test_from_char() {
        assert_eq!(Value::from_char('x'), Some(X));
        assert_eq!(Value::from_char('1'), Some(One));
        assert_eq!(Value::from_char('2'), None);
    }

    #[test]
    fn test_try_from_integer() {
        assert_eq!(Value::try_from(3u8).unwrap(), DBar);
        assert!(Value::try_from(5u8).is_err());
        assert_eq!(u8::from(X), 4);
    }
}

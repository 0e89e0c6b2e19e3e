// Decoded term values.
//
// `Term` is the closed set of values the decoders produce. Derived
// `PartialEq` compares variant-for-variant; `Term::matches` is the
// structural equality callers want, where an `Int64` and a `BigInt`
// holding the same integer are equal.

use std::fmt;

use num_bigint::BigInt;
use num_traits::ToPrimitive;

/// A decoded external-format value.
#[derive(Debug, Clone, PartialEq)]
pub enum Term {
    /// Any integer representable in 64 bits.
    Int64(i64),
    /// Integer decoded from a bignum record once the magnitude needed more
    /// than eight digits.
    BigInt(BigInt),
    /// IEEE-754 double.
    Float(f64),
    /// Non-empty sequence with an explicit tail, `Nil` for proper lists.
    List { elements: Vec<Term>, tail: Box<Term> },
    /// The empty list.
    Nil,
}

/// Returned by [`Term::to_integer`] for non-integer terms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("{0} is not an integer")]
pub struct NotAnInteger(pub &'static str);

impl Term {
    /// Build a proper list. An empty `elements` gives [`Term::Nil`].
    pub fn list(elements: Vec<Term>) -> Term {
        Term::improper_list(elements, Term::Nil)
    }

    /// Build a list with an explicit tail. An empty `elements` gives `tail`.
    pub fn improper_list(elements: Vec<Term>, tail: Term) -> Term {
        if elements.is_empty() {
            return tail;
        }
        Term::List {
            elements,
            tail: Box::new(tail),
        }
    }

    /// Short variant name, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Term::Int64(_) => "int64",
            Term::BigInt(_) => "bigint",
            Term::Float(_) => "float",
            Term::List { .. } => "list",
            Term::Nil => "nil",
        }
    }

    pub fn is_integer(&self) -> bool {
        matches!(self, Term::Int64(_) | Term::BigInt(_))
    }

    pub fn is_list(&self) -> bool {
        matches!(self, Term::List { .. } | Term::Nil)
    }

    pub fn is_nil(&self) -> bool {
        matches!(self, Term::Nil)
    }

    /// Widen an integer term to arbitrary precision.
    pub fn to_integer(&self) -> Result<BigInt, NotAnInteger> {
        match self {
            Term::Int64(v) => Ok(BigInt::from(*v)),
            Term::BigInt(v) => Ok(v.clone()),
            other => Err(NotAnInteger(other.kind())),
        }
    }

    /// The integer value if it fits in an `i64`, whatever the variant.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Term::Int64(v) => Some(*v),
            Term::BigInt(v) => v.to_i64(),
            _ => None,
        }
    }

    /// Elements of a list term; `Nil` has none.
    pub fn elements(&self) -> Option<&[Term]> {
        match self {
            Term::List { elements, .. } => Some(elements),
            Term::Nil => Some(&[]),
            _ => None,
        }
    }

    /// Element count of a list term, not counting the tail.
    pub fn list_len(&self) -> Option<usize> {
        self.elements().map(<[Term]>::len)
    }

    /// Structural equality.
    ///
    /// Integers compare by value across `Int64`/`BigInt`. Floats use `==`,
    /// so NaN never matches. Lists match element-wise and on their tails.
    pub fn matches(&self, other: &Term) -> bool {
        match (self, other) {
            (Term::Int64(a), Term::Int64(b)) => a == b,
            (Term::BigInt(a), Term::BigInt(b)) => a == b,
            (Term::Int64(a), Term::BigInt(b)) | (Term::BigInt(b), Term::Int64(a)) => {
                b.to_i64() == Some(*a)
            }
            (Term::Float(a), Term::Float(b)) => a == b,
            (
                Term::List {
                    elements: ea,
                    tail: ta,
                },
                Term::List {
                    elements: eb,
                    tail: tb,
                },
            ) => {
                ea.len() == eb.len()
                    && ea.iter().zip(eb).all(|(a, b)| a.matches(b))
                    && ta.matches(tb)
            }
            (Term::Nil, Term::Nil) => true,
            _ => false,
        }
    }
}

impl From<i64> for Term {
    fn from(v: i64) -> Self {
        Term::Int64(v)
    }
}

impl From<BigInt> for Term {
    fn from(v: BigInt) -> Self {
        Term::BigInt(v)
    }
}

impl From<f64> for Term {
    fn from(v: f64) -> Self {
        Term::Float(v)
    }
}

/// Erlang notation: `[1,2|3]`, `[]`, `1.5`.
impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::Int64(v) => write!(f, "{v}"),
            Term::BigInt(v) => write!(f, "{v}"),
            Term::Float(v) => write!(f, "{v:?}"),
            Term::Nil => f.write_str("[]"),
            Term::List { elements, tail } => {
                f.write_str("[")?;
                for (i, e) in elements.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{e}")?;
                }
                if !tail.is_nil() {
                    write!(f, "|{tail}")?;
                }
                f.write_str("]")
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn big(v: i128) -> Term {
        Term::BigInt(BigInt::from(v))
    }

    #[test]
    fn from_conversions_pick_the_variant() {
        assert_eq!(Term::from(-7i64), Term::Int64(-7));
        assert_eq!(Term::from(BigInt::from(7)), big(7));
        assert_eq!(Term::from(2.5), Term::Float(2.5));
        assert!(Term::from(7i64).matches(&Term::from(BigInt::from(7))));
    }

    #[test]
    fn integers_match_across_variants() {
        for n in [0i64, 1, -1, 255, i32::MAX as i64, i64::MIN, i64::MAX] {
            assert!(Term::Int64(n).matches(&big(n as i128)), "{n}");
            assert!(big(n as i128).matches(&Term::Int64(n)), "{n}");
        }
        assert!(!Term::Int64(1).matches(&big(2)));
        assert!(!Term::Int64(-1).matches(&big(u64::MAX as i128)));
    }

    #[test]
    fn integers_never_match_floats() {
        assert!(!Term::Int64(0).matches(&Term::Float(0.0)));
        assert!(!Term::Float(1.0).matches(&big(1)));
    }

    #[test]
    fn float_matching_uses_native_equality() {
        assert!(Term::Float(1.5).matches(&Term::Float(1.5)));
        assert!(Term::Float(0.0).matches(&Term::Float(-0.0)));
        assert!(!Term::Float(f64::NAN).matches(&Term::Float(f64::NAN)));
    }

    #[test]
    fn lists_match_structurally() {
        let a = Term::list(vec![Term::Int64(1), big(2)]);
        let b = Term::list(vec![big(1), Term::Int64(2)]);
        assert!(a.matches(&b));

        let shorter = Term::list(vec![Term::Int64(1)]);
        assert!(!a.matches(&shorter));

        let improper = Term::improper_list(vec![Term::Int64(1), Term::Int64(2)], Term::Int64(3));
        assert!(!a.matches(&improper));
        assert!(improper.matches(&improper.clone()));
    }

    #[test]
    fn nil_matches_only_nil() {
        assert!(Term::Nil.matches(&Term::Nil));
        assert!(!Term::Nil.matches(&Term::Int64(0)));
        assert!(!Term::Nil.matches(&Term::list(vec![Term::Int64(0)])));
    }

    #[test]
    fn empty_list_is_nil() {
        assert_eq!(Term::list(Vec::new()), Term::Nil);
        assert_eq!(Term::Nil.list_len(), Some(0));
        assert!(Term::Nil.is_list());
    }

    #[test]
    fn to_integer_widens() {
        assert_eq!(Term::Int64(-7).to_integer().unwrap(), BigInt::from(-7));
        assert_eq!(big(1 << 70).to_integer().unwrap(), BigInt::from(1i128 << 70));
        assert_eq!(Term::Float(1.0).to_integer(), Err(NotAnInteger("float")));
        assert_eq!(Term::Nil.to_integer(), Err(NotAnInteger("nil")));
    }

    #[test]
    fn as_i64_narrows_when_possible() {
        assert_eq!(big(42).as_i64(), Some(42));
        assert_eq!(big(1 << 64).as_i64(), None);
        assert_eq!(Term::Float(1.0).as_i64(), None);
    }

    #[test]
    fn display_uses_erlang_notation() {
        let list = Term::list(vec![Term::Int64(104), Term::Int64(105)]);
        assert_eq!(list.to_string(), "[104,105]");
        let improper = Term::improper_list(vec![Term::Int64(1)], Term::Int64(2));
        assert_eq!(improper.to_string(), "[1|2]");
        assert_eq!(Term::Nil.to_string(), "[]");
        assert_eq!(Term::Float(0.0).to_string(), "0.0");
        assert_eq!(big(-(1 << 70)).to_string(), "-1180591620717411303424");
    }
}

use kopi_hir::{BinaryOp, PrimitiveType};
use kopi_types::Type;

use crate::heap::ObjectRef;

/// A runtime value.
///
/// Strings and exceptions are ordinary heap objects; see [`crate::Heap`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Value {
    Null,
    /// Result of a `void` call.
    Void,
    Boolean(bool),
    Byte(i8),
    Short(i16),
    Char(u16),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    Object(ObjectRef),
}

impl Value {
    /// Default value of a field or local of type `ty`.
    #[must_use]
    pub fn zero(ty: &Type) -> Value {
        match ty.as_primitive() {
            Some(PrimitiveType::Boolean) => Value::Boolean(false),
            Some(PrimitiveType::Byte) => Value::Byte(0),
            Some(PrimitiveType::Short) => Value::Short(0),
            Some(PrimitiveType::Char) => Value::Char(0),
            Some(PrimitiveType::Int) => Value::Int(0),
            Some(PrimitiveType::Long) => Value::Long(0),
            Some(PrimitiveType::Float) => Value::Float(0.0),
            Some(PrimitiveType::Double) => Value::Double(0.0),
            None => Value::Null,
        }
    }

    #[must_use]
    pub fn as_int(&self) -> Option<i32> {
        match *self {
            Value::Int(value) => Some(value),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match *self {
            Value::Boolean(value) => Some(value),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_object(&self) -> Option<ObjectRef> {
        match *self {
            Value::Object(object) => Some(object),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Convert a primitive to the primitive type of a variable it is stored into.
    ///
    /// Reference values and booleans pass through unchanged.
    #[must_use]
    pub fn coerce(self, ty: &Type) -> Value {
        match (ty.as_primitive(), self.numeric()) {
            (Some(to), Some(num)) => num.convert(to).unwrap_or(self),
            _ => self,
        }
    }

    /// The value after unary numeric promotion, if it is numeric.
    pub(crate) fn numeric(&self) -> Option<Num> {
        match *self {
            Value::Byte(v) => Some(Num::Int(v.into())),
            Value::Short(v) => Some(Num::Int(v.into())),
            Value::Char(v) => Some(Num::Int(v.into())),
            Value::Int(v) => Some(Num::Int(v)),
            Value::Long(v) => Some(Num::Long(v)),
            Value::Float(v) => Some(Num::Float(v)),
            Value::Double(v) => Some(Num::Double(v)),
            Value::Null | Value::Void | Value::Boolean(_) | Value::Object(_) => None,
        }
    }
}

/// A promoted numeric operand.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) enum Num {
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
}

/// Both operands of a binary operation after binary numeric promotion.
enum Pair {
    Int(i32, i32),
    Long(i64, i64),
    Float(f32, f32),
    Double(f64, f64),
}

impl Num {
    fn as_i64(self) -> i64 {
        match self {
            Num::Int(v) => v.into(),
            Num::Long(v) => v,
            Num::Float(v) => v as i64,
            Num::Double(v) => v as i64,
        }
    }

    fn as_f32(self) -> f32 {
        match self {
            Num::Int(v) => v as f32,
            Num::Long(v) => v as f32,
            Num::Float(v) => v,
            Num::Double(v) => v as f32,
        }
    }

    fn as_f64(self) -> f64 {
        match self {
            Num::Int(v) => v.into(),
            Num::Long(v) => v as f64,
            Num::Float(v) => v.into(),
            Num::Double(v) => v,
        }
    }

    fn as_i32(self) -> i32 {
        match self {
            Num::Int(v) => v,
            Num::Long(v) => v as i32,
            Num::Float(v) => v as i32,
            Num::Double(v) => v as i32,
        }
    }

    /// Casting conversion; floating-point to integral saturates and maps NaN to zero.
    fn convert(self, to: PrimitiveType) -> Option<Value> {
        let value = match to {
            PrimitiveType::Boolean => return None,
            PrimitiveType::Byte => Value::Byte(self.as_i32() as i8),
            PrimitiveType::Short => Value::Short(self.as_i32() as i16),
            PrimitiveType::Char => Value::Char(self.as_i32() as u16),
            PrimitiveType::Int => Value::Int(self.as_i32()),
            PrimitiveType::Long => Value::Long(self.as_i64()),
            PrimitiveType::Float => Value::Float(self.as_f32()),
            PrimitiveType::Double => Value::Double(self.as_f64()),
        };
        Some(value)
    }

    pub(crate) fn negate(self) -> Value {
        match self {
            Num::Int(v) => Value::Int(v.wrapping_neg()),
            Num::Long(v) => Value::Long(v.wrapping_neg()),
            Num::Float(v) => Value::Float(-v),
            Num::Double(v) => Value::Double(-v),
        }
    }
}

fn promote(lhs: Num, rhs: Num) -> Pair {
    match (lhs, rhs) {
        (Num::Double(_), _) | (_, Num::Double(_)) => Pair::Double(lhs.as_f64(), rhs.as_f64()),
        (Num::Float(_), _) | (_, Num::Float(_)) => Pair::Float(lhs.as_f32(), rhs.as_f32()),
        (Num::Long(_), _) | (_, Num::Long(_)) => Pair::Long(lhs.as_i64(), rhs.as_i64()),
        (Num::Int(a), Num::Int(b)) => Pair::Int(a, b),
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum ArithmeticFault {
    /// Integral `/` or `%` with a zero divisor.
    DivideByZero,
    /// `op` is not an arithmetic operator.
    Unsupported,
}

/// `+ - * / %` on promoted operands; integral arithmetic wraps.
pub(crate) fn arithmetic(op: BinaryOp, lhs: Num, rhs: Num) -> Result<Value, ArithmeticFault> {
    let value = match promote(lhs, rhs) {
        Pair::Int(a, b) => Value::Int(match op {
            BinaryOp::Add => a.wrapping_add(b),
            BinaryOp::Sub => a.wrapping_sub(b),
            BinaryOp::Mul => a.wrapping_mul(b),
            BinaryOp::Div | BinaryOp::Rem if b == 0 => return Err(ArithmeticFault::DivideByZero),
            BinaryOp::Div => a.wrapping_div(b),
            BinaryOp::Rem => a.wrapping_rem(b),
            _ => return Err(ArithmeticFault::Unsupported),
        }),
        Pair::Long(a, b) => Value::Long(match op {
            BinaryOp::Add => a.wrapping_add(b),
            BinaryOp::Sub => a.wrapping_sub(b),
            BinaryOp::Mul => a.wrapping_mul(b),
            BinaryOp::Div | BinaryOp::Rem if b == 0 => return Err(ArithmeticFault::DivideByZero),
            BinaryOp::Div => a.wrapping_div(b),
            BinaryOp::Rem => a.wrapping_rem(b),
            _ => return Err(ArithmeticFault::Unsupported),
        }),
        Pair::Float(a, b) => Value::Float(match op {
            BinaryOp::Add => a + b,
            BinaryOp::Sub => a - b,
            BinaryOp::Mul => a * b,
            BinaryOp::Div => a / b,
            BinaryOp::Rem => a % b,
            _ => return Err(ArithmeticFault::Unsupported),
        }),
        Pair::Double(a, b) => Value::Double(match op {
            BinaryOp::Add => a + b,
            BinaryOp::Sub => a - b,
            BinaryOp::Mul => a * b,
            BinaryOp::Div => a / b,
            BinaryOp::Rem => a % b,
            _ => return Err(ArithmeticFault::Unsupported),
        }),
    };
    Ok(value)
}

/// Numeric comparison; every ordered comparison involving NaN is false.
pub(crate) fn compare(op: BinaryOp, lhs: Num, rhs: Num) -> bool {
    use std::cmp::Ordering;

    let ordering = match promote(lhs, rhs) {
        Pair::Int(a, b) => Some(a.cmp(&b)),
        Pair::Long(a, b) => Some(a.cmp(&b)),
        Pair::Float(a, b) => a.partial_cmp(&b),
        Pair::Double(a, b) => a.partial_cmp(&b),
    };
    let Some(ordering) = ordering else {
        return op == BinaryOp::Ne;
    };
    match op {
        BinaryOp::Eq => ordering == Ordering::Equal,
        BinaryOp::Ne => ordering != Ordering::Equal,
        BinaryOp::Lt => ordering == Ordering::Less,
        BinaryOp::Le => ordering != Ordering::Greater,
        BinaryOp::Gt => ordering == Ordering::Greater,
        BinaryOp::Ge => ordering != Ordering::Less,
        _ => false,
    }
}

/// Decimal rendering used by string concatenation.
pub(crate) fn display_float<F>(value: F) -> String
where
    F: Into<f64> + std::fmt::Display + Copy,
{
    let wide: f64 = value.into();
    if wide.is_nan() {
        "NaN".to_string()
    } else if wide.is_infinite() {
        if wide > 0.0 { "Infinity" } else { "-Infinity" }.to_string()
    } else if wide.fract() == 0.0 && wide.abs() < 1e7 {
        format!("{wide:.1}")
    } else {
        value.to_string()
    }
}

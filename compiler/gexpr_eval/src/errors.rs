//! Evaluation errors.
//!
//! Leaf operations have no tree node in scope and produce an [`IntError`]
//! carrying only an [`ErrorKind`]. The tree walker attaches the span of the
//! node being evaluated ([`IntError::at`]), and the public entry points
//! resolve that span to a [`Position`] for the final [`Error`].
//!
//! All constructors live here so message wording stays in one place.

use std::fmt;

use gexpr_ir::{Position, SourceMap, Span};
use gexpr_rt::ConstError;
use thiserror::Error as ThisError;

/// Category and message of an evaluation failure.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum ErrorKind {
    // Names and environment
    #[error("undefined: {name}")]
    Undefined { name: String },
    #[error("invalid identifier {name}")]
    InvalidIdentifier { name: String },
    #[error("namespace {name} collides with an existing identifier")]
    NamespaceCollision { name: String },

    // Value categories
    #[error("{value} is not an expression")]
    NotExpr { value: String },
    #[error("{value} is not a type")]
    NotType { value: String },
    #[error("use of untyped nil")]
    UntypedNil,

    // Operators
    #[error("invalid operation: operator {op} not defined on {operand}")]
    OperatorNotDefined { op: String, operand: String },
    #[error("invalid operation: {left} {op} {right} (mismatched types {left_ty} and {right_ty})")]
    MismatchedTypes {
        left: String,
        op: String,
        right: String,
        left_ty: String,
        right_ty: String,
    },
    #[error("invalid operation: {operand} {op} nil")]
    InvalidNilComparison { operand: String, op: String },
    #[error("invalid shift count {count} (must be unsigned integer)")]
    ShiftCount { count: String },
    #[error("invalid operation: shifted operand {operand} must be integer")]
    ShiftOperand { operand: String },
    #[error("cannot take the address of {value}")]
    CannotTakeAddress { value: String },
    #[error("invalid indirect of {value}")]
    InvalidIndirect { value: String },
    #[error("division by zero")]
    DivisionByZero,
    #[error("{0}")]
    Constant(#[from] ConstError),

    // Conversion and assignment
    #[error("constant {value} overflows {ty}")]
    ConstOverflow { value: String, ty: String },
    #[error("cannot convert {value} to type {ty}")]
    CannotConvert { value: String, ty: String },
    #[error("cannot use {value} as type {ty} in {context}")]
    CannotAssign {
        value: String,
        ty: String,
        context: String,
    },

    // Index and slice
    #[error("invalid operation: cannot index {value}")]
    CannotIndex { value: String },
    #[error("invalid argument: index {value} must be integer")]
    IndexNotInteger { value: String },
    #[error("invalid argument: index {index} must not be negative")]
    NegativeIndex { index: i64 },
    #[error("index out of range [{index}] with length {len}")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("cannot slice {value}")]
    CannotSlice { value: String },
    #[error("cannot slice unaddressable value {value}")]
    UnaddressableSlice { value: String },
    #[error("invalid operation: 3-index slice of string")]
    ThreeIndexString,
    #[error("{which} index required in 3-index slice")]
    MissingSliceIndex { which: &'static str },
    #[error("slice bounds out of range [{low}:{high}] with capacity {cap}")]
    SliceBounds { low: usize, high: usize, cap: usize },

    // Calls and selectors
    #[error("invalid operation: cannot call non-function {value}")]
    NotCallable { value: String },
    #[error("wrong number of arguments in call to {callee}: want {want}, got {got}")]
    ArgumentCount {
        callee: String,
        want: String,
        got: usize,
    },
    #[error("invalid use of ... in call to {callee}")]
    InvalidEllipsis { callee: String },
    #[error("{callee} returns {count} values, expected exactly one")]
    ResultCount { callee: String, count: usize },
    #[error("{callee}: {message}")]
    Host { callee: String, message: String },
    #[error("{receiver}.{name} undefined")]
    UndefinedSelector { receiver: String, name: String },
    #[error("invalid selector .{name} on {receiver}")]
    InvalidSelector { receiver: String, name: String },
    #[error("invalid memory address or nil pointer dereference")]
    NilDereference,

    // Built-in functions
    #[error("invalid argument {value} for built-in {builtin}")]
    InvalidBuiltinArg { builtin: &'static str, value: String },
    #[error("invalid operation: {builtin} of mismatched types {left} and {right}")]
    BuiltinMismatch {
        builtin: &'static str,
        left: String,
        right: String,
    },
    #[error("cannot make {ty}; type must be slice, map, or channel")]
    CannotMake { ty: String },
    #[error("invalid argument: {what} {value} must be a non-negative integer")]
    InvalidSize { what: &'static str, value: String },
    #[error("invalid argument: length {len} larger than capacity {cap}")]
    LenLargerThanCap { len: usize, cap: usize },
    #[error("{what} is too large to allocate")]
    TooLarge { what: String },

    // Composite literals and type expressions
    #[error("invalid composite literal type {ty}")]
    InvalidCompositeType { ty: String },
    #[error("mixture of field:value and value elements in struct literal")]
    MixedStructLiteral,
    #[error("invalid field name {name} in struct literal")]
    InvalidFieldName { name: String },
    #[error("unknown field {field} in struct literal of type {ty}")]
    UnknownField { field: String, ty: String },
    #[error("duplicate field name {field} in struct literal")]
    DuplicateLiteralField { field: String },
    #[error("assignment to unexported field {field} in struct literal of type {ty}")]
    UnexportedField { field: String, ty: String },
    #[error("wrong number of values in struct literal of type {ty}: want {want}, got {got}")]
    StructValueCount { ty: String, want: usize, got: usize },
    #[error("index {index} must be non-negative integer constant")]
    InvalidLiteralIndex { index: String },
    #[error("duplicate index {index} in array or slice literal")]
    DuplicateIndex { index: usize },
    #[error("index {index} out of bounds [0:{len}]")]
    LiteralIndexOutOfBounds { index: usize, len: usize },
    #[error("missing key in map literal")]
    MissingKey,
    #[error("array length {value} must be a non-negative integer constant")]
    InvalidArrayLen { value: String },
    #[error("invalid use of [...] array outside a composite literal")]
    EllipsisArrayOutsideLiteral,
    #[error("can only use ... with final parameter in list")]
    VariadicPosition,
    #[error("duplicate field {field} in struct type")]
    DuplicateField { field: String },
    #[error("invalid map key type {ty}")]
    InvalidMapKey { ty: String },

    // Type assertions
    #[error("invalid operation: {value} is not an interface")]
    NotInterface { value: String },
    #[error("impossible type assertion: {ty} does not implement {iface}")]
    ImpossibleAssertion { ty: String, iface: String },
    #[error("interface conversion: {iface} is {dynamic}, not {ty}")]
    AssertionFailed {
        iface: String,
        dynamic: String,
        ty: String,
    },

    // Everything else
    #[error("runtime error: {0}")]
    Runtime(String),
    #[error("{feature} is not supported")]
    Unsupported { feature: String },
    #[error("syntax error: {0}")]
    Syntax(String),
    #[error("BUG: unhandled panic {0:?}, please report")]
    Internal(String),
}

/// Error produced below the tree walker, before a position is known.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IntError {
    pub kind: ErrorKind,
}

/// Result of a leaf operation.
pub type IntResult<T> = Result<T, IntError>;

impl IntError {
    #[cold]
    pub fn new(kind: ErrorKind) -> Self {
        IntError { kind }
    }

    /// Attach the span of the node that produced this error.
    #[cold]
    pub fn at(self, span: Span) -> PosError {
        PosError {
            kind: self.kind,
            span: Some(span),
        }
    }

    /// Error with no related node (environment setup).
    #[cold]
    pub fn no_pos(self) -> PosError {
        PosError {
            kind: self.kind,
            span: None,
        }
    }
}

impl From<ConstError> for IntError {
    #[cold]
    fn from(err: ConstError) -> Self {
        IntError::new(ErrorKind::Constant(err))
    }
}

/// Error with the span of the node that produced it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PosError {
    pub kind: ErrorKind,
    pub span: Option<Span>,
}

impl PosError {
    pub fn resolve(self, map: &SourceMap) -> Error {
        Error {
            position: self.span.map(|span| map.position(span)),
            kind: self.kind,
        }
    }
}

/// Public evaluation error: a message and, when known, where it happened.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Error {
    pub kind: ErrorKind,
    pub position: Option<Position>,
}

impl Error {
    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    pub fn position(&self) -> Option<&Position> {
        self.position.as_ref()
    }

    pub fn message(&self) -> String {
        self.kind.to_string()
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.position {
            Some(position) => write!(f, "{position}: {}", self.kind),
            None => write!(f, "-: {}", self.kind),
        }
    }
}

impl std::error::Error for Error {}

fn err(kind: ErrorKind) -> IntError {
    IntError::new(kind)
}

// Names and environment

#[cold]
pub fn undefined(name: &str) -> IntError {
    err(ErrorKind::Undefined {
        name: name.to_string(),
    })
}

#[cold]
pub fn invalid_identifier(name: &str) -> IntError {
    err(ErrorKind::InvalidIdentifier {
        name: name.to_string(),
    })
}

#[cold]
pub fn namespace_collision(name: &str) -> IntError {
    err(ErrorKind::NamespaceCollision {
        name: name.to_string(),
    })
}

// Value categories

#[cold]
pub fn not_expr(value: &impl fmt::Display) -> IntError {
    err(ErrorKind::NotExpr {
        value: value.to_string(),
    })
}

#[cold]
pub fn not_type(value: &impl fmt::Display) -> IntError {
    err(ErrorKind::NotType {
        value: value.to_string(),
    })
}

#[cold]
pub fn untyped_nil() -> IntError {
    err(ErrorKind::UntypedNil)
}

// Operators

#[cold]
pub fn operator_not_defined(op: &impl fmt::Display, operand: &impl fmt::Display) -> IntError {
    err(ErrorKind::OperatorNotDefined {
        op: op.to_string(),
        operand: operand.to_string(),
    })
}

#[cold]
pub fn mismatched_types(
    left: &impl fmt::Display,
    op: &impl fmt::Display,
    right: &impl fmt::Display,
    left_ty: &impl fmt::Display,
    right_ty: &impl fmt::Display,
) -> IntError {
    err(ErrorKind::MismatchedTypes {
        left: left.to_string(),
        op: op.to_string(),
        right: right.to_string(),
        left_ty: left_ty.to_string(),
        right_ty: right_ty.to_string(),
    })
}

#[cold]
pub fn invalid_nil_comparison(operand: &impl fmt::Display, op: &impl fmt::Display) -> IntError {
    err(ErrorKind::InvalidNilComparison {
        operand: operand.to_string(),
        op: op.to_string(),
    })
}

#[cold]
pub fn shift_count(count: &impl fmt::Display) -> IntError {
    err(ErrorKind::ShiftCount {
        count: count.to_string(),
    })
}

#[cold]
pub fn shift_operand(operand: &impl fmt::Display) -> IntError {
    err(ErrorKind::ShiftOperand {
        operand: operand.to_string(),
    })
}

#[cold]
pub fn cannot_take_address(value: &impl fmt::Display) -> IntError {
    err(ErrorKind::CannotTakeAddress {
        value: value.to_string(),
    })
}

#[cold]
pub fn invalid_indirect(value: &impl fmt::Display) -> IntError {
    err(ErrorKind::InvalidIndirect {
        value: value.to_string(),
    })
}

#[cold]
pub fn division_by_zero() -> IntError {
    err(ErrorKind::DivisionByZero)
}

// Conversion and assignment

#[cold]
pub fn const_overflow(value: &impl fmt::Display, ty: &impl fmt::Display) -> IntError {
    err(ErrorKind::ConstOverflow {
        value: value.to_string(),
        ty: ty.to_string(),
    })
}

#[cold]
pub fn cannot_convert(value: &impl fmt::Display, ty: &impl fmt::Display) -> IntError {
    err(ErrorKind::CannotConvert {
        value: value.to_string(),
        ty: ty.to_string(),
    })
}

#[cold]
pub fn cannot_assign(value: &impl fmt::Display, ty: &impl fmt::Display, context: &str) -> IntError {
    err(ErrorKind::CannotAssign {
        value: value.to_string(),
        ty: ty.to_string(),
        context: context.to_string(),
    })
}

// Index and slice

#[cold]
pub fn cannot_index(value: &impl fmt::Display) -> IntError {
    err(ErrorKind::CannotIndex {
        value: value.to_string(),
    })
}

#[cold]
pub fn index_not_integer(value: &impl fmt::Display) -> IntError {
    err(ErrorKind::IndexNotInteger {
        value: value.to_string(),
    })
}

#[cold]
pub fn negative_index(index: i64) -> IntError {
    err(ErrorKind::NegativeIndex { index })
}

#[cold]
pub fn index_out_of_range(index: usize, len: usize) -> IntError {
    err(ErrorKind::IndexOutOfRange { index, len })
}

#[cold]
pub fn cannot_slice(value: &impl fmt::Display) -> IntError {
    err(ErrorKind::CannotSlice {
        value: value.to_string(),
    })
}

#[cold]
pub fn unaddressable_slice(value: &impl fmt::Display) -> IntError {
    err(ErrorKind::UnaddressableSlice {
        value: value.to_string(),
    })
}

#[cold]
pub fn three_index_string() -> IntError {
    err(ErrorKind::ThreeIndexString)
}

#[cold]
pub fn missing_slice_index(which: &'static str) -> IntError {
    err(ErrorKind::MissingSliceIndex { which })
}

#[cold]
pub fn slice_bounds(low: usize, high: usize, cap: usize) -> IntError {
    err(ErrorKind::SliceBounds { low, high, cap })
}

// Calls and selectors

#[cold]
pub fn not_callable(value: &impl fmt::Display) -> IntError {
    err(ErrorKind::NotCallable {
        value: value.to_string(),
    })
}

#[cold]
pub fn argument_count(callee: &impl fmt::Display, want: &impl fmt::Display, got: usize) -> IntError {
    err(ErrorKind::ArgumentCount {
        callee: callee.to_string(),
        want: want.to_string(),
        got,
    })
}

#[cold]
pub fn invalid_ellipsis(callee: &impl fmt::Display) -> IntError {
    err(ErrorKind::InvalidEllipsis {
        callee: callee.to_string(),
    })
}

#[cold]
pub fn result_count(callee: &impl fmt::Display, count: usize) -> IntError {
    err(ErrorKind::ResultCount {
        callee: callee.to_string(),
        count,
    })
}

#[cold]
pub fn host_error(callee: &impl fmt::Display, message: String) -> IntError {
    err(ErrorKind::Host {
        callee: callee.to_string(),
        message,
    })
}

#[cold]
pub fn undefined_selector(receiver: &impl fmt::Display, name: &str) -> IntError {
    err(ErrorKind::UndefinedSelector {
        receiver: receiver.to_string(),
        name: name.to_string(),
    })
}

#[cold]
pub fn invalid_selector(receiver: &impl fmt::Display, name: &str) -> IntError {
    err(ErrorKind::InvalidSelector {
        receiver: receiver.to_string(),
        name: name.to_string(),
    })
}

#[cold]
pub fn nil_dereference() -> IntError {
    err(ErrorKind::NilDereference)
}

// Built-in functions

#[cold]
pub fn invalid_builtin_arg(builtin: &'static str, value: &impl fmt::Display) -> IntError {
    err(ErrorKind::InvalidBuiltinArg {
        builtin,
        value: value.to_string(),
    })
}

#[cold]
pub fn builtin_mismatch(
    builtin: &'static str,
    left: &impl fmt::Display,
    right: &impl fmt::Display,
) -> IntError {
    err(ErrorKind::BuiltinMismatch {
        builtin,
        left: left.to_string(),
        right: right.to_string(),
    })
}

#[cold]
pub fn cannot_make(ty: &impl fmt::Display) -> IntError {
    err(ErrorKind::CannotMake { ty: ty.to_string() })
}

#[cold]
pub fn invalid_size(what: &'static str, value: &impl fmt::Display) -> IntError {
    err(ErrorKind::InvalidSize {
        what,
        value: value.to_string(),
    })
}

#[cold]
pub fn len_larger_than_cap(len: usize, cap: usize) -> IntError {
    err(ErrorKind::LenLargerThanCap { len, cap })
}

#[cold]
pub fn too_large(what: &impl fmt::Display) -> IntError {
    err(ErrorKind::TooLarge {
        what: what.to_string(),
    })
}

// Composite literals and type expressions

#[cold]
pub fn invalid_composite_type(ty: &impl fmt::Display) -> IntError {
    err(ErrorKind::InvalidCompositeType { ty: ty.to_string() })
}

#[cold]
pub fn mixed_struct_literal() -> IntError {
    err(ErrorKind::MixedStructLiteral)
}

#[cold]
pub fn invalid_field_name(name: &impl fmt::Display) -> IntError {
    err(ErrorKind::InvalidFieldName {
        name: name.to_string(),
    })
}

#[cold]
pub fn unknown_field(field: &str, ty: &impl fmt::Display) -> IntError {
    err(ErrorKind::UnknownField {
        field: field.to_string(),
        ty: ty.to_string(),
    })
}

#[cold]
pub fn duplicate_literal_field(field: &str) -> IntError {
    err(ErrorKind::DuplicateLiteralField {
        field: field.to_string(),
    })
}

#[cold]
pub fn unexported_field(field: &str, ty: &impl fmt::Display) -> IntError {
    err(ErrorKind::UnexportedField {
        field: field.to_string(),
        ty: ty.to_string(),
    })
}

#[cold]
pub fn struct_value_count(ty: &impl fmt::Display, want: usize, got: usize) -> IntError {
    err(ErrorKind::StructValueCount {
        ty: ty.to_string(),
        want,
        got,
    })
}

#[cold]
pub fn invalid_literal_index(index: &impl fmt::Display) -> IntError {
    err(ErrorKind::InvalidLiteralIndex {
        index: index.to_string(),
    })
}

#[cold]
pub fn duplicate_index(index: usize) -> IntError {
    err(ErrorKind::DuplicateIndex { index })
}

#[cold]
pub fn literal_index_out_of_bounds(index: usize, len: usize) -> IntError {
    err(ErrorKind::LiteralIndexOutOfBounds { index, len })
}

#[cold]
pub fn missing_key() -> IntError {
    err(ErrorKind::MissingKey)
}

#[cold]
pub fn invalid_array_len(value: &impl fmt::Display) -> IntError {
    err(ErrorKind::InvalidArrayLen {
        value: value.to_string(),
    })
}

#[cold]
pub fn ellipsis_array_outside_literal() -> IntError {
    err(ErrorKind::EllipsisArrayOutsideLiteral)
}

#[cold]
pub fn variadic_position() -> IntError {
    err(ErrorKind::VariadicPosition)
}

#[cold]
pub fn duplicate_field(field: &str) -> IntError {
    err(ErrorKind::DuplicateField {
        field: field.to_string(),
    })
}

#[cold]
pub fn invalid_map_key(ty: &impl fmt::Display) -> IntError {
    err(ErrorKind::InvalidMapKey { ty: ty.to_string() })
}

// Type assertions

#[cold]
pub fn not_interface(value: &impl fmt::Display) -> IntError {
    err(ErrorKind::NotInterface {
        value: value.to_string(),
    })
}

#[cold]
pub fn impossible_assertion(ty: &impl fmt::Display, iface: &impl fmt::Display) -> IntError {
    err(ErrorKind::ImpossibleAssertion {
        ty: ty.to_string(),
        iface: iface.to_string(),
    })
}

#[cold]
pub fn assertion_failed(
    iface: &impl fmt::Display,
    dynamic: &impl fmt::Display,
    ty: &impl fmt::Display,
) -> IntError {
    err(ErrorKind::AssertionFailed {
        iface: iface.to_string(),
        dynamic: dynamic.to_string(),
        ty: ty.to_string(),
    })
}

// Everything else

#[cold]
pub fn runtime(message: String) -> IntError {
    err(ErrorKind::Runtime(message))
}

#[cold]
pub fn unsupported(feature: &str) -> IntError {
    err(ErrorKind::Unsupported {
        feature: feature.to_string(),
    })
}

//! Runtime type descriptors.
//!
//! A [`Type`] is a cheap, shareable handle describing a type the way the
//! host language's reflection would: a [`Kind`], an optional name, a shape
//! (element, key, fields, signature, ...) and, for named types, a method
//! set. Everything the evaluator needs to know about a type is answered by
//! probing a descriptor: `kind()`, `method_by_name`, `field_by_name`,
//! `assignable_to`, `convertible_to`.
//!
//! # Identity
//!
//! Named types are identical only to themselves (pointer identity of the
//! shared descriptor). Unnamed types are identical when structurally
//! identical. Predeclared types such as `int` are named process-wide
//! singletons, so `Type::int() == Type::int()` while a user type declared
//! as `type myInt int` is distinct from both.

use std::fmt;
use std::sync::{Arc, LazyLock};

use bitflags::bitflags;
use smallvec::SmallVec;

use crate::value::NativeFn;

/// Category of a type, independent of its name.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Kind {
    Bool,
    Int,
    Int8,
    Int16,
    Int32,
    Int64,
    Uint,
    Uint8,
    Uint16,
    Uint32,
    Uint64,
    Uintptr,
    Float32,
    Float64,
    Complex64,
    Complex128,
    String,
    Array,
    Slice,
    Map,
    Chan,
    Func,
    Ptr,
    Struct,
    Interface,
}

impl Kind {
    pub fn name(self) -> &'static str {
        match self {
            Kind::Bool => "bool",
            Kind::Int => "int",
            Kind::Int8 => "int8",
            Kind::Int16 => "int16",
            Kind::Int32 => "int32",
            Kind::Int64 => "int64",
            Kind::Uint => "uint",
            Kind::Uint8 => "uint8",
            Kind::Uint16 => "uint16",
            Kind::Uint32 => "uint32",
            Kind::Uint64 => "uint64",
            Kind::Uintptr => "uintptr",
            Kind::Float32 => "float32",
            Kind::Float64 => "float64",
            Kind::Complex64 => "complex64",
            Kind::Complex128 => "complex128",
            Kind::String => "string",
            Kind::Array => "array",
            Kind::Slice => "slice",
            Kind::Map => "map",
            Kind::Chan => "chan",
            Kind::Func => "func",
            Kind::Ptr => "ptr",
            Kind::Struct => "struct",
            Kind::Interface => "interface",
        }
    }

    pub fn is_signed_int(self) -> bool {
        matches!(
            self,
            Kind::Int | Kind::Int8 | Kind::Int16 | Kind::Int32 | Kind::Int64
        )
    }

    pub fn is_unsigned_int(self) -> bool {
        matches!(
            self,
            Kind::Uint | Kind::Uint8 | Kind::Uint16 | Kind::Uint32 | Kind::Uint64 | Kind::Uintptr
        )
    }

    pub fn is_integer(self) -> bool {
        self.is_signed_int() || self.is_unsigned_int()
    }

    pub fn is_float(self) -> bool {
        matches!(self, Kind::Float32 | Kind::Float64)
    }

    pub fn is_complex(self) -> bool {
        matches!(self, Kind::Complex64 | Kind::Complex128)
    }

    pub fn is_numeric(self) -> bool {
        self.is_integer() || self.is_float() || self.is_complex()
    }

    /// Kinds a constant may be bound to.
    pub fn is_basic(self) -> bool {
        self.is_numeric() || matches!(self, Kind::Bool | Kind::String)
    }

    /// Kinds whose zero value is `nil`.
    pub fn is_nilable(self) -> bool {
        matches!(
            self,
            Kind::Slice | Kind::Ptr | Kind::Func | Kind::Interface | Kind::Map | Kind::Chan
        )
    }

    /// Kinds supporting `<`, `<=`, `>`, `>=`.
    pub fn is_ordered(self) -> bool {
        self.is_integer() || self.is_float() || self == Kind::String
    }

    /// Storage width in bits for numeric kinds, 0 otherwise.
    pub fn bits(self) -> u32 {
        match self {
            Kind::Int8 | Kind::Uint8 => 8,
            Kind::Int16 | Kind::Uint16 => 16,
            Kind::Int32 | Kind::Uint32 | Kind::Float32 => 32,
            Kind::Int
            | Kind::Int64
            | Kind::Uint
            | Kind::Uint64
            | Kind::Uintptr
            | Kind::Float64
            | Kind::Complex64 => 64,
            Kind::Complex128 => 128,
            _ => 0,
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

bitflags! {
    /// Channel direction.
    #[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
    pub struct ChanDir: u8 {
        const RECV = 1 << 0;
        const SEND = 1 << 1;
        const BOTH = Self::RECV.bits() | Self::SEND.bits();
    }
}

/// Function signature. A variadic signature's last parameter is the slice
/// type `[]T`.
#[derive(Clone, Debug)]
pub struct Signature {
    pub params: Vec<Type>,
    pub results: Vec<Type>,
    pub variadic: bool,
}

impl Signature {
    pub fn new(params: Vec<Type>, results: Vec<Type>, variadic: bool) -> Self {
        Signature {
            params,
            results,
            variadic,
        }
    }

    fn identical(&self, other: &Signature) -> bool {
        self.variadic == other.variadic && self.params == other.params && self.results == other.results
    }

    fn write(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("(")?;
        for (i, param) in self.params.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            match param.elem() {
                Some(elem) if self.variadic && i + 1 == self.params.len() => write!(f, "...{elem}")?,
                _ => write!(f, "{param}")?,
            }
        }
        f.write_str(")")?;
        match self.results.as_slice() {
            [] => Ok(()),
            [single] => write!(f, " {single}"),
            many => {
                f.write_str(" (")?;
                for (i, result) in many.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{result}")?;
                }
                f.write_str(")")
            }
        }
    }
}

/// Struct field.
#[derive(Clone, Debug)]
pub struct Field {
    pub name: String,
    pub ty: Type,
    pub tag: String,
    pub embedded: bool,
}

impl Field {
    pub fn new(name: impl Into<String>, ty: Type) -> Self {
        Field {
            name: name.into(),
            ty,
            tag: String::new(),
            embedded: false,
        }
    }

    /// Embedded field, named after its (pointer-stripped) type.
    pub fn embedded(ty: Type) -> Self {
        let base = match ty.shape() {
            Shape::Ptr(elem) => elem.clone(),
            _ => ty.clone(),
        };
        let name = base.name().map_or_else(
            || base.to_string(),
            |n| n.rsplit('.').next().unwrap_or(n).to_string(),
        );
        Field {
            name,
            ty,
            tag: String::new(),
            embedded: true,
        }
    }

    #[must_use]
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = tag.into();
        self
    }

    /// Exported fields start with an upper-case letter.
    pub fn is_exported(&self) -> bool {
        self.name.chars().next().is_some_and(char::is_uppercase)
    }

    fn identical(&self, other: &Field) -> bool {
        self.name == other.name
            && self.embedded == other.embedded
            && self.tag == other.tag
            && self.ty == other.ty
    }
}

/// Method declared by an interface type.
#[derive(Clone, Debug)]
pub struct InterfaceMethod {
    pub name: String,
    pub sig: Signature,
}

impl InterfaceMethod {
    pub fn new(name: impl Into<String>, sig: Signature) -> Self {
        InterfaceMethod {
            name: name.into(),
            sig,
        }
    }
}

/// Method attached to a named type. The host function receives the
/// receiver as its first argument.
#[derive(Clone)]
pub struct Method {
    pub name: String,
    pub sig: Signature,
    pub pointer_receiver: bool,
    pub func: NativeFn,
}

impl Method {
    /// Method with a value receiver.
    pub fn new(name: impl Into<String>, sig: Signature, func: NativeFn) -> Self {
        Method {
            name: name.into(),
            sig,
            pointer_receiver: false,
            func,
        }
    }

    /// Method with a pointer receiver; only in the method set of `*T`.
    pub fn pointer(name: impl Into<String>, sig: Signature, func: NativeFn) -> Self {
        Method {
            pointer_receiver: true,
            ..Method::new(name, sig, func)
        }
    }
}

impl fmt::Debug for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Method")
            .field("name", &self.name)
            .field("sig", &self.sig)
            .field("pointer_receiver", &self.pointer_receiver)
            .finish_non_exhaustive()
    }
}

/// Structure of a type, shared by a named type and its underlying type.
#[derive(Clone, Debug)]
pub enum Shape {
    Basic(Kind),
    Array { len: usize, elem: Type },
    Slice(Type),
    Map { key: Type, elem: Type },
    Chan { dir: ChanDir, elem: Type },
    Func(Signature),
    Ptr(Type),
    Struct(Vec<Field>),
    Interface(Vec<InterfaceMethod>),
}

impl Shape {
    fn kind(&self) -> Kind {
        match self {
            Shape::Basic(kind) => *kind,
            Shape::Array { .. } => Kind::Array,
            Shape::Slice(_) => Kind::Slice,
            Shape::Map { .. } => Kind::Map,
            Shape::Chan { .. } => Kind::Chan,
            Shape::Func(_) => Kind::Func,
            Shape::Ptr(_) => Kind::Ptr,
            Shape::Struct(_) => Kind::Struct,
            Shape::Interface(_) => Kind::Interface,
        }
    }

    fn identical(&self, other: &Shape) -> bool {
        match (self, other) {
            (Shape::Basic(a), Shape::Basic(b)) => a == b,
            (Shape::Array { len: la, elem: ea }, Shape::Array { len: lb, elem: eb }) => {
                la == lb && ea == eb
            }
            (Shape::Slice(a), Shape::Slice(b)) | (Shape::Ptr(a), Shape::Ptr(b)) => a == b,
            (Shape::Map { key: ka, elem: ea }, Shape::Map { key: kb, elem: eb }) => {
                ka == kb && ea == eb
            }
            (Shape::Chan { dir: da, elem: ea }, Shape::Chan { dir: db, elem: eb }) => {
                da == db && ea == eb
            }
            (Shape::Func(a), Shape::Func(b)) => a.identical(b),
            (Shape::Struct(a), Shape::Struct(b)) => {
                a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.identical(y))
            }
            (Shape::Interface(a), Shape::Interface(b)) => {
                a.len() == b.len()
                    && a.iter().all(|m| {
                        b.iter()
                            .any(|n| n.name == m.name && n.sig.identical(&m.sig))
                    })
            }
            _ => false,
        }
    }
}

struct TypeData {
    name: Option<String>,
    shape: Shape,
    methods: Vec<Method>,
}

/// Shared runtime type descriptor.
#[derive(Clone)]
pub struct Type(Arc<TypeData>);

/// Field index path through embedded structs.
pub type FieldPath = SmallVec<[usize; 4]>;

const BASIC_KINDS: [Kind; 17] = [
    Kind::Bool,
    Kind::Int,
    Kind::Int8,
    Kind::Int16,
    Kind::Int32,
    Kind::Int64,
    Kind::Uint,
    Kind::Uint8,
    Kind::Uint16,
    Kind::Uint32,
    Kind::Uint64,
    Kind::Uintptr,
    Kind::Float32,
    Kind::Float64,
    Kind::Complex64,
    Kind::Complex128,
    Kind::String,
];

static PREDECLARED: LazyLock<Vec<Type>> = LazyLock::new(|| {
    BASIC_KINDS
        .iter()
        .map(|&kind| Type::from_data(Some(kind.name().to_string()), Shape::Basic(kind), Vec::new()))
        .collect()
});

macro_rules! predeclared {
    ($($fn_name:ident => $kind:ident),* $(,)?) => {
        $(
            #[doc = concat!("The predeclared `", stringify!($fn_name), "` type.")]
            pub fn $fn_name() -> Type {
                Type::basic(Kind::$kind)
            }
        )*
    };
}

impl Type {
    fn from_data(name: Option<String>, shape: Shape, methods: Vec<Method>) -> Self {
        Type(Arc::new(TypeData {
            name,
            shape,
            methods,
        }))
    }

    fn unnamed(shape: Shape) -> Self {
        Type::from_data(None, shape, Vec::new())
    }

    /// Predeclared type of a basic kind.
    ///
    /// # Panics
    /// Panics if `kind` is not a basic kind.
    pub fn basic(kind: Kind) -> Type {
        match BASIC_KINDS.iter().position(|&k| k == kind) {
            Some(index) => PREDECLARED[index].clone(),
            None => panic!("Type::basic called with non-basic kind {kind}"),
        }
    }

    predeclared! {
        bool => Bool,
        int => Int,
        int8 => Int8,
        int16 => Int16,
        int32 => Int32,
        int64 => Int64,
        uint => Uint,
        uint8 => Uint8,
        uint16 => Uint16,
        uint32 => Uint32,
        uint64 => Uint64,
        uintptr => Uintptr,
        float32 => Float32,
        float64 => Float64,
        complex64 => Complex64,
        complex128 => Complex128,
        string => String,
        byte => Uint8,
        rune => Int32,
    }

    /// Resolve a predeclared type name (`int`, `byte`, `rune`, ...).
    pub fn lookup_predeclared(name: &str) -> Option<Type> {
        match name {
            "byte" => Some(Type::byte()),
            "rune" => Some(Type::rune()),
            _ => BASIC_KINDS
                .iter()
                .find(|k| k.name() == name)
                .map(|&k| Type::basic(k)),
        }
    }

    pub fn array_of(len: usize, elem: Type) -> Type {
        Type::unnamed(Shape::Array { len, elem })
    }

    pub fn slice_of(elem: Type) -> Type {
        Type::unnamed(Shape::Slice(elem))
    }

    pub fn map_of(key: Type, elem: Type) -> Type {
        Type::unnamed(Shape::Map { key, elem })
    }

    pub fn chan_of(dir: ChanDir, elem: Type) -> Type {
        Type::unnamed(Shape::Chan { dir, elem })
    }

    pub fn func_of(sig: Signature) -> Type {
        Type::unnamed(Shape::Func(sig))
    }

    pub fn ptr_to(elem: Type) -> Type {
        Type::unnamed(Shape::Ptr(elem))
    }

    pub fn struct_of(fields: Vec<Field>) -> Type {
        Type::unnamed(Shape::Struct(fields))
    }

    pub fn interface_of(methods: Vec<InterfaceMethod>) -> Type {
        Type::unnamed(Shape::Interface(methods))
    }

    /// `interface{}`.
    pub fn empty_interface() -> Type {
        Type::interface_of(Vec::new())
    }

    /// Declare a new named type with the given underlying type.
    pub fn named(name: impl Into<String>, underlying: &Type) -> Type {
        Type::named_with_methods(name, underlying, Vec::new())
    }

    /// Declare a new named type carrying a method set.
    pub fn named_with_methods(
        name: impl Into<String>,
        underlying: &Type,
        methods: Vec<Method>,
    ) -> Type {
        Type::from_data(Some(name.into()), underlying.0.shape.clone(), methods)
    }

    // Capability probes

    pub fn kind(&self) -> Kind {
        self.0.shape.kind()
    }

    pub fn name(&self) -> Option<&str> {
        self.0.name.as_deref()
    }

    pub fn shape(&self) -> &Shape {
        &self.0.shape
    }

    /// Element type of arrays, slices, maps, channels and pointers.
    pub fn elem(&self) -> Option<&Type> {
        match &self.0.shape {
            Shape::Array { elem, .. }
            | Shape::Slice(elem)
            | Shape::Map { elem, .. }
            | Shape::Chan { elem, .. }
            | Shape::Ptr(elem) => Some(elem),
            _ => None,
        }
    }

    pub fn key(&self) -> Option<&Type> {
        match &self.0.shape {
            Shape::Map { key, .. } => Some(key),
            _ => None,
        }
    }

    pub fn array_len(&self) -> Option<usize> {
        match &self.0.shape {
            Shape::Array { len, .. } => Some(*len),
            _ => None,
        }
    }

    pub fn chan_dir(&self) -> Option<ChanDir> {
        match &self.0.shape {
            Shape::Chan { dir, .. } => Some(*dir),
            _ => None,
        }
    }

    pub fn signature(&self) -> Option<&Signature> {
        match &self.0.shape {
            Shape::Func(sig) => Some(sig),
            _ => None,
        }
    }

    /// Parameter count of a func type.
    pub fn num_in(&self) -> usize {
        self.signature().map_or(0, |sig| sig.params.len())
    }

    /// Result count of a func type.
    pub fn num_out(&self) -> usize {
        self.signature().map_or(0, |sig| sig.results.len())
    }

    pub fn is_variadic(&self) -> bool {
        self.signature().is_some_and(|sig| sig.variadic)
    }

    /// Struct fields; empty for non-struct types.
    pub fn fields(&self) -> &[Field] {
        match &self.0.shape {
            Shape::Struct(fields) => fields,
            _ => &[],
        }
    }

    /// Look up a field, including fields promoted through embedded
    /// structs. The shallowest unique match wins; an ambiguous name at
    /// the shallowest depth is not found.
    pub fn field_by_name(&self, name: &str) -> Option<(FieldPath, &Field)> {
        let mut level: Vec<(FieldPath, &Type)> = vec![(FieldPath::new(), self)];
        while !level.is_empty() {
            let mut found: Option<(FieldPath, &Field)> = None;
            let mut ambiguous = false;
            let mut next = Vec::new();
            for (path, ty) in level.iter().map(|(p, t)| (p, *t)) {
                for (i, field) in ty.fields().iter().enumerate() {
                    let mut field_path = path.clone();
                    field_path.push(i);
                    if field.name == name {
                        ambiguous |= found.is_some();
                        found = Some((field_path.clone(), field));
                    }
                    if field.embedded && field.ty.kind() == Kind::Struct {
                        next.push((field_path, &field.ty));
                    }
                }
            }
            if ambiguous {
                return None;
            }
            if found.is_some() {
                return found;
            }
            level = next;
        }
        None
    }

    /// Methods declared on this named type, regardless of receiver.
    pub fn declared_methods(&self) -> &[Method] {
        &self.0.methods
    }

    /// Method-set lookup: value types see value-receiver methods, pointers
    /// to named types see every method of the pointee.
    pub fn method_by_name(&self, name: &str) -> Option<&Method> {
        if let Shape::Ptr(elem) = &self.0.shape {
            if self.0.name.is_none() {
                return elem.0.methods.iter().find(|m| m.name == name);
            }
        }
        self.0
            .methods
            .iter()
            .find(|m| m.name == name && !m.pointer_receiver)
    }

    /// Methods of an interface type.
    pub fn interface_methods(&self) -> &[InterfaceMethod] {
        match &self.0.shape {
            Shape::Interface(methods) => methods,
            _ => &[],
        }
    }

    pub fn interface_method(&self, name: &str) -> Option<&InterfaceMethod> {
        self.interface_methods().iter().find(|m| m.name == name)
    }

    /// Whether values of this type satisfy interface `iface`.
    pub fn implements(&self, iface: &Type) -> bool {
        if iface.kind() != Kind::Interface {
            return false;
        }
        iface.interface_methods().iter().all(|want| {
            if self.kind() == Kind::Interface {
                self.interface_method(&want.name)
                    .is_some_and(|have| have.sig.identical(&want.sig))
            } else {
                self.method_by_name(&want.name)
                    .is_some_and(|have| have.sig.identical(&want.sig))
            }
        })
    }

    /// Number of storage slots a zero value of this type occupies. Arrays
    /// and structs hold one slot per element plus their own; saturates.
    pub fn storage_slots(&self) -> u64 {
        match &self.0.shape {
            Shape::Array { len, elem } => u64::try_from(*len)
                .unwrap_or(u64::MAX)
                .saturating_mul(elem.storage_slots())
                .saturating_add(1),
            Shape::Struct(fields) => fields
                .iter()
                .fold(1, |total: u64, f| total.saturating_add(f.ty.storage_slots())),
            _ => 1,
        }
    }

    /// Whether `==` is defined on values of this type.
    pub fn comparable(&self) -> bool {
        match &self.0.shape {
            Shape::Slice(_) | Shape::Map { .. } | Shape::Func(_) => false,
            Shape::Array { elem, .. } => elem.comparable(),
            Shape::Struct(fields) => fields.iter().all(|f| f.ty.comparable()),
            _ => true,
        }
    }

    /// Identical underlying types.
    pub fn same_underlying(&self, other: &Type) -> bool {
        self.0.shape.identical(&other.0.shape)
    }

    /// Implicit assignability of a value of this type to `target`.
    pub fn assignable_to(&self, target: &Type) -> bool {
        if self == target {
            return true;
        }
        let either_unnamed = self.name().is_none() || target.name().is_none();
        if either_unnamed && self.same_underlying(target) {
            return true;
        }
        if target.kind() == Kind::Interface && self.implements(target) {
            return true;
        }
        self.chan_dir() == Some(ChanDir::BOTH)
            && target.kind() == Kind::Chan
            && either_unnamed
            && self.elem() == target.elem()
    }

    /// Explicit convertibility of a value of this type to `target`.
    pub fn convertible_to(&self, target: &Type) -> bool {
        if self.assignable_to(target) || self.same_underlying(target) {
            return true;
        }
        let (from, to) = (self.kind(), target.kind());
        if from == Kind::Ptr && to == Kind::Ptr && self.name().is_none() && target.name().is_none()
        {
            if let (Some(a), Some(b)) = (self.elem(), target.elem()) {
                return a.same_underlying(b);
            }
        }
        let real = |k: Kind| k.is_integer() || k.is_float();
        if (real(from) && real(to)) || (from.is_complex() && to.is_complex()) {
            return true;
        }
        if to == Kind::String && (from.is_integer() || self.is_bytes_or_runes()) {
            return true;
        }
        from == Kind::String && target.is_bytes_or_runes()
    }

    /// `[]byte`/`[]rune`-shaped slice (element kind uint8 or int32).
    pub fn is_bytes_or_runes(&self) -> bool {
        self.is_byte_slice() || self.is_rune_slice()
    }

    pub fn is_byte_slice(&self) -> bool {
        matches!(&self.0.shape, Shape::Slice(elem) if elem.kind() == Kind::Uint8)
    }

    pub fn is_rune_slice(&self) -> bool {
        matches!(&self.0.shape, Shape::Slice(elem) if elem.kind() == Kind::Int32)
    }

    fn write_shape(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0.shape {
            Shape::Basic(kind) => f.write_str(kind.name()),
            Shape::Array { len, elem } => write!(f, "[{len}]{elem}"),
            Shape::Slice(elem) => write!(f, "[]{elem}"),
            Shape::Map { key, elem } => write!(f, "map[{key}]{elem}"),
            Shape::Chan { dir, elem } => {
                if *dir == ChanDir::RECV {
                    write!(f, "<-chan {elem}")
                } else if *dir == ChanDir::SEND {
                    write!(f, "chan<- {elem}")
                } else {
                    write!(f, "chan {elem}")
                }
            }
            Shape::Func(sig) => {
                f.write_str("func")?;
                sig.write(f)
            }
            Shape::Ptr(elem) => write!(f, "*{elem}"),
            Shape::Struct(fields) if fields.is_empty() => f.write_str("struct {}"),
            Shape::Struct(fields) => {
                f.write_str("struct { ")?;
                for (i, field) in fields.iter().enumerate() {
                    if i > 0 {
                        f.write_str("; ")?;
                    }
                    if field.embedded {
                        write!(f, "{}", field.ty)?;
                    } else {
                        write!(f, "{} {}", field.name, field.ty)?;
                    }
                    if !field.tag.is_empty() {
                        write!(f, " {:?}", field.tag)?;
                    }
                }
                f.write_str(" }")
            }
            Shape::Interface(methods) if methods.is_empty() => f.write_str("interface {}"),
            Shape::Interface(methods) => {
                f.write_str("interface { ")?;
                for (i, method) in methods.iter().enumerate() {
                    if i > 0 {
                        f.write_str("; ")?;
                    }
                    f.write_str(&method.name)?;
                    method.sig.write(f)?;
                }
                f.write_str(" }")
            }
        }
    }
}

impl PartialEq for Type {
    fn eq(&self, other: &Type) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
            || (self.0.name.is_none()
                && other.0.name.is_none()
                && self.0.shape.identical(&other.0.shape))
    }
}

impl Eq for Type {}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0.name {
            Some(name) => f.write_str(name),
            None => self.write_shape(f),
        }
    }
}

impl fmt::Debug for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Type({self})")
    }
}

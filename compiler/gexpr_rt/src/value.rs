//! Runtime value handles.
//!
//! An [`RtValue`] pairs a [`Type`] with a shared storage [`Slot`]. Values
//! obtained through a pointer, a slice element or a field of an addressable
//! struct alias the storage they came from and are addressable; everything
//! else is a detached copy.
//!
//! Arrays and structs own one slot per element so that `&a[1]` and
//! `&s.F` can alias a single element. Slices share an immutable run of
//! element slots (`backing`) with an offset/len/cap window. Maps, channels
//! and functions are reference types.

use std::collections::VecDeque;
use std::fmt;
use std::sync::Arc;

use parking_lot::{Mutex, RwLock, RwLockReadGuard};

use crate::num::{wrap_signed, wrap_unsigned};
use crate::types::{FieldPath, Kind, Shape, Type};

/// Shared mutable storage for one value.
pub type Slot = Arc<RwLock<Repr>>;

fn new_slot(repr: Repr) -> Slot {
    Arc::new(RwLock::new(repr))
}

/// Result of a host callable: result values, or a failure message.
pub type NativeResult = Result<Vec<RtValue>, String>;

/// Embedder-supplied callable.
#[derive(Clone)]
pub struct NativeFn(Arc<dyn Fn(&[RtValue]) -> NativeResult + Send + Sync>);

impl NativeFn {
    pub fn new(f: impl Fn(&[RtValue]) -> NativeResult + Send + Sync + 'static) -> Self {
        NativeFn(Arc::new(f))
    }

    pub fn call(&self, args: &[RtValue]) -> NativeResult {
        (self.0)(args)
    }
}

impl fmt::Debug for NativeFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("NativeFn(..)")
    }
}

/// Window onto a shared run of element slots.
#[derive(Clone)]
pub struct SliceRef {
    backing: Arc<[Slot]>,
    offset: usize,
    len: usize,
    cap: usize,
}

impl SliceRef {
    fn slots(&self) -> &[Slot] {
        &self.backing[self.offset..self.offset + self.len]
    }
}

/// Map entries in insertion order; keys are compared with `==` semantics.
#[derive(Default)]
pub struct MapStore {
    entries: Vec<(RtValue, RtValue)>,
}

/// Buffered channel state.
pub struct ChanStore {
    buffer: Mutex<VecDeque<RtValue>>,
    cap: usize,
}

/// Storage representation of a value.
#[derive(Clone)]
pub enum Repr {
    Bool(bool),
    /// Signed integer kinds, always normalised to the kind's width.
    Int(i64),
    /// Unsigned integer kinds, always normalised to the kind's width.
    Uint(u64),
    Float(f64),
    Complex(f64, f64),
    Str(Arc<[u8]>),
    Array(Vec<Slot>),
    Struct(Vec<Slot>),
    Slice(Option<SliceRef>),
    Map(Option<Arc<RwLock<MapStore>>>),
    Chan(Option<Arc<ChanStore>>),
    Func(Option<NativeFn>),
    Ptr(Option<Slot>),
    Interface(Option<Box<RtValue>>),
}

fn zero_repr(ty: &Type) -> Repr {
    match ty.shape() {
        Shape::Basic(kind) => match kind {
            Kind::Bool => Repr::Bool(false),
            k if k.is_signed_int() => Repr::Int(0),
            k if k.is_unsigned_int() => Repr::Uint(0),
            k if k.is_float() => Repr::Float(0.0),
            k if k.is_complex() => Repr::Complex(0.0, 0.0),
            _ => Repr::Str(Arc::from(&b""[..])),
        },
        Shape::Array { len, elem } => {
            Repr::Array((0..*len).map(|_| new_slot(zero_repr(elem))).collect())
        }
        Shape::Struct(fields) => Repr::Struct(
            fields
                .iter()
                .map(|field| new_slot(zero_repr(&field.ty)))
                .collect(),
        ),
        Shape::Slice(_) => Repr::Slice(None),
        Shape::Map { .. } => Repr::Map(None),
        Shape::Chan { .. } => Repr::Chan(None),
        Shape::Func(_) => Repr::Func(None),
        Shape::Ptr(_) => Repr::Ptr(None),
        Shape::Interface(_) => Repr::Interface(None),
    }
}

/// Copy with value semantics: arrays and structs get fresh element slots,
/// reference kinds keep sharing.
fn deep_copy(repr: &Repr) -> Repr {
    match repr {
        Repr::Array(slots) => Repr::Array(copy_slots(slots)),
        Repr::Struct(slots) => Repr::Struct(copy_slots(slots)),
        other => other.clone(),
    }
}

fn copy_slots(slots: &[Slot]) -> Vec<Slot> {
    slots
        .iter()
        .map(|slot| new_slot(deep_copy(&slot.read())))
        .collect()
}

/// Store `value` into `dst`, element-wise for arrays and structs so that
/// existing element slots (and pointers to them) stay valid.
fn store(dst: &Slot, value: Repr) {
    let targets = match (&*dst.read(), &value) {
        (Repr::Array(d), Repr::Array(s)) | (Repr::Struct(d), Repr::Struct(s))
            if d.len() == s.len() =>
        {
            Some(d.clone())
        }
        _ => None,
    };
    match (targets, value) {
        (Some(targets), Repr::Array(sources) | Repr::Struct(sources)) => {
            for (target, source) in targets.iter().zip(sources) {
                let inner = source.read().clone();
                store(target, inner);
            }
        }
        (_, value) => *dst.write() = value,
    }
}

/// Typed handle over shared storage.
#[derive(Clone)]
pub struct RtValue {
    ty: Type,
    slot: Slot,
    addressable: bool,
}

impl RtValue {
    pub(crate) fn from_repr(ty: Type, repr: Repr) -> RtValue {
        RtValue {
            ty,
            slot: new_slot(repr),
            addressable: false,
        }
    }

    fn aliasing(ty: Type, slot: Slot) -> RtValue {
        RtValue {
            ty,
            slot,
            addressable: true,
        }
    }

    /// Zero value of `ty`, not addressable.
    pub fn zero(ty: &Type) -> RtValue {
        RtValue::from_repr(ty.clone(), zero_repr(ty))
    }

    /// Fresh addressable zero value of `ty` (a new variable).
    pub fn new_var(ty: &Type) -> RtValue {
        RtValue::aliasing(ty.clone(), new_slot(zero_repr(ty)))
    }

    pub fn ty(&self) -> &Type {
        &self.ty
    }

    pub fn kind(&self) -> Kind {
        self.ty.kind()
    }

    pub fn can_addr(&self) -> bool {
        self.addressable
    }

    /// Read access to the storage representation.
    pub fn repr(&self) -> RwLockReadGuard<'_, Repr> {
        self.slot.read()
    }

    /// Detached copy with value semantics.
    #[must_use]
    pub fn copied(&self) -> RtValue {
        RtValue::from_repr(self.ty.clone(), deep_copy(&self.slot.read()))
    }

    /// Copy into a fresh addressable variable.
    #[must_use]
    pub fn to_addressable(&self) -> RtValue {
        RtValue::aliasing(self.ty.clone(), new_slot(deep_copy(&self.slot.read())))
    }

    /// Same storage viewed as another type with identical representation.
    #[must_use]
    pub fn retyped(&self, ty: Type) -> RtValue {
        RtValue {
            ty,
            slot: Arc::clone(&self.slot),
            addressable: self.addressable,
        }
    }

    /// Overwrite this value's storage with a copy of `src`.
    pub fn set(&self, src: &RtValue) {
        let value = deep_copy(&src.slot.read());
        store(&self.slot, value);
    }

    /// Pointer to this value, if it is addressable.
    pub fn addr(&self) -> Option<RtValue> {
        self.addressable.then(|| {
            RtValue::from_repr(
                Type::ptr_to(self.ty.clone()),
                Repr::Ptr(Some(Arc::clone(&self.slot))),
            )
        })
    }

    // Scalar accessors. Calling one on the wrong representation is a
    // contract violation.

    pub fn as_bool(&self) -> bool {
        match &*self.repr() {
            Repr::Bool(b) => *b,
            _ => panic!("RtValue::as_bool called on {}", self.ty),
        }
    }

    pub fn as_i64(&self) -> i64 {
        match &*self.repr() {
            Repr::Int(i) => *i,
            _ => panic!("RtValue::as_i64 called on {}", self.ty),
        }
    }

    pub fn as_u64(&self) -> u64 {
        match &*self.repr() {
            Repr::Uint(u) => *u,
            _ => panic!("RtValue::as_u64 called on {}", self.ty),
        }
    }

    pub fn as_f64(&self) -> f64 {
        match &*self.repr() {
            Repr::Float(f) => *f,
            _ => panic!("RtValue::as_f64 called on {}", self.ty),
        }
    }

    pub fn as_complex(&self) -> (f64, f64) {
        match &*self.repr() {
            Repr::Complex(re, im) => (*re, *im),
            _ => panic!("RtValue::as_complex called on {}", self.ty),
        }
    }

    /// Raw bytes of a string value.
    pub fn as_bytes(&self) -> Arc<[u8]> {
        match &*self.repr() {
            Repr::Str(bytes) => Arc::clone(bytes),
            _ => panic!("RtValue::as_bytes called on {}", self.ty),
        }
    }

    /// String value, with invalid UTF-8 replaced.
    pub fn as_string_lossy(&self) -> String {
        String::from_utf8_lossy(&self.as_bytes()).into_owned()
    }

    /// Integer value of any integer kind, widened to `i128`.
    pub fn as_i128(&self) -> Option<i128> {
        match &*self.repr() {
            Repr::Int(i) => Some(i128::from(*i)),
            Repr::Uint(u) => Some(i128::from(*u)),
            _ => None,
        }
    }

    pub fn is_nil(&self) -> bool {
        match &*self.repr() {
            Repr::Slice(s) => s.is_none(),
            Repr::Map(m) => m.is_none(),
            Repr::Chan(c) => c.is_none(),
            Repr::Func(f) => f.is_none(),
            Repr::Ptr(p) => p.is_none(),
            Repr::Interface(i) => i.is_none(),
            _ => false,
        }
    }

    /// `len` of strings, arrays, slices, maps and channels.
    pub fn len(&self) -> usize {
        match &*self.repr() {
            Repr::Str(bytes) => bytes.len(),
            Repr::Array(slots) => slots.len(),
            Repr::Slice(s) => s.as_ref().map_or(0, |s| s.len),
            Repr::Map(m) => m.as_ref().map_or(0, |m| m.read().entries.len()),
            Repr::Chan(c) => c.as_ref().map_or(0, |c| c.buffer.lock().len()),
            _ => panic!("RtValue::len called on {}", self.ty),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// `cap` of arrays, slices and channels.
    pub fn cap(&self) -> usize {
        match &*self.repr() {
            Repr::Array(slots) => slots.len(),
            Repr::Slice(s) => s.as_ref().map_or(0, |s| s.cap),
            Repr::Chan(c) => c.as_ref().map_or(0, |c| c.cap),
            _ => panic!("RtValue::cap called on {}", self.ty),
        }
    }

    /// Element `i` of an array, slice or string. The caller bounds-checks.
    pub fn index(&self, i: usize) -> RtValue {
        let elem_ty = self.ty.elem().cloned();
        match (&*self.repr(), elem_ty) {
            (Repr::Array(slots), Some(elem)) => RtValue {
                ty: elem,
                slot: Arc::clone(&slots[i]),
                addressable: self.addressable,
            },
            (Repr::Slice(Some(s)), Some(elem)) => {
                RtValue::aliasing(elem, Arc::clone(&s.slots()[i]))
            }
            (Repr::Str(bytes), _) => RtValue::from_repr(Type::uint8(), Repr::Uint(u64::from(bytes[i]))),
            _ => panic!("RtValue::index called on {}", self.ty),
        }
    }

    /// Field `i` of a struct; addressable when the struct is.
    pub fn field(&self, i: usize) -> RtValue {
        let field_ty = self.ty.fields()[i].ty.clone();
        match &*self.repr() {
            Repr::Struct(slots) => RtValue {
                ty: field_ty,
                slot: Arc::clone(&slots[i]),
                addressable: self.addressable,
            },
            _ => panic!("RtValue::field called on {}", self.ty),
        }
    }

    pub fn field_by_path(&self, path: &FieldPath) -> RtValue {
        path.iter()
            .fold(self.clone(), |value, &index| value.field(index))
    }

    /// Pointee of a non-nil pointer or dynamic value of a non-nil interface.
    pub fn elem(&self) -> Option<RtValue> {
        match &*self.repr() {
            Repr::Ptr(Some(slot)) => {
                let elem_ty = self.ty.elem()?.clone();
                Some(RtValue::aliasing(elem_ty, Arc::clone(slot)))
            }
            Repr::Interface(Some(inner)) => Some((**inner).clone()),
            _ => None,
        }
    }

    /// Look up `key` in a map. Nil maps behave as empty.
    pub fn map_get(&self, key: &RtValue) -> Result<Option<RtValue>, String> {
        let Repr::Map(store) = &*self.repr() else {
            panic!("RtValue::map_get called on {}", self.ty);
        };
        let Some(store) = store else {
            return Ok(None);
        };
        for (k, v) in &store.read().entries {
            if k.equals(key)? {
                return Ok(Some(v.copied()));
            }
        }
        Ok(None)
    }

    /// Insert or overwrite `key`. Fails on a nil map.
    pub fn map_insert(&self, key: RtValue, value: RtValue) -> Result<(), String> {
        let Repr::Map(store) = &*self.repr() else {
            panic!("RtValue::map_insert called on {}", self.ty);
        };
        let Some(store) = store else {
            return Err("assignment to entry in nil map".to_string());
        };
        let mut store = store.write();
        for entry in &mut store.entries {
            if entry.0.equals(&key)? {
                entry.1 = value;
                return Ok(());
            }
        }
        store.entries.push((key, value));
        Ok(())
    }

    pub fn map_entries(&self) -> Vec<(RtValue, RtValue)> {
        match &*self.repr() {
            Repr::Map(Some(store)) => store.read().entries.clone(),
            Repr::Map(None) => Vec::new(),
            _ => panic!("RtValue::map_entries called on {}", self.ty),
        }
    }

    /// Invoke a function value.
    pub fn call(&self, args: &[RtValue]) -> NativeResult {
        let func = match &*self.repr() {
            Repr::Func(Some(func)) => func.clone(),
            Repr::Func(None) => return Err("call of nil function".to_string()),
            _ => panic!("RtValue::call called on {}", self.ty),
        };
        func.call(args)
    }

    /// Buffer a value in a channel without blocking. Returns `false` when
    /// the channel is nil or full.
    pub fn try_send(&self, value: RtValue) -> bool {
        match &*self.repr() {
            Repr::Chan(Some(chan)) => {
                let mut buffer = chan.buffer.lock();
                if buffer.len() < chan.cap {
                    buffer.push_back(value);
                    true
                } else {
                    false
                }
            }
            _ => false,
        }
    }

    /// `x[low:high:max]` on a slice or addressable array, `x[low:high]` on a
    /// string. Bounds are validated by the caller.
    pub fn slice(&self, low: usize, high: usize, max: usize) -> RtValue {
        match &*self.repr() {
            Repr::Str(bytes) => {
                RtValue::from_repr(self.ty.clone(), Repr::Str(Arc::from(&bytes[low..high])))
            }
            Repr::Slice(s) => {
                let slice = s.as_ref().map(|s| SliceRef {
                    backing: Arc::clone(&s.backing),
                    offset: s.offset + low,
                    len: high - low,
                    cap: max - low,
                });
                RtValue::from_repr(self.ty.clone(), Repr::Slice(slice))
            }
            Repr::Array(slots) => {
                let elem = self.ty.elem().cloned().unwrap_or_else(|| self.ty.clone());
                let backing: Arc<[Slot]> = slots.iter().cloned().collect();
                RtValue::from_repr(
                    Type::slice_of(elem),
                    Repr::Slice(Some(SliceRef {
                        backing,
                        offset: low,
                        len: high - low,
                        cap: max - low,
                    })),
                )
            }
            _ => panic!("RtValue::slice called on {}", self.ty),
        }
    }

    /// Append copies of `values` to a slice, growing the backing store
    /// when capacity runs out. Values must already have the element type.
    #[must_use]
    pub fn append(&self, values: &[RtValue]) -> RtValue {
        let current = match &*self.repr() {
            Repr::Slice(s) => s.clone(),
            _ => panic!("RtValue::append called on {}", self.ty),
        };
        if values.is_empty() {
            return RtValue::from_repr(self.ty.clone(), Repr::Slice(current));
        }
        let (len, cap) = current.as_ref().map_or((0, 0), |s| (s.len, s.cap));
        let new_len = len + values.len();
        if let Some(s) = current.filter(|_| new_len <= cap) {
            for (i, value) in values.iter().enumerate() {
                let value = deep_copy(&value.slot.read());
                store(&s.backing[s.offset + len + i], value);
            }
            return RtValue::from_repr(
                self.ty.clone(),
                Repr::Slice(Some(SliceRef { len: new_len, ..s })),
            );
        }
        let new_cap = new_len.max(cap * 2);
        let mut slots: Vec<Slot> = Vec::with_capacity(new_cap);
        if let Repr::Slice(Some(s)) = &*self.repr() {
            slots.extend(copy_slots(s.slots()));
        }
        slots.extend(values.iter().map(|v| new_slot(deep_copy(&v.slot.read()))));
        let elem_ty = self.ty.elem().cloned();
        while slots.len() < new_cap {
            slots.push(new_slot(elem_ty.as_ref().map_or(Repr::Bool(false), zero_repr)));
        }
        RtValue::from_repr(
            self.ty.clone(),
            Repr::Slice(Some(SliceRef {
                backing: slots.into(),
                offset: 0,
                len: new_len,
                cap: new_cap,
            })),
        )
    }

    /// `==` with the host's runtime semantics. Comparing values of an
    /// incomparable type (slices, maps, functions) fails.
    #[allow(clippy::float_cmp, reason = "runtime == is exact float equality")]
    pub fn equals(&self, other: &RtValue) -> Result<bool, String> {
        let (a, b) = (self.repr(), other.repr());
        Ok(match (&*a, &*b) {
            (Repr::Bool(x), Repr::Bool(y)) => x == y,
            (Repr::Int(x), Repr::Int(y)) => x == y,
            (Repr::Uint(x), Repr::Uint(y)) => x == y,
            (Repr::Float(x), Repr::Float(y)) => x == y,
            (Repr::Complex(xr, xi), Repr::Complex(yr, yi)) => xr == yr && xi == yi,
            (Repr::Str(x), Repr::Str(y)) => x == y,
            (Repr::Ptr(x), Repr::Ptr(y)) => match (x, y) {
                (Some(x), Some(y)) => Arc::ptr_eq(x, y),
                (x, y) => x.is_none() && y.is_none(),
            },
            (Repr::Chan(x), Repr::Chan(y)) => match (x, y) {
                (Some(x), Some(y)) => Arc::ptr_eq(x, y),
                (x, y) => x.is_none() && y.is_none(),
            },
            (Repr::Interface(x), Repr::Interface(y)) => match (x, y) {
                (Some(x), Some(y)) => {
                    if x.ty != y.ty {
                        return Ok(false);
                    }
                    if !x.ty.comparable() {
                        return Err(format!("comparing uncomparable type {}", x.ty));
                    }
                    x.equals(y)?
                }
                (x, y) => x.is_none() && y.is_none(),
            },
            (Repr::Array(xs), Repr::Array(ys)) | (Repr::Struct(xs), Repr::Struct(ys)) => {
                let elem_types: Vec<Type> = match self.ty.shape() {
                    Shape::Struct(fields) => fields.iter().map(|f| f.ty.clone()).collect(),
                    _ => vec![self.ty.elem().cloned().unwrap_or_else(|| self.ty.clone()); xs.len()],
                };
                for ((x, y), ty) in xs.iter().zip(ys).zip(elem_types) {
                    let x = RtValue::from_repr(ty.clone(), x.read().clone());
                    let y = RtValue::from_repr(ty, y.read().clone());
                    if !x.equals(&y)? {
                        return Ok(false);
                    }
                }
                true
            }
            _ => return Err(format!("comparing uncomparable type {}", self.ty)),
        })
    }

    // Constructors

    /// Signed integer of kind `ty`, wrapped to its width.
    pub fn int_of(ty: &Type, value: i64) -> RtValue {
        let repr = Repr::Int(wrap_signed(i128::from(value), ty.kind().bits()));
        RtValue::from_repr(ty.clone(), repr)
    }

    /// Unsigned integer of kind `ty`, wrapped to its width.
    pub fn uint_of(ty: &Type, value: u64) -> RtValue {
        let repr = Repr::Uint(wrap_unsigned(i128::from(value), ty.kind().bits()));
        RtValue::from_repr(ty.clone(), repr)
    }

    /// Float of kind `ty`; `float32` values are rounded to single precision.
    pub fn float_of(ty: &Type, value: f64) -> RtValue {
        RtValue::from_repr(ty.clone(), Repr::Float(round_float(ty.kind(), value)))
    }

    pub fn complex_of(ty: &Type, re: f64, im: f64) -> RtValue {
        let part = if ty.kind() == Kind::Complex64 {
            Kind::Float32
        } else {
            Kind::Float64
        };
        RtValue::from_repr(
            ty.clone(),
            Repr::Complex(round_float(part, re), round_float(part, im)),
        )
    }

    pub fn bool_of(ty: &Type, value: bool) -> RtValue {
        RtValue::from_repr(ty.clone(), Repr::Bool(value))
    }

    pub fn string_of(ty: &Type, bytes: &[u8]) -> RtValue {
        RtValue::from_repr(ty.clone(), Repr::Str(Arc::from(bytes)))
    }

    /// Value of the predeclared `int` type.
    pub fn int(value: i64) -> RtValue {
        RtValue::int_of(&Type::int(), value)
    }

    /// Slice of type `ty` holding copies of `elems`.
    pub fn slice_from(ty: &Type, elems: &[RtValue]) -> RtValue {
        let backing: Arc<[Slot]> = elems
            .iter()
            .map(|e| new_slot(deep_copy(&e.slot.read())))
            .collect();
        let len = backing.len();
        RtValue::from_repr(
            ty.clone(),
            Repr::Slice(Some(SliceRef {
                backing,
                offset: 0,
                len,
                cap: len,
            })),
        )
    }

    /// Slice of type `ty` with `len` zero elements and capacity `cap`.
    pub fn make_slice(ty: &Type, len: usize, cap: usize) -> RtValue {
        let elem = ty.elem().cloned().unwrap_or_else(|| ty.clone());
        let backing: Arc<[Slot]> = (0..cap.max(len)).map(|_| new_slot(zero_repr(&elem))).collect();
        RtValue::from_repr(
            ty.clone(),
            Repr::Slice(Some(SliceRef {
                backing,
                offset: 0,
                len,
                cap: cap.max(len),
            })),
        )
    }

    /// Array of type `ty` holding copies of `elems` (missing tail is zero).
    pub fn array_from(ty: &Type, elems: &[RtValue]) -> RtValue {
        let value = RtValue::zero(ty);
        for (i, elem) in elems.iter().enumerate() {
            value.index(i).set(elem);
        }
        value
    }

    /// Struct of type `ty` with the given field values in declaration order.
    pub fn struct_from(ty: &Type, fields: &[RtValue]) -> RtValue {
        let value = RtValue::zero(ty);
        for (i, field) in fields.iter().enumerate() {
            value.field(i).set(field);
        }
        value
    }

    /// Empty, non-nil map of type `ty`.
    pub fn make_map(ty: &Type) -> RtValue {
        RtValue::from_repr(
            ty.clone(),
            Repr::Map(Some(Arc::new(RwLock::new(MapStore::default())))),
        )
    }

    /// Map of type `ty` from key/value pairs; later duplicates overwrite.
    pub fn map_from(ty: &Type, entries: Vec<(RtValue, RtValue)>) -> Result<RtValue, String> {
        let map = RtValue::make_map(ty);
        for (key, value) in entries {
            map.map_insert(key, value)?;
        }
        Ok(map)
    }

    /// Buffered channel of type `ty`.
    pub fn make_chan(ty: &Type, cap: usize) -> RtValue {
        RtValue::from_repr(
            ty.clone(),
            Repr::Chan(Some(Arc::new(ChanStore {
                buffer: Mutex::new(VecDeque::with_capacity(cap)),
                cap,
            }))),
        )
    }

    /// Function value of func type `ty`.
    pub fn func(ty: &Type, func: NativeFn) -> RtValue {
        RtValue::from_repr(ty.clone(), Repr::Func(Some(func)))
    }

    /// `new(T)`: pointer to a fresh zero value of `elem`.
    pub fn new_pointer(elem: &Type) -> RtValue {
        RtValue::from_repr(
            Type::ptr_to(elem.clone()),
            Repr::Ptr(Some(new_slot(zero_repr(elem)))),
        )
    }

    /// Interface value of type `iface` holding `value`. An interface
    /// value is unwrapped first so interfaces never nest.
    pub fn boxed(iface: &Type, value: &RtValue) -> RtValue {
        let inner = if value.kind() == Kind::Interface {
            value.elem()
        } else {
            Some(value.copied())
        };
        RtValue::from_repr(iface.clone(), Repr::Interface(inner.map(Box::new)))
    }
}

/// Round `value` to the precision of a float kind.
#[expect(
    clippy::cast_possible_truncation,
    reason = "narrowing to float32 is the rounding being performed"
)]
pub(crate) fn round_float(kind: Kind, value: f64) -> f64 {
    if kind == Kind::Float32 {
        f64::from(value as f32)
    } else {
        value
    }
}

macro_rules! from_native {
    ($($native:ty => $ctor:ident($ty:ident) as $wide:ty),* $(,)?) => {
        $(
            impl From<$native> for RtValue {
                fn from(value: $native) -> Self {
                    RtValue::$ctor(&Type::$ty(), <$wide>::from(value))
                }
            }
        )*
    };
}

from_native! {
    i8 => int_of(int8) as i64,
    i16 => int_of(int16) as i64,
    i32 => int_of(int32) as i64,
    i64 => int_of(int64) as i64,
    u8 => uint_of(uint8) as u64,
    u16 => uint_of(uint16) as u64,
    u32 => uint_of(uint32) as u64,
    u64 => uint_of(uint64) as u64,
    f32 => float_of(float32) as f64,
    f64 => float_of(float64) as f64,
    bool => bool_of(bool) as bool,
}

impl From<&str> for RtValue {
    fn from(value: &str) -> Self {
        RtValue::string_of(&Type::string(), value.as_bytes())
    }
}

impl From<String> for RtValue {
    fn from(value: String) -> Self {
        RtValue::from(value.as_str())
    }
}

impl fmt::Display for RtValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = self.repr().clone();
        match repr {
            Repr::Bool(b) => write!(f, "{b}"),
            Repr::Int(i) => write!(f, "{i}"),
            Repr::Uint(u) => write!(f, "{u}"),
            Repr::Float(x) => write!(f, "{x}"),
            Repr::Complex(re, im) => write!(f, "({re}{im:+}i)"),
            Repr::Str(bytes) => f.write_str(&String::from_utf8_lossy(&bytes)),
            Repr::Array(_) | Repr::Slice(Some(_)) => {
                f.write_str("[")?;
                for i in 0..self.len() {
                    if i > 0 {
                        f.write_str(" ")?;
                    }
                    write!(f, "{}", self.index(i))?;
                }
                f.write_str("]")
            }
            Repr::Struct(slots) => {
                f.write_str("{")?;
                for i in 0..slots.len() {
                    if i > 0 {
                        f.write_str(" ")?;
                    }
                    write!(f, "{}", self.field(i))?;
                }
                f.write_str("}")
            }
            Repr::Map(Some(_)) => {
                f.write_str("map[")?;
                for (i, (k, v)) in self.map_entries().iter().enumerate() {
                    if i > 0 {
                        f.write_str(" ")?;
                    }
                    write!(f, "{k}:{v}")?;
                }
                f.write_str("]")
            }
            Repr::Ptr(Some(slot)) => match self.elem() {
                Some(elem) if matches!(elem.kind(), Kind::Struct | Kind::Array | Kind::Slice | Kind::Map) => {
                    write!(f, "&{elem}")
                }
                _ => write!(f, "{:p}", Arc::as_ptr(&slot)),
            },
            Repr::Chan(Some(chan)) => write!(f, "{:p}", Arc::as_ptr(&chan)),
            Repr::Func(Some(_)) => f.write_str("func"),
            Repr::Interface(Some(inner)) => write!(f, "{inner}"),
            Repr::Slice(None) => f.write_str("[]"),
            Repr::Map(None) => f.write_str("map[]"),
            Repr::Chan(None) | Repr::Func(None) | Repr::Ptr(None) | Repr::Interface(None) => {
                f.write_str("<nil>")
            }
        }
    }
}

impl fmt::Debug for RtValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({self})", self.ty)
    }
}

#[cfg(test)]
mod tests;

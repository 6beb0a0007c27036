use super::*;
use crate::types::{Field, Signature};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

fn ints(value: &RtValue) -> Vec<i64> {
    (0..value.len()).map(|i| value.index(i).as_i64()).collect()
}

fn int_slice(values: &[i64]) -> RtValue {
    let elems: Vec<RtValue> = values.iter().map(|&v| RtValue::int(v)).collect();
    RtValue::slice_from(&Type::slice_of(Type::int()), &elems)
}

// Scalars

#[test]
fn integers_wrap_to_width() {
    assert_eq!(RtValue::int_of(&Type::int8(), 200).as_i64(), -56);
    assert_eq!(RtValue::uint_of(&Type::uint8(), 300).as_u64(), 44);
    assert_eq!(RtValue::from(-1i8).as_i64(), -1);
}

#[test]
fn float32_rounds() {
    let v = RtValue::float_of(&Type::float32(), 0.1);
    assert!((v.as_f64() - 0.1).abs() > 0.0);
    assert!((v.as_f64() - 0.1).abs() < 1e-8);
}

#[test]
fn zero_values() {
    assert_eq!(RtValue::zero(&Type::string()).as_bytes().len(), 0);
    assert!(!RtValue::zero(&Type::bool()).as_bool());
    assert!(RtValue::zero(&Type::map_of(Type::int(), Type::int())).is_nil());
    let arr = RtValue::zero(&Type::array_of(3, Type::int()));
    assert_eq!(ints(&arr), vec![0, 0, 0]);
}

// Value semantics and aliasing

#[test]
fn arrays_copy_on_assignment() {
    let ty = Type::array_of(2, Type::int());
    let a = RtValue::array_from(&ty, &[RtValue::int(1), RtValue::int(2)]).to_addressable();
    let b = a.copied();
    a.index(0).set(&RtValue::int(9));
    assert_eq!(ints(&a), vec![9, 2]);
    assert_eq!(ints(&b), vec![1, 2]);
}

#[test]
fn pointer_aliases_variable() {
    let var = RtValue::new_var(&Type::int());
    let Some(ptr) = var.addr() else {
        panic!("variable must be addressable");
    };
    ptr.elem().iter().for_each(|target| target.set(&RtValue::int(42)));
    assert_eq!(var.as_i64(), 42);
    assert!(RtValue::int(1).addr().is_none());
}

#[test]
fn struct_fields_alias_through_pointer() {
    let ty = Type::struct_of(vec![Field::new("A", Type::int()), Field::new("B", Type::string())]);
    let ptr = RtValue::new_pointer(&ty);
    let Some(target) = ptr.elem() else {
        panic!("new pointer is never nil");
    };
    target.field(0).set(&RtValue::int(5));
    let again = ptr.elem().map(|s| s.field(0).as_i64());
    assert_eq!(again, Some(5));
    assert!(target.field(1).can_addr());
}

#[test]
fn self_assignment_does_not_deadlock() {
    let ty = Type::array_of(2, Type::int());
    let a = RtValue::array_from(&ty, &[RtValue::int(3), RtValue::int(4)]).to_addressable();
    a.set(&a);
    assert_eq!(ints(&a), vec![3, 4]);
}

// Slices

#[test]
fn reslice_shares_backing() {
    let s = int_slice(&[1, 2, 3, 4]);
    let t = s.slice(1, 3, 4);
    assert_eq!(ints(&t), vec![2, 3]);
    assert_eq!(t.cap(), 3);
    t.index(0).set(&RtValue::int(20));
    assert_eq!(ints(&s), vec![1, 20, 3, 4]);
}

#[test]
fn append_within_capacity_writes_through() {
    let s = int_slice(&[1, 2, 3, 4]);
    let head = s.slice(0, 2, 4);
    let grown = head.append(&[RtValue::int(7)]);
    assert_eq!(ints(&grown), vec![1, 2, 7]);
    assert_eq!(ints(&s), vec![1, 2, 7, 4]);
}

#[test]
fn append_past_capacity_reallocates() {
    let s = int_slice(&[1, 2]);
    let grown = s.append(&[RtValue::int(3)]);
    assert_eq!(ints(&grown), vec![1, 2, 3]);
    assert_eq!(grown.cap(), 4);
    grown.index(0).set(&RtValue::int(100));
    assert_eq!(ints(&s), vec![1, 2]);
}

#[test]
fn append_to_nil_slice() {
    let nil = RtValue::zero(&Type::slice_of(Type::int()));
    let grown = nil.append(&[RtValue::int(5)]);
    assert_eq!(ints(&grown), vec![5]);
    assert!(!grown.is_nil());
}

#[test]
fn make_slice_has_len_and_cap() {
    let s = RtValue::make_slice(&Type::slice_of(Type::int()), 10, 12);
    assert_eq!((s.len(), s.cap()), (10, 12));
    assert!(ints(&s).iter().all(|&v| v == 0));
}

#[test]
fn slicing_an_array_aliases_it() {
    let ty = Type::array_of(3, Type::int());
    let arr = RtValue::array_from(&ty, &[RtValue::int(1), RtValue::int(2), RtValue::int(3)])
        .to_addressable();
    let s = arr.slice(1, 3, 3);
    assert_eq!(s.ty().to_string(), "[]int");
    s.index(1).set(&RtValue::int(30));
    assert_eq!(ints(&arr), vec![1, 2, 30]);
}

#[test]
fn string_index_and_slice() {
    let s = RtValue::from("hello");
    assert_eq!(s.index(1).as_u64(), u64::from(b'e'));
    assert_eq!(s.slice(1, 4, 4).as_string_lossy(), "ell");
}

// Maps

#[test]
fn map_insert_get_overwrite() {
    let map = RtValue::make_map(&Type::map_of(Type::string(), Type::int()));
    assert_eq!(map.map_insert(RtValue::from("a"), RtValue::int(1)), Ok(()));
    assert_eq!(map.map_insert(RtValue::from("a"), RtValue::int(2)), Ok(()));
    assert_eq!(map.len(), 1);
    let got = map.map_get(&RtValue::from("a")).map(|v| v.map(|v| v.as_i64()));
    assert_eq!(got, Ok(Some(2)));
    let missing = map.map_get(&RtValue::from("b")).map(|v| v.is_none());
    assert_eq!(missing, Ok(true));
}

#[test]
fn nil_map_reads_but_rejects_writes() {
    let map = RtValue::zero(&Type::map_of(Type::string(), Type::int()));
    assert_eq!(map.map_get(&RtValue::from("a")).map(|v| v.is_none()), Ok(true));
    assert!(map.map_insert(RtValue::from("a"), RtValue::int(1)).is_err());
}

// Equality

#[test]
fn equality_semantics() {
    let ty = Type::struct_of(vec![Field::new("A", Type::int())]);
    let a = RtValue::struct_from(&ty, &[RtValue::int(1)]);
    let b = RtValue::struct_from(&ty, &[RtValue::int(1)]);
    assert_eq!(a.equals(&b), Ok(true));
    assert!(int_slice(&[1]).equals(&int_slice(&[1])).is_err());

    let iface = Type::empty_interface();
    let x = RtValue::boxed(&iface, &RtValue::int(1));
    let y = RtValue::boxed(&iface, &RtValue::from(1i64));
    assert_eq!(x.equals(&y), Ok(false));
    let nil = RtValue::zero(&iface);
    assert_eq!(nil.equals(&RtValue::zero(&iface)), Ok(true));
}

// Functions and channels

#[test]
fn native_functions() {
    let sig = Signature::new(vec![Type::int(), Type::int()], vec![Type::int()], false);
    let add = RtValue::func(
        &Type::func_of(sig),
        NativeFn::new(|args| Ok(vec![RtValue::int(args[0].as_i64() + args[1].as_i64())])),
    );
    let out = add.call(&[RtValue::int(2), RtValue::int(3)]).map(|r| r[0].as_i64());
    assert_eq!(out, Ok(5));
    let nil = RtValue::zero(add.ty());
    assert!(nil.call(&[]).is_err());
}

#[test]
fn channel_buffer() {
    let ch = RtValue::make_chan(&Type::chan_of(crate::types::ChanDir::BOTH, Type::int()), 2);
    assert!(ch.try_send(RtValue::int(1)));
    assert!(ch.try_send(RtValue::int(2)));
    assert!(!ch.try_send(RtValue::int(3)));
    assert_eq!((ch.len(), ch.cap()), (2, 2));
}

#[test]
fn display() {
    let map = RtValue::map_from(
        &Type::map_of(Type::string(), Type::int()),
        vec![(RtValue::from("a"), RtValue::int(1))],
    );
    assert_eq!(map.map(|m| m.to_string()), Ok("map[a:1]".to_string()));
    assert_eq!(int_slice(&[1, 2]).to_string(), "[1 2]");
    let ptr = RtValue::new_pointer(&Type::struct_of(vec![Field::new("A", Type::int())]));
    assert_eq!(ptr.to_string(), "&{0}");
    assert_eq!(RtValue::complex_of(&Type::complex128(), 1.0, -2.0).to_string(), "(1-2i)");
}

proptest! {
    #[test]
    fn reslice_length_is_high_minus_low(len in 0usize..32, a in 0usize..32, b in 0usize..32) {
        let values: Vec<i64> = (0..len).map(|i| i64::try_from(i).unwrap_or_default()).collect();
        let s = int_slice(&values);
        let (low, high) = (a.min(b).min(len), a.max(b).min(len));
        let sub = s.slice(low, high, len);
        prop_assert_eq!(sub.len(), high - low);
        prop_assert_eq!(ints(&sub), values[low..high].to_vec());
    }
}

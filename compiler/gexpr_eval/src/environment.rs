//! Identifier bindings supplied by the embedder.
//!
//! A binding name is either a plain identifier or `ns.Name`. Before each
//! evaluation the bindings are copied, regular values are moved into
//! addressable storage, and dotted names are folded into one
//! [`Value::Namespace`] per prefix.

use std::sync::Arc;

use gexpr_rt::{RtValue, Type};
use rustc_hash::FxHashMap;
use tracing::debug;

use crate::data::Data;
use crate::errors::{invalid_identifier, namespace_collision, IntResult};
use crate::value::Value;

const KEYWORDS: &[&str] = &[
    "break",
    "case",
    "chan",
    "const",
    "continue",
    "default",
    "defer",
    "else",
    "fallthrough",
    "for",
    "func",
    "go",
    "goto",
    "if",
    "import",
    "interface",
    "map",
    "package",
    "range",
    "return",
    "select",
    "struct",
    "switch",
    "type",
    "var",
];

pub(crate) fn is_valid_ident(name: &str) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    (first == '_' || first.is_alphabetic())
        && chars.all(|c| c == '_' || c.is_alphanumeric())
        && !KEYWORDS.contains(&name)
}

fn is_exported_ident(name: &str) -> bool {
    is_valid_ident(name) && name.chars().next().is_some_and(char::is_uppercase)
}

/// Name-to-[`Value`] bindings.
#[derive(Clone, Debug, Default)]
pub struct Identifiers {
    bindings: FxHashMap<String, Value>,
}

impl Identifiers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bindings from values of any variant.
    pub fn from_values<K: Into<String>>(values: impl IntoIterator<Item = (K, Value)>) -> Self {
        let mut idents = Identifiers::new();
        for (name, value) in values {
            idents.insert(name, value);
        }
        idents
    }

    /// Bindings from runtime values only.
    pub fn from_regulars<K: Into<String>>(values: impl IntoIterator<Item = (K, RtValue)>) -> Self {
        Self::from_values(values.into_iter().map(|(k, v)| (k, Value::regular(v))))
    }

    /// Bindings from types only.
    pub fn from_types<K: Into<String>>(types: impl IntoIterator<Item = (K, Type)>) -> Self {
        Self::from_values(types.into_iter().map(|(k, t)| (k, Value::Type(t))))
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.bindings.insert(name.into(), value.into());
        self
    }

    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.bindings.get(name)
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Copy of the bindings ready for one evaluation.
    pub(crate) fn prepare(&self) -> IntResult<Identifiers> {
        self.validate()?;
        let mut scope = self.clone();
        scope.make_addressable();
        scope.normalize()?;
        Ok(scope)
    }

    fn validate(&self) -> IntResult<()> {
        let mut names: Vec<&String> = self.bindings.keys().collect();
        names.sort_unstable();
        for name in names {
            let valid = match name.split_once('.') {
                None => is_valid_ident(name),
                Some((ns, member)) => {
                    ns != "_" && is_valid_ident(ns) && is_exported_ident(member)
                }
            };
            if !valid {
                return Err(invalid_identifier(name));
            }
        }
        Ok(())
    }

    fn make_addressable(&mut self) {
        for value in self.bindings.values_mut() {
            if let Value::Data(Data::Regular(v)) = value {
                if !v.can_addr() {
                    *v = v.to_addressable();
                }
            }
        }
    }

    /// Fold `ns.Name` bindings into namespace values.
    fn normalize(&mut self) -> IntResult<()> {
        let mut dotted: Vec<String> = self
            .bindings
            .keys()
            .filter(|name| name.contains('.'))
            .cloned()
            .collect();
        dotted.sort_unstable();

        let mut namespaces: FxHashMap<String, FxHashMap<String, Value>> = FxHashMap::default();
        for name in dotted {
            let Some((ns, member)) = name.split_once('.') else {
                continue;
            };
            if let Some(value) = self.bindings.remove(&name) {
                namespaces
                    .entry(ns.to_string())
                    .or_default()
                    .insert(member.to_string(), value);
            }
        }

        let mut names: Vec<String> = namespaces.keys().cloned().collect();
        names.sort_unstable();
        for ns in names {
            if self.bindings.contains_key(&ns) {
                return Err(namespace_collision(&ns));
            }
            if let Some(members) = namespaces.remove(&ns) {
                debug!(namespace = %ns, members = members.len(), "synthesized namespace");
                self.bindings.insert(ns, Value::Namespace(Arc::new(members)));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorKind;
    use pretty_assertions::assert_eq;

    fn prepared(names: &[&str]) -> IntResult<Identifiers> {
        Identifiers::from_regulars(names.iter().map(|n| (*n, RtValue::int(1)))).prepare()
    }

    #[test]
    fn dotted_names_become_namespaces() {
        let Ok(scope) = prepared(&["a.A", "a.B", "b"]) else {
            panic!("valid bindings");
        };
        let Some(Value::Namespace(members)) = scope.get("a") else {
            panic!("namespace a expected");
        };
        let mut names: Vec<&String> = members.keys().collect();
        names.sort();
        assert_eq!(names, vec!["A", "B"]);
        assert!(scope.get("a.A").is_none());
        assert!(scope.get("b").is_some());
    }

    #[test]
    fn invalid_names_are_rejected() {
        for name in ["a.a", "a.a.a", "_.A", "1a.A", "a.", "", "a b", "func"] {
            let result = prepared(&[name]).map(|_| ());
            assert_eq!(
                result.map_err(|e| e.kind),
                Err(ErrorKind::InvalidIdentifier {
                    name: name.to_string()
                }),
                "{name:?}"
            );
        }
    }

    #[test]
    fn namespace_collides_with_plain_name() {
        let result = prepared(&["a", "a.A"]).map(|_| ());
        assert_eq!(
            result.map_err(|e| e.kind),
            Err(ErrorKind::NamespaceCollision {
                name: "a".to_string()
            })
        );
    }

    #[test]
    fn type_bindings() {
        let celsius = Type::named("Celsius", &Type::float64());
        let idents = Identifiers::from_types([
            ("Celsius", celsius.clone()),
            ("units.Kelvin", Type::named("Kelvin", &Type::float64())),
        ]);
        assert_eq!(idents.len(), 2);
        let Ok(scope) = idents.prepare() else {
            panic!("valid bindings");
        };
        assert!(matches!(scope.get("Celsius"), Some(Value::Type(ty)) if *ty == celsius));
        let Some(Value::Namespace(members)) = scope.get("units") else {
            panic!("namespace units expected");
        };
        assert!(matches!(members.get("Kelvin"), Some(Value::Type(_))));
    }

    #[test]
    fn regulars_become_addressable() {
        let idents = Identifiers::new().with("x", RtValue::int(3));
        let Ok(scope) = idents.prepare() else {
            panic!("valid bindings");
        };
        let Some(Value::Data(Data::Regular(x))) = scope.get("x") else {
            panic!("x is regular");
        };
        assert!(x.can_addr());
        assert_eq!(x.as_i64(), 3);
        let Some(Value::Data(Data::Regular(original))) = idents.get("x") else {
            panic!("x is regular");
        };
        assert!(!original.can_addr());
    }
}

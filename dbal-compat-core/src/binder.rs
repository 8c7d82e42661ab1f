//! Parameter binding for statement builders.
//!
//! Every builder owns a [`ParameterBinder`]. Binding returns the placeholder
//! name so it can be embedded straight into an expression:
//!
//! ```
//! use dbal_compat_core::ParameterBinder;
//!
//! let mut binder = ParameterBinder::new();
//! assert_eq!(binder.bind_value(4), ":placeholder1");
//! assert_eq!(binder.bind_value("news"), ":placeholder2");
//! ```

use std::sync::{Arc, Mutex, OnceLock};

use crate::value::{BoundParameter, ParamKey, ParamType, Value};
use crate::{Error, Result};

fn placeholder_name_regex() -> &'static regex::Regex {
    static RE: OnceLock<regex::Regex> = OnceLock::new();
    RE.get_or_init(|| {
        regex::Regex::new(r"^:[A-Za-z0-9_]+$").expect("invalid built-in placeholder regex")
    })
}

/// Check that `name` is a valid named placeholder (`:name`)
pub fn validate_placeholder_name(name: &str) -> Result<()> {
    if placeholder_name_regex().is_match(name) {
        Ok(())
    } else {
        Err(Error::invalid_placeholder(name))
    }
}

/// Shared slot whose value is read when the statement executes
///
/// ```
/// use dbal_compat_core::{ParamRef, ParameterBinder, Value};
///
/// let uid = ParamRef::new(0);
/// let mut binder = ParameterBinder::new();
/// binder.bind_param(&uid);
/// uid.set(42);
/// assert_eq!(binder.resolve().unwrap()[0].value, Value::I32(42));
/// ```
#[derive(Debug, Clone, Default)]
pub struct ParamRef(Arc<Mutex<Value>>);

impl ParamRef {
    pub fn new(value: impl Into<Value>) -> Self {
        Self(Arc::new(Mutex::new(value.into())))
    }

    pub fn set(&self, value: impl Into<Value>) {
        *self.0.lock().unwrap_or_else(|e| e.into_inner()) = value.into();
    }

    pub fn get(&self) -> Value {
        self.0.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

#[derive(Debug, Clone)]
enum Slot {
    Value(Value),
    Reference(ParamRef),
}

#[derive(Debug, Clone)]
struct Binding {
    name: String,
    slot: Slot,
    declared: ParamType,
}

/// Values and references bound to one statement
#[derive(Debug, Clone, Default)]
pub struct ParameterBinder {
    counter: usize,
    bindings: Vec<Binding>,
}

impl ParameterBinder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a value under a generated `:placeholderN` name
    pub fn bind_value(&mut self, value: impl Into<Value>) -> String {
        let value = value.into();
        let declared = ParamType::guess(&value);
        let name = self.next_name();
        self.push(name.clone(), Slot::Value(value), declared);
        name
    }

    /// Bind a value under an explicit or generated name with a declared type.
    ///
    /// The declared type is checked against the value right away.
    pub fn bind_value_as(
        &mut self,
        value: impl Into<Value>,
        placeholder: Option<&str>,
        param_type: ParamType,
    ) -> Result<String> {
        let value = value.into();
        let name = self.placeholder_for(placeholder)?;
        let declared = param_type.resolve(&name, &value)?;
        self.push(name.clone(), Slot::Value(value), declared);
        Ok(name)
    }

    /// Bind a reference under a generated name; its value is read at execution
    pub fn bind_param(&mut self, param: &ParamRef) -> String {
        let name = self.next_name();
        self.push(name.clone(), Slot::Reference(param.clone()), ParamType::Auto);
        name
    }

    /// Bind a reference with an explicit or generated name and a declared type.
    ///
    /// The declared type is checked when the value is read at execution.
    pub fn bind_param_as(
        &mut self,
        param: &ParamRef,
        placeholder: Option<&str>,
        param_type: ParamType,
    ) -> Result<String> {
        let name = self.placeholder_for(placeholder)?;
        self.push(name.clone(), Slot::Reference(param.clone()), param_type);
        Ok(name)
    }

    /// Placeholder names in binding order
    pub fn names(&self) -> Vec<&str> {
        self.bindings.iter().map(|b| b.name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Read every binding into a driver-ready parameter list.
    ///
    /// References are dereferenced now and their declared type checked.
    pub fn resolve(&self) -> Result<Vec<BoundParameter>> {
        self.bindings
            .iter()
            .map(|binding| {
                let value = match &binding.slot {
                    Slot::Value(value) => value.clone(),
                    Slot::Reference(param) => param.get(),
                };
                let param_type = binding.declared.resolve(&binding.name, &value)?;
                Ok(BoundParameter {
                    key: ParamKey::Named(binding.name.clone()),
                    value,
                    param_type,
                })
            })
            .collect()
    }

    /// Drop all bindings. Generated names keep counting up.
    pub fn clear(&mut self) {
        self.bindings.clear();
    }

    fn next_name(&mut self) -> String {
        self.counter += 1;
        format!(":placeholder{}", self.counter)
    }

    fn placeholder_for(&mut self, placeholder: Option<&str>) -> Result<String> {
        match placeholder {
            Some(name) => {
                validate_placeholder_name(name)?;
                Ok(name.to_string())
            }
            None => Ok(self.next_name()),
        }
    }

    fn push(&mut self, name: String, slot: Slot, declared: ParamType) {
        let binding = Binding {
            name,
            slot,
            declared,
        };
        match self.bindings.iter_mut().find(|b| b.name == binding.name) {
            Some(existing) => *existing = binding,
            None => self.bindings.push(binding),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::QueryErrorKind;

    #[test]
    fn test_default_reference_reads_null_until_set() {
        let slot = ParamRef::default();
        let mut binder = ParameterBinder::new();
        binder.bind_param(&slot);
        assert_eq!(binder.resolve().unwrap()[0].value, Value::Null);

        slot.set("late");
        assert_eq!(binder.resolve().unwrap()[0].value, Value::from("late"));
    }

    #[test]
    fn test_generated_names_increase() {
        let mut binder = ParameterBinder::new();
        assert_eq!(binder.bind_value(1), ":placeholder1");
        assert_eq!(binder.bind_value("a"), ":placeholder2");
        let r = ParamRef::new(3);
        assert_eq!(binder.bind_param(&r), ":placeholder3");
        assert_eq!(binder.names(), vec![":placeholder1", ":placeholder2", ":placeholder3"]);
    }

    #[test]
    fn test_explicit_name_does_not_advance_counter() {
        let mut binder = ParameterBinder::new();
        assert_eq!(
            binder.bind_value_as(1, Some(":uid"), ParamType::Auto).unwrap(),
            ":uid"
        );
        assert_eq!(binder.bind_value(2), ":placeholder1");
    }

    #[test]
    fn test_invalid_placeholder_name() {
        let mut binder = ParameterBinder::new();
        for name in ["uid", ":", ":u-id", ": uid"] {
            let err = binder
                .bind_value_as(1, Some(name), ParamType::Auto)
                .unwrap_err();
            assert_eq!(err.query_kind(), Some(QueryErrorKind::InvalidPlaceholderName));
        }
        assert!(binder.is_empty());
    }

    #[test]
    fn test_auto_types() {
        let mut binder = ParameterBinder::new();
        binder.bind_value(true);
        binder.bind_value(7i64);
        binder.bind_value(Value::Null);
        binder.bind_value("x");
        binder.bind_value(1.5);
        let types: Vec<ParamType> = binder
            .resolve()
            .unwrap()
            .into_iter()
            .map(|p| p.param_type)
            .collect();
        assert_eq!(
            types,
            vec![
                ParamType::Bool,
                ParamType::Int,
                ParamType::Null,
                ParamType::Str,
                ParamType::Str
            ]
        );
    }

    #[test]
    fn test_declared_type_mismatch() {
        let mut binder = ParameterBinder::new();
        let err = binder
            .bind_value_as("abc", None, ParamType::Int)
            .unwrap_err();
        assert_eq!(err.query_kind(), Some(QueryErrorKind::TypeMismatch));
    }

    #[test]
    fn test_reference_reads_final_value() {
        let mut binder = ParameterBinder::new();
        let param = ParamRef::new(0);
        let name = binder.bind_param(&param);
        for uid in 1..=3 {
            param.set(uid);
        }
        let resolved = binder.resolve().unwrap();
        assert_eq!(resolved[0].key, ParamKey::Named(name));
        assert_eq!(resolved[0].value, Value::I32(3));
    }

    #[test]
    fn test_reference_type_checked_on_resolve() {
        let mut binder = ParameterBinder::new();
        let param = ParamRef::new(1);
        binder
            .bind_param_as(&param, Some(":uid"), ParamType::Int)
            .unwrap();
        assert!(binder.resolve().is_ok());
        param.set("one");
        let err = binder.resolve().unwrap_err();
        assert_eq!(err.query_kind(), Some(QueryErrorKind::TypeMismatch));
    }

    #[test]
    fn test_rebinding_name_replaces_value() {
        let mut binder = ParameterBinder::new();
        binder.bind_value_as(1, Some(":uid"), ParamType::Auto).unwrap();
        binder.bind_value_as(2, Some(":uid"), ParamType::Auto).unwrap();
        let resolved = binder.resolve().unwrap();
        assert_eq!(resolved.len(), 1);
        assert_eq!(resolved[0].value, Value::I32(2));
    }

    #[test]
    fn test_clear_keeps_counter() {
        let mut binder = ParameterBinder::new();
        binder.bind_value(1);
        binder.clear();
        assert!(binder.is_empty());
        assert_eq!(binder.bind_value(2), ":placeholder2");
    }
}

use crate::value::CoreValue;

/// Constructs typed value handles for decoded scalars.
///
/// Implementations are shared across every node snapshot of a tree view and
/// must therefore be `Send + Sync`.
pub trait ValueFactory: Send + Sync {
    fn long(&self, value: i64) -> CoreValue;

    fn double(&self, value: f64) -> CoreValue;

    fn boolean(&self, value: bool) -> CoreValue;

    fn string(&self, value: String) -> CoreValue;
}

/// Factory that maps each scalar directly onto its [`CoreValue`] variant.
#[derive(Clone, Copy, Debug, Default)]
pub struct PlainValueFactory;

impl ValueFactory for PlainValueFactory {
    fn long(&self, value: i64) -> CoreValue {
        CoreValue::Long(value)
    }

    fn double(&self, value: f64) -> CoreValue {
        CoreValue::Double(value)
    }

    fn boolean(&self, value: bool) -> CoreValue {
        CoreValue::Boolean(value)
    }

    fn string(&self, value: String) -> CoreValue {
        CoreValue::String(value)
    }
}

//! Values stored in a [`FrozenMap`].
//!
//! A value is either a [`Scalar`], which is always replaced wholesale, or a
//! nested map, which takes part in recursive merges. Lists are scalars: they
//! are never merged element-wise.

use std::any::Any;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;

use crate::map::FrozenMap;

/// An arbitrary payload carried as an opaque scalar.
///
/// Opaque values compare equal only when they share the same allocation.
#[derive(Clone)]
pub struct Opaque {
    inner: Arc<dyn Any + Send + Sync>,
    type_name: &'static str,
}

impl Opaque {
    /// Wrap a payload.
    #[must_use]
    pub fn new<T: Any + Send + Sync>(payload: T) -> Self {
        Self {
            inner: Arc::new(payload),
            type_name: std::any::type_name::<T>(),
        }
    }

    /// Borrow the payload if it is a `T`.
    #[must_use]
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.inner.downcast_ref::<T>()
    }

    /// Name of the wrapped type.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }
}

impl PartialEq for Opaque {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for Opaque {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<opaque {}>", self.type_name)
    }
}

/// A leaf value. Scalars are replaced, never merged.
#[derive(Clone, PartialEq)]
pub enum Scalar {
    /// Explicitly unset.
    Null,
    /// Boolean flag.
    Bool(bool),
    /// Signed integer.
    Int(i64),
    /// Floating point number.
    Float(f64),
    /// String.
    Str(String),
    /// Ordered list, treated as a single opaque value.
    List(Vec<Value>),
    /// Any other payload.
    Opaque(Opaque),
}

impl fmt::Debug for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "null"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(x) => write!(f, "{x:?}"),
            Self::Str(s) => write!(f, "{s:?}"),
            Self::List(items) => f.debug_list().entries(items).finish(),
            Self::Opaque(o) => write!(f, "{o:?}"),
        }
    }
}

/// A value bound to a key in a [`FrozenMap`].
#[derive(Clone, PartialEq)]
pub enum Value {
    /// A leaf value.
    Scalar(Scalar),
    /// A nested map, shared between every map that did not change it.
    Nested(Arc<FrozenMap>),
}

impl Value {
    /// The null scalar.
    #[must_use]
    pub fn null() -> Self {
        Self::Scalar(Scalar::Null)
    }

    /// Wrap an arbitrary payload as an opaque scalar.
    #[must_use]
    pub fn opaque<T: Any + Send + Sync>(payload: T) -> Self {
        Self::Scalar(Scalar::Opaque(Opaque::new(payload)))
    }

    /// Short name of the variant, for diagnostics.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Scalar(Scalar::Null) => "null",
            Self::Scalar(Scalar::Bool(_)) => "bool",
            Self::Scalar(Scalar::Int(_)) => "int",
            Self::Scalar(Scalar::Float(_)) => "float",
            Self::Scalar(Scalar::Str(_)) => "string",
            Self::Scalar(Scalar::List(_)) => "list",
            Self::Scalar(Scalar::Opaque(_)) => "opaque",
            Self::Nested(_) => "map",
        }
    }

    /// Whether this value takes part in recursive merges.
    #[must_use]
    pub fn is_map(&self) -> bool {
        matches!(self, Self::Nested(_))
    }

    /// Whether this is the null scalar.
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Scalar(Scalar::Null))
    }

    /// Boolean contents, if any.
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Scalar(Scalar::Bool(b)) => Some(*b),
            _ => None,
        }
    }

    /// Integer contents, if any.
    #[must_use]
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Scalar(Scalar::Int(i)) => Some(*i),
            _ => None,
        }
    }

    /// Float contents, if any. Integers are not converted.
    #[must_use]
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Self::Scalar(Scalar::Float(x)) => Some(*x),
            _ => None,
        }
    }

    /// String contents, if any.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Scalar(Scalar::Str(s)) => Some(s),
            _ => None,
        }
    }

    /// List contents, if any.
    #[must_use]
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Self::Scalar(Scalar::List(items)) => Some(items),
            _ => None,
        }
    }

    /// Nested map, if any.
    #[must_use]
    pub fn as_map(&self) -> Option<&Arc<FrozenMap>> {
        match self {
            Self::Nested(map) => Some(map),
            Self::Scalar(_) => None,
        }
    }

    /// Opaque payload downcast to `T`, if this is an opaque `T`.
    #[must_use]
    pub fn as_opaque<T: Any>(&self) -> Option<&T> {
        match self {
            Self::Scalar(Scalar::Opaque(o)) => o.downcast_ref::<T>(),
            _ => None,
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scalar(s) => fmt::Debug::fmt(s, f),
            Self::Nested(map) => fmt::Debug::fmt(map.as_ref(), f),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scalar(Scalar::Str(s)) => f.write_str(s),
            Self::Scalar(s) => fmt::Debug::fmt(s, f),
            Self::Nested(map) => fmt::Display::fmt(map.as_ref(), f),
        }
    }
}

impl From<Scalar> for Value {
    fn from(s: Scalar) -> Self {
        Self::Scalar(s)
    }
}

impl From<Opaque> for Value {
    fn from(o: Opaque) -> Self {
        Self::Scalar(Scalar::Opaque(o))
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Scalar(Scalar::Bool(b))
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Self::Scalar(Scalar::Int(i64::from(i)))
    }
}

impl From<u32> for Value {
    fn from(i: u32) -> Self {
        Self::Scalar(Scalar::Int(i64::from(i)))
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Self::Scalar(Scalar::Int(i))
    }
}

impl From<f32> for Value {
    fn from(x: f32) -> Self {
        Self::Scalar(Scalar::Float(f64::from(x)))
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Self::Scalar(Scalar::Float(x))
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Scalar(Scalar::Str(s.to_owned()))
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Scalar(Scalar::Str(s))
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Self::Scalar(Scalar::List(items.into_iter().map(Into::into).collect()))
    }
}

impl From<FrozenMap> for Value {
    fn from(map: FrozenMap) -> Self {
        Self::Nested(Arc::new(map))
    }
}

impl From<Arc<FrozenMap>> for Value {
    fn from(map: Arc<FrozenMap>) -> Self {
        Self::Nested(map)
    }
}

impl From<&Value> for Value {
    fn from(v: &Value) -> Self {
        v.clone()
    }
}

impl<K: Into<String>, V: Into<Value>> From<BTreeMap<K, V>> for Value {
    fn from(map: BTreeMap<K, V>) -> Self {
        Self::from(map.into_iter().collect::<FrozenMap>())
    }
}

impl<K: Into<String>, V: Into<Value>, S> From<HashMap<K, V, S>> for Value {
    fn from(map: HashMap<K, V, S>) -> Self {
        Self::from(map.into_iter().collect::<FrozenMap>())
    }
}

macro_rules! partial_eq_scalar {
    ($($ty:ty => |$other:ident| $accessor:ident == $conv:expr;)*) => {
        $(
            impl PartialEq<$ty> for Value {
                fn eq(&self, $other: &$ty) -> bool {
                    self.$accessor() == Some($conv)
                }
            }
        )*
    };
}

partial_eq_scalar! {
    bool => |other| as_bool == *other;
    i32 => |other| as_int == i64::from(*other);
    i64 => |other| as_int == *other;
    f64 => |other| as_float == *other;
    str => |other| as_str == other;
    &str => |other| as_str == *other;
    String => |other| as_str == other.as_str();
}

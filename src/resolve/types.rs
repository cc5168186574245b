//! Type descriptors and the member registry.
//!
//! Rust has no runtime reflection, so every type that rows (or their nested
//! members) can have is described up front: named member getters, at most
//! one single-parameter indexer, and optionally a natural ordering.

use std::any::{type_name, Any, TypeId};
use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;
use std::marker::PhantomData;

use crate::resolve::{ObjectRef, Record, Value};

type Erased = dyn Any + Send + Sync;
type Getter = Box<dyn Fn(&Erased) -> Option<Value> + Send + Sync>;
type DynamicGetter = Box<dyn Fn(&Erased, &str) -> Option<Value> + Send + Sync>;
type IndexGetter = Box<dyn Fn(&Erased, &IndexArg) -> Option<Value> + Send + Sync>;
type Comparer = Box<dyn Fn(&Erased, &Erased) -> Option<Ordering> + Send + Sync>;

// == Type Key ==
/// Identity of a described Rust type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeKey {
    id: TypeId,
    name: &'static str,
}

impl TypeKey {
    pub fn of<T: Any>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: type_name::<T>(),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Type name without its module path.
    pub fn short_name(&self) -> &'static str {
        let base = self.name.split('<').next().unwrap_or(self.name);
        match base.rfind("::") {
            Some(pos) => &self.name[pos + 2..],
            None => self.name,
        }
    }
}

// == Value Type ==
/// Declared type of a member, used for resolution without an instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueType {
    Bool,
    Integer,
    Float,
    Text,
    List(Box<ValueType>),
    Object(TypeKey),
    /// Only known once a value exists
    Dynamic,
}

impl ValueType {
    pub fn list_of(element: ValueType) -> Self {
        ValueType::List(Box::new(element))
    }

    pub fn object<T: Any>() -> Self {
        ValueType::Object(TypeKey::of::<T>())
    }
}

// == Indexers ==
/// Parameter type of an indexer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexKind {
    Integer,
    Text,
}

/// Converted indexer argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndexArg {
    Integer(i64),
    Text(String),
}

impl IndexKind {
    /// Converts bracket text into an argument of this kind.
    ///
    /// Text may be quoted with `'` or `"`; integers may not.
    pub fn convert(self, raw: &str) -> Option<IndexArg> {
        let raw = raw.trim();
        match self {
            IndexKind::Integer => raw.parse().ok().map(IndexArg::Integer),
            IndexKind::Text => Some(IndexArg::Text(unquote(raw).to_string())),
        }
    }
}

fn unquote(raw: &str) -> &str {
    for quote in ['"', '\''] {
        if raw.len() >= 2 && raw.starts_with(quote) && raw.ends_with(quote) {
            return &raw[1..raw.len() - 1];
        }
    }
    raw
}

struct Indexer {
    kind: IndexKind,
    element: ValueType,
    get: IndexGetter,
}

struct Member {
    ty: ValueType,
    get: Getter,
}

enum Members {
    Declared(HashMap<String, Member>),
    /// Any name may exist; all members are [`ValueType::Dynamic`].
    Dynamic(DynamicGetter),
}

// == Type Descriptor ==
/// Everything the resolver may do with one type.
pub struct TypeDescriptor {
    key: TypeKey,
    members: Members,
    indexer: Option<Indexer>,
    ordering: Option<Comparer>,
}

impl TypeDescriptor {
    pub fn key(&self) -> TypeKey {
        self.key
    }

    pub fn is_ordered(&self) -> bool {
        self.ordering.is_some()
    }

    pub fn member_value(&self, object: &ObjectRef, name: &str) -> Option<Value> {
        match &self.members {
            Members::Declared(members) => (members.get(name)?.get)(object.data()),
            Members::Dynamic(get) => get(object.data(), name),
        }
    }

    pub fn member_type(&self, name: &str) -> Option<ValueType> {
        match &self.members {
            Members::Declared(members) => members.get(name).map(|member| member.ty.clone()),
            Members::Dynamic(_) => Some(ValueType::Dynamic),
        }
    }

    /// Converts `raw` to the indexer's parameter type and invokes it.
    pub fn index_value(&self, object: &ObjectRef, raw: &str) -> Option<Value> {
        let indexer = self.indexer.as_ref()?;
        let arg = indexer.kind.convert(raw)?;
        (indexer.get)(object.data(), &arg)
    }

    pub fn index_type(&self, raw: &str) -> Option<ValueType> {
        let indexer = self.indexer.as_ref()?;
        indexer.kind.convert(raw)?;
        Some(indexer.element.clone())
    }

    fn compare(&self, a: &ObjectRef, b: &ObjectRef) -> Option<Ordering> {
        let ordering = self.ordering.as_ref()?;
        ordering(a.data(), b.data())
    }
}

impl fmt::Debug for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut members: Vec<&str> = match &self.members {
            Members::Declared(members) => members.keys().map(String::as_str).collect(),
            Members::Dynamic(_) => vec!["*"],
        };
        members.sort_unstable();
        f.debug_struct("TypeDescriptor")
            .field("type", &self.key.short_name())
            .field("members", &members)
            .field("indexer", &self.indexer.as_ref().map(|i| i.kind))
            .field("ordered", &self.is_ordered())
            .finish()
    }
}

// == Type Builder ==
/// Declares the members of `T` for [`TypeRegistry::register`].
pub struct TypeBuilder<T> {
    descriptor: TypeDescriptor,
    _marker: PhantomData<fn(&T)>,
}

impl<T: Any + Send + Sync> TypeBuilder<T> {
    fn new() -> Self {
        Self {
            descriptor: TypeDescriptor {
                key: TypeKey::of::<T>(),
                members: Members::Declared(HashMap::new()),
                indexer: None,
                ordering: None,
            },
            _marker: PhantomData,
        }
    }

    /// Adds a readable member. Return [`Value::Null`] for an empty member.
    pub fn member<F>(mut self, name: &str, ty: ValueType, get: F) -> Self
    where
        F: Fn(&T) -> Value + Send + Sync + 'static,
    {
        let get: Getter = Box::new(move |data: &Erased| data.downcast_ref::<T>().map(&get));
        if let Members::Declared(members) = &mut self.descriptor.members {
            members.insert(name.to_string(), Member { ty, get });
        }
        self
    }

    /// Sets the single-parameter indexer, replacing any previous one.
    pub fn indexer<F>(mut self, kind: IndexKind, element: ValueType, get: F) -> Self
    where
        F: Fn(&T, &IndexArg) -> Option<Value> + Send + Sync + 'static,
    {
        self.descriptor.indexer = Some(Indexer {
            kind,
            element,
            get: Box::new(move |data: &Erased, arg: &IndexArg| {
                get(data.downcast_ref::<T>()?, arg)
            }),
        });
        self
    }

    /// Gives `T` a natural ordering, making columns of this type sortable.
    pub fn ordered_by<F>(mut self, compare: F) -> Self
    where
        F: Fn(&T, &T) -> Ordering + Send + Sync + 'static,
    {
        self.descriptor.ordering = Some(Box::new(move |a: &Erased, b: &Erased| {
            Some(compare(a.downcast_ref::<T>()?, b.downcast_ref::<T>()?))
        }));
        self
    }
}

impl<T: Any + Send + Sync + Ord> TypeBuilder<T> {
    /// Uses `T`'s own `Ord` implementation as natural ordering.
    pub fn ordered(self) -> Self {
        self.ordered_by(Ord::cmp)
    }
}

// == Type Registry ==
/// Map from type to descriptor, consulted for every member access.
///
/// [`Record`] rows are always registered.
#[derive(Debug)]
pub struct TypeRegistry {
    types: HashMap<TypeKey, TypeDescriptor>,
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeRegistry {
    pub fn new() -> Self {
        let mut registry = Self {
            types: HashMap::new(),
        };
        registry.insert(record_descriptor());
        registry
    }

    /// Describes `T`, replacing any earlier description.
    pub fn register<T, F>(&mut self, build: F) -> &mut Self
    where
        T: Any + Send + Sync,
        F: FnOnce(TypeBuilder<T>) -> TypeBuilder<T>,
    {
        let descriptor = build(TypeBuilder::new()).descriptor;
        self.insert(descriptor);
        self
    }

    fn insert(&mut self, descriptor: TypeDescriptor) {
        self.types.insert(descriptor.key, descriptor);
    }

    pub fn describe(&self, key: &TypeKey) -> Option<&TypeDescriptor> {
        self.types.get(key)
    }

    pub fn contains(&self, key: &TypeKey) -> bool {
        self.types.contains_key(key)
    }

    /// Whether values of this declared type have a natural ordering.
    ///
    /// `Dynamic` is reported as orderable: only the values can tell.
    pub fn is_orderable(&self, ty: &ValueType) -> bool {
        match ty {
            ValueType::Bool
            | ValueType::Integer
            | ValueType::Float
            | ValueType::Text
            | ValueType::Dynamic => true,
            ValueType::List(_) => false,
            ValueType::Object(key) => self.describe(key).is_some_and(TypeDescriptor::is_ordered),
        }
    }

    /// Natural ordering of two present values, or `None` if they are not
    /// comparable.
    ///
    /// Integers and floats compare exactly by numeric value, with `-0.0`
    /// equal to `0.0` and NaNs at the ends as in `f64::total_cmp`. Text compares ordinally. Objects compare only when both
    /// have the same ordered type. Lists never compare.
    pub fn compare(&self, a: &Value, b: &Value) -> Option<Ordering> {
        match (a, b) {
            (Value::Bool(x), Value::Bool(y)) => Some(x.cmp(y)),
            (Value::Integer(x), Value::Integer(y)) => Some(x.cmp(y)),
            (Value::Integer(x), Value::Float(y)) => Some(cmp_integer_float(*x, *y)),
            (Value::Float(x), Value::Integer(y)) => Some(cmp_integer_float(*y, *x).reverse()),
            (Value::Float(x), Value::Float(y)) => Some(cmp_floats(*x, *y)),
            (Value::Text(x), Value::Text(y)) => Some(x.cmp(y)),
            (Value::Object(x), Value::Object(y)) if x.type_key() == y.type_key() => {
                self.describe(&x.type_key())?.compare(x, y)
            }
            _ => None,
        }
    }
}

// == Numeric Ordering ==
/// 2^63, the first float above `i64::MAX`.
const I64_LIMIT: f64 = 9_223_372_036_854_775_808.0;

fn cmp_floats(x: f64, y: f64) -> Ordering {
    x.partial_cmp(&y).unwrap_or_else(|| x.total_cmp(&y))
}

/// Exact comparison without rounding `int` to a float.
fn cmp_integer_float(int: i64, float: f64) -> Ordering {
    if float.is_nan() {
        return if float.is_sign_negative() {
            Ordering::Greater
        } else {
            Ordering::Less
        };
    }
    if float >= I64_LIMIT {
        return Ordering::Less;
    }
    if float < -I64_LIMIT {
        return Ordering::Greater;
    }
    // In range, so the truncation is exact
    let whole = float.trunc();
    int.cmp(&(whole as i64))
        .then_with(|| whole.partial_cmp(&float).unwrap_or(Ordering::Equal))
}

fn record_descriptor() -> TypeDescriptor {
    TypeDescriptor {
        key: TypeKey::of::<Record>(),
        members: Members::Dynamic(Box::new(|data: &Erased, name: &str| {
            data.downcast_ref::<Record>()?.get(name).cloned()
        })),
        indexer: Some(Indexer {
            kind: IndexKind::Text,
            element: ValueType::Dynamic,
            get: Box::new(|data: &Erased, arg: &IndexArg| match arg {
                IndexArg::Text(name) => data.downcast_ref::<Record>()?.get(name).cloned(),
                IndexArg::Integer(_) => None,
            }),
        }),
        ordering: None,
    }
}

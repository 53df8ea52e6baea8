//! Argument specifications and bound argument records

use std::fmt;
use std::sync::Arc;

use futures::future::{self, BoxFuture};
use scen_event::Event;

use crate::EngineError;

/// Pulls one typed value out of the world and an optional tree slot.
///
/// Implicit arguments are called with `None`. Extractors may recurse into other
/// expressions or fetchers, so they are asynchronous.
pub trait Extractor<C, V>: Send + Sync {
    /// Extract a value
    fn extract<'a>(
        &'a self,
        world: &'a C,
        event: Option<&'a Event>,
    ) -> BoxFuture<'a, Result<V, EngineError>>;
}

impl<C, V, F> Extractor<C, V> for F
where
    F: for<'a> Fn(&'a C, Option<&'a Event>) -> BoxFuture<'a, Result<V, EngineError>>
        + Send
        + Sync,
{
    fn extract<'a>(
        &'a self,
        world: &'a C,
        event: Option<&'a Event>,
    ) -> BoxFuture<'a, Result<V, EngineError>> {
        self(world, event)
    }
}

/// Adapter for extractors that never await
struct SyncExtractor<F>(F);

impl<C, V, F> Extractor<C, V> for SyncExtractor<F>
where
    C: Sync,
    V: Send + 'static,
    F: Fn(&C, Option<&Event>) -> Result<V, EngineError> + Send + Sync,
{
    fn extract<'a>(
        &'a self,
        world: &'a C,
        event: Option<&'a Event>,
    ) -> BoxFuture<'a, Result<V, EngineError>> {
        Box::pin(future::ready((self.0)(world, event)))
    }
}

/// Value bound to one argument
#[derive(Clone, Debug, PartialEq)]
pub enum Bound<V> {
    /// Single extracted value
    Value(V),
    /// Element-wise results of a mapped argument, or a list default
    List(Vec<V>),
    /// Nullable argument with nothing left to consume
    Nothing,
}

/// One named slot in an expression's argument schema
pub struct Arg<C, V> {
    name: String,
    extractor: Arc<dyn Extractor<C, V>>,
    default: Option<Bound<V>>,
    implicit: bool,
    variadic: bool,
    mapped: bool,
    nullable: bool,
    rescue: Option<V>,
}

impl<C, V> Arg<C, V> {
    /// Create a positional argument with an async extractor
    pub fn new<F>(name: impl Into<String>, extractor: F) -> Self
    where
        F: for<'a> Fn(&'a C, Option<&'a Event>) -> BoxFuture<'a, Result<V, EngineError>>
            + Send
            + Sync
            + 'static,
    {
        Self::with_extractor(name, extractor)
    }

    /// Create a positional argument from any [`Extractor`] implementation
    pub fn with_extractor(name: impl Into<String>, extractor: impl Extractor<C, V> + 'static) -> Self {
        Self {
            name: name.into(),
            extractor: Arc::new(extractor),
            default: None,
            implicit: false,
            variadic: false,
            mapped: false,
            nullable: false,
            rescue: None,
        }
    }

    /// Create a positional argument with a synchronous extractor
    pub fn sync<F>(name: impl Into<String>, extractor: F) -> Self
    where
        C: Sync + 'static,
        V: Send + 'static,
        F: Fn(&C, Option<&Event>) -> Result<V, EngineError> + Send + Sync + 'static,
    {
        Self::with_extractor(name, SyncExtractor(extractor))
    }

    /// Value used when the positional slot is absent
    pub fn default(mut self, value: V) -> Self {
        self.default = Some(Bound::Value(value));
        self
    }

    /// List value used when the positional slot is absent
    pub fn default_list(mut self, values: Vec<V>) -> Self {
        self.default = Some(Bound::List(values));
        self
    }

    /// Derive the value from the world only; consumes no slot
    pub fn implicit(mut self) -> Self {
        self.implicit = true;
        self
    }

    /// Consume every remaining slot
    pub fn variadic(mut self) -> Self {
        self.variadic = true;
        self
    }

    /// Apply the extractor to each element rather than the whole slot
    pub fn mapped(mut self) -> Self {
        self.mapped = true;
        self
    }

    /// Bind [`Bound::Nothing`] when no slots remain
    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    /// Value substituted when extraction fails; mapped arguments bind it as a
    /// one-element list
    pub fn rescue(mut self, value: V) -> Self {
        self.rescue = Some(value);
        self
    }

    /// Argument name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether the argument consumes the tail
    pub fn is_variadic(&self) -> bool {
        self.variadic
    }

    /// Whether the argument consumes no slot
    pub fn is_implicit(&self) -> bool {
        self.implicit
    }

    /// Whether the extractor is applied element-wise
    pub fn is_mapped(&self) -> bool {
        self.mapped
    }

    /// Whether an empty remainder binds nothing
    pub fn is_nullable(&self) -> bool {
        self.nullable
    }

    pub(crate) fn default_value(&self) -> Option<&Bound<V>> {
        self.default.as_ref()
    }

    pub(crate) fn rescue_value(&self) -> Option<&V> {
        self.rescue.as_ref()
    }

    pub(crate) async fn extract(&self, world: &C, event: Option<&Event>) -> Result<V, EngineError> {
        self.extractor.extract(world, event).await
    }

    /// Extract each element concurrently; results keep input order.
    pub(crate) async fn extract_each(&self, world: &C, events: &[Event]) -> Result<Vec<V>, EngineError> {
        future::try_join_all(
            events
                .iter()
                .map(|event| self.extractor.extract(world, Some(event))),
        )
        .await
    }
}

impl<C, V: fmt::Debug> fmt::Debug for Arg<C, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Arg")
            .field("name", &self.name)
            .field("default", &self.default)
            .field("implicit", &self.implicit)
            .field("variadic", &self.variadic)
            .field("mapped", &self.mapped)
            .field("nullable", &self.nullable)
            .field("rescue", &self.rescue)
            .finish()
    }
}

/// Arguments bound by [`Expression::bind`](crate::Expression::bind), in
/// declaration order
#[derive(Clone, Debug, PartialEq)]
pub struct BoundArgs<V> {
    entries: Vec<(String, Bound<V>)>,
}

impl<V> Default for BoundArgs<V> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<V> BoundArgs<V> {
    /// Create an empty record
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a bound argument
    pub fn insert(&mut self, name: impl Into<String>, bound: Bound<V>) {
        self.entries.push((name.into(), bound));
    }

    /// Look up a bound argument
    pub fn get(&self, name: &str) -> Option<&Bound<V>> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, bound)| bound)
    }

    /// Remove a bound argument
    pub fn take(&mut self, name: &str) -> Result<Bound<V>, EngineError> {
        let index = self
            .entries
            .iter()
            .position(|(n, _)| n == name)
            .ok_or_else(|| EngineError::Unbound(name.to_string()))?;
        Ok(self.entries.remove(index).1)
    }

    /// Remove a single value
    pub fn value(&mut self, name: &str) -> Result<V, EngineError> {
        match self.take(name)? {
            Bound::Value(value) => Ok(value),
            _ => Err(EngineError::ArgShape {
                arg: name.to_string(),
                expected: "a single value",
            }),
        }
    }

    /// Remove a list of values
    pub fn list(&mut self, name: &str) -> Result<Vec<V>, EngineError> {
        match self.take(name)? {
            Bound::List(values) => Ok(values),
            _ => Err(EngineError::ArgShape {
                arg: name.to_string(),
                expected: "a list of values",
            }),
        }
    }

    /// Remove a nullable value
    pub fn optional(&mut self, name: &str) -> Result<Option<V>, EngineError> {
        match self.take(name)? {
            Bound::Value(value) => Ok(Some(value)),
            Bound::Nothing => Ok(None),
            Bound::List(_) => Err(EngineError::ArgShape {
                arg: name.to_string(),
                expected: "a single value or nothing",
            }),
        }
    }

    /// Names in binding order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    /// Number of bound arguments
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if nothing is bound
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Typed argument record of one expression
pub trait FromArgs<V>: Sized {
    /// Build the record from the bound arguments
    fn from_args(args: BoundArgs<V>) -> Result<Self, EngineError>;
}

impl<V> FromArgs<V> for BoundArgs<V> {
    fn from_args(args: BoundArgs<V>) -> Result<Self, EngineError> {
        Ok(args)
    }
}

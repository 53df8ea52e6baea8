//! Commands, views and fetchers

use std::sync::Arc;

use async_trait::async_trait;
use futures::future::{self, BoxFuture};
use scen_event::Event;

use crate::arg::{Arg, BoundArgs, FromArgs};
use crate::expression::Expression;
use crate::world::Address;
use crate::EngineError;

type Step<C> = BoxFuture<'static, Result<C, EngineError>>;

enum Processor<C, A> {
    Caller(Arc<dyn Fn(C, Address, A) -> Step<C> + Send + Sync>),
    View(Arc<dyn Fn(C, A) -> Step<C> + Send + Sync>),
}

type FetchFn<C, A, R> =
    Arc<dyn for<'a> Fn(&'a C, A) -> BoxFuture<'a, Result<R, EngineError>> + Send + Sync>;

/// Type-erased command, so lists of commands with different argument records
/// can be dispatched together
#[async_trait]
pub trait Process<C>: Send + Sync {
    /// Command name
    fn name(&self) -> &str;

    /// Whether the event names this command
    fn matches(&self, event: &Event) -> bool;

    /// Bind the event and run the processor, returning the next world
    async fn process(&self, world: C, from: Option<Address>, event: &Event) -> Result<C, EngineError>;
}

/// Type-erased fetcher
#[async_trait]
pub trait Fetch<C, R>: Send + Sync {
    /// Fetcher name
    fn name(&self) -> &str;

    /// Whether the event names this fetcher
    fn matches(&self, event: &Event) -> bool;

    /// Bind the event and compute the value
    async fn fetch(&self, world: &C, event: &Event) -> Result<R, EngineError>;
}

/// An expression bound to a processor that produces the next world.
///
/// Lifecycle of one invocation: matched, then binding (may fail), then the
/// caller check (may fail), then the processor (may fail).
pub struct Command<C, V, A = BoundArgs<V>> {
    expression: Expression<C, V, A>,
    processor: Processor<C, A>,
}

impl<C, V, A> Command<C, V, A> {
    /// Create a command that requires a caller identity
    pub fn new<F>(
        doc: &str,
        name: impl Into<String>,
        args: Vec<Arg<C, V>>,
        processor: F,
    ) -> Result<Self, EngineError>
    where
        C: Send + 'static,
        V: 'static,
        A: 'static,
        F: Fn(C, Address, A) -> Step<C> + Send + Sync + 'static,
    {
        Ok(Self {
            expression: Expression::new(doc, name, args)?,
            processor: Processor::Caller(Arc::new(processor)),
        })
    }

    /// Create a view: a command that never needs a caller identity
    pub fn view<F>(
        doc: &str,
        name: impl Into<String>,
        args: Vec<Arg<C, V>>,
        processor: F,
    ) -> Result<Self, EngineError>
    where
        C: 'static,
        V: 'static,
        A: 'static,
        F: Fn(C, A) -> Step<C> + Send + Sync + 'static,
    {
        Ok(Self {
            expression: Expression::new(doc, name, args)?,
            processor: Processor::View(Arc::new(processor)),
        })
    }

    /// Index of the discriminant name among the event's children
    pub fn name_pos(mut self, pos: usize) -> Self {
        self.expression = self.expression.name_pos(pos);
        self
    }

    /// Match every event
    pub fn catchall(mut self) -> Self {
        self.expression = self.expression.catchall();
        self
    }

    /// Underlying expression
    pub fn expression(&self) -> &Expression<C, V, A> {
        &self.expression
    }

    /// Whether a caller identity is required
    pub fn requires_caller(&self) -> bool {
        matches!(self.processor, Processor::Caller(_))
    }
}

#[async_trait]
impl<C, V, A> Process<C> for Command<C, V, A>
where
    C: Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
    A: FromArgs<V> + Send + 'static,
{
    fn name(&self) -> &str {
        self.expression.name()
    }

    fn matches(&self, event: &Event) -> bool {
        self.expression.matches(event)
    }

    async fn process(&self, world: C, from: Option<Address>, event: &Event) -> Result<C, EngineError> {
        let name = self.expression.name();

        tracing::debug!("Binding {} from {}", name, event);
        let args = match self.expression.bind(&world, event).await {
            Ok(args) => args,
            Err(e) => {
                tracing::debug!("Binding failed for {}: {}", name, e);
                return Err(e);
            }
        };

        let step = match (&self.processor, from) {
            (Processor::Caller(_), None) => {
                tracing::debug!("Caller missing for {}", name);
                return Err(EngineError::MissingCaller(name.to_string()));
            }
            (Processor::Caller(processor), Some(from)) => processor(world, from, args),
            (Processor::View(processor), _) => processor(world, args),
        };

        tracing::debug!("Dispatching {}", name);
        let result = step.await;
        match &result {
            Ok(_) => tracing::debug!("Processor succeeded for {}", name),
            Err(e) => tracing::debug!("Processor failed for {}: {}", name, e),
        }
        result
    }
}

/// An expression bound to a pure value-producing function
pub struct Fetcher<C, V, R, A = BoundArgs<V>> {
    expression: Expression<C, V, A>,
    fetcher: FetchFn<C, A, R>,
}

impl<C, V, R, A> Fetcher<C, V, R, A> {
    /// Create a fetcher with an async function
    pub fn new<F>(
        doc: &str,
        name: impl Into<String>,
        args: Vec<Arg<C, V>>,
        fetcher: F,
    ) -> Result<Self, EngineError>
    where
        F: for<'a> Fn(&'a C, A) -> BoxFuture<'a, Result<R, EngineError>> + Send + Sync + 'static,
    {
        Ok(Self {
            expression: Expression::new(doc, name, args)?,
            fetcher: Arc::new(fetcher),
        })
    }

    /// Create a fetcher with a synchronous function
    pub fn sync<F>(
        doc: &str,
        name: impl Into<String>,
        args: Vec<Arg<C, V>>,
        fetcher: F,
    ) -> Result<Self, EngineError>
    where
        C: Sync + 'static,
        V: 'static,
        A: 'static,
        R: Send + 'static,
        F: Fn(&C, A) -> Result<R, EngineError> + Send + Sync + 'static,
    {
        Self::new(doc, name, args, move |world, args| {
            Box::pin(future::ready(fetcher(world, args)))
        })
    }

    /// Index of the discriminant name among the event's children
    pub fn name_pos(mut self, pos: usize) -> Self {
        self.expression = self.expression.name_pos(pos);
        self
    }

    /// Match every event
    pub fn catchall(mut self) -> Self {
        self.expression = self.expression.catchall();
        self
    }

    /// Underlying expression
    pub fn expression(&self) -> &Expression<C, V, A> {
        &self.expression
    }
}

#[async_trait]
impl<C, V, R, A> Fetch<C, R> for Fetcher<C, V, R, A>
where
    C: Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
    R: Send + 'static,
    A: FromArgs<V> + Send + 'static,
{
    fn name(&self) -> &str {
        self.expression.name()
    }

    fn matches(&self, event: &Event) -> bool {
        self.expression.matches(event)
    }

    async fn fetch(&self, world: &C, event: &Event) -> Result<R, EngineError> {
        let args = self.expression.bind(world, event).await?;
        (self.fetcher)(world, args).await
    }
}

/// Run the first command in `commands` that matches `event`.
///
/// Order is load-bearing: specific patterns must come before general ones and
/// a catchall command must be last, or it shadows everything after it.
pub async fn process_command_event<C>(
    kind: &str,
    commands: &[Box<dyn Process<C>>],
    world: C,
    event: &Event,
    from: Option<Address>,
) -> Result<C, EngineError>
where
    C: Send + 'static,
{
    let command = commands
        .iter()
        .find(|command| command.matches(event))
        .ok_or_else(|| EngineError::UnknownEventType {
            kind: kind.to_string(),
            event: event.clone(),
        })?;

    tracing::debug!("Matched {} command {}", kind, command.name());
    command.process(world, from, event).await
}

/// Evaluate the first fetcher in `fetchers` that matches `event`.
///
/// Same ordering rule as [`process_command_event`].
pub async fn get_fetcher_value<C, R>(
    kind: &str,
    fetchers: &[Box<dyn Fetch<C, R>>],
    world: &C,
    event: &Event,
) -> Result<R, EngineError>
where
    C: Sync + 'static,
    R: 'static,
{
    let fetcher = fetchers
        .iter()
        .find(|fetcher| fetcher.matches(event))
        .ok_or_else(|| EngineError::UnknownEventType {
            kind: kind.to_string(),
            event: event.clone(),
        })?;

    tracing::debug!("Matched {} fetcher {}", kind, fetcher.name());
    fetcher.fetch(world, event).await
}

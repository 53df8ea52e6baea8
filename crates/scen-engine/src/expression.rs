//! Expression matching and argument binding

use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use scen_event::{must_array, Event};

use crate::arg::{Arg, Bound, BoundArgs, FromArgs};
use crate::EngineError;

/// Name and documentation of an expression, used for help output
pub trait Describe: Send + Sync {
    /// Expression name
    fn name(&self) -> &str;
    /// Cleaned markdown documentation
    fn doc(&self) -> &str;
}

/// A named pattern plus argument schema that can test-match and bind an event.
///
/// `C` is the world the extractors read, `V` the value type they produce and
/// `A` the typed record the bound arguments convert into.
pub struct Expression<C, V, A = BoundArgs<V>> {
    doc: String,
    name: String,
    args: Vec<Arg<C, V>>,
    name_pos: usize,
    catchall: bool,
    sub_expressions: Vec<Arc<dyn Describe>>,
    _args: PhantomData<fn() -> A>,
}

impl<C, V, A> Expression<C, V, A> {
    /// Create an expression.
    ///
    /// Fails if more than one argument is variadic, or if a positional or
    /// nullable argument follows the variadic one (it could never be bound).
    pub fn new(
        doc: &str,
        name: impl Into<String>,
        args: Vec<Arg<C, V>>,
    ) -> Result<Self, EngineError> {
        let name = name.into();
        validate_schema(&name, &args)?;
        Ok(Self {
            doc: clean_doc(doc),
            name,
            args,
            name_pos: 0,
            catchall: false,
            sub_expressions: Vec::new(),
            _args: PhantomData,
        })
    }

    /// Index of the discriminant name among the event's children
    pub fn name_pos(mut self, pos: usize) -> Self {
        self.name_pos = pos;
        self
    }

    /// Match every event; the whole event becomes the argument payload
    pub fn catchall(mut self) -> Self {
        self.catchall = true;
        self
    }

    /// Attach documentation children
    pub fn sub_expressions(mut self, subs: Vec<Arc<dyn Describe>>) -> Self {
        self.sub_expressions = subs;
        self
    }

    /// Expression name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Cleaned documentation
    pub fn doc(&self) -> &str {
        &self.doc
    }

    /// Declared arguments
    pub fn args(&self) -> &[Arg<C, V>] {
        &self.args
    }

    /// Whether this expression matches everything
    pub fn is_catchall(&self) -> bool {
        self.catchall
    }

    /// Documentation of this expression followed by its sub-expressions
    pub fn help(&self) -> String {
        let mut out = self.doc.clone();
        for sub in &self.sub_expressions {
            out.push('\n');
            out.push_str(sub.doc());
        }
        out
    }

    /// Split an event into its name and remaining children.
    ///
    /// The name is `None` when the slot at `name_pos` is a list or does not
    /// exist; the children are then those of the whole (normalized) event.
    pub fn name_args(&self, event: &Event) -> (Option<String>, Vec<Event>) {
        let children = event.unwrap_double().as_args();

        if self.catchall {
            return (Some(self.name.clone()), children.to_vec());
        }

        match children.get(self.name_pos) {
            Some(Event::Atom(name)) => {
                let mut rest = children.to_vec();
                rest.remove(self.name_pos);
                (Some(name.clone()), rest)
            }
            _ => (None, children.to_vec()),
        }
    }

    /// Whether the event names this expression.
    ///
    /// Only the name token is consulted; comparison ignores case and
    /// surrounding whitespace.
    pub fn matches(&self, event: &Event) -> bool {
        if self.catchall {
            return true;
        }

        match self.name_args(event) {
            (Some(name), _) => same_name(&name, &self.name),
            (None, _) => false,
        }
    }
}

impl<C, V, A> Expression<C, V, A>
where
    C: Sync,
    V: Clone + Send + Sync,
    A: FromArgs<V>,
{
    /// Bind the event's children to the declared arguments, in order.
    pub async fn bind(&self, world: &C, event: &Event) -> Result<A, EngineError> {
        let (_, children) = self.name_args(event);
        let mut remaining: &[Event] = &children;
        let mut bound = BoundArgs::new();

        for arg in &self.args {
            let value = if arg.is_nullable() && remaining.is_empty() {
                Bound::Nothing
            } else if arg.is_variadic() {
                let value = if arg.is_mapped() {
                    Bound::List(arg.extract_each(world, remaining).await?)
                } else {
                    let tail = Event::List(remaining.to_vec());
                    Bound::Value(arg.extract(world, Some(&tail)).await?)
                };
                remaining = &[];
                value
            } else if arg.is_implicit() {
                Bound::Value(arg.extract(world, None).await?)
            } else {
                match remaining.split_first() {
                    None => arg.default_value().cloned().ok_or_else(|| {
                        EngineError::MissingArgument {
                            arg: arg.name().to_string(),
                            expression: self.name.clone(),
                        }
                    })?,
                    Some((first, rest)) => {
                        remaining = rest;
                        let extracted = if arg.is_mapped() {
                            arg.extract_each(world, &must_array(first))
                                .await
                                .map(Bound::List)
                        } else {
                            arg.extract(world, Some(first)).await.map(Bound::Value)
                        };
                        match (extracted, arg.rescue_value()) {
                            (Ok(value), _) => value,
                            (Err(err), Some(rescue)) => {
                                tracing::debug!(
                                    "Rescued argument {} of {}: {}",
                                    arg.name(),
                                    self.name,
                                    err
                                );
                                if arg.is_mapped() {
                                    Bound::List(vec![rescue.clone()])
                                } else {
                                    Bound::Value(rescue.clone())
                                }
                            }
                            (Err(err), None) => return Err(err),
                        }
                    }
                }
            };

            bound.insert(arg.name(), value);
        }

        if !remaining.is_empty() {
            return Err(EngineError::ExtraArguments {
                expression: self.name.clone(),
                leftover: remaining.to_vec(),
            });
        }

        A::from_args(bound)
    }
}

impl<C, V, A> Describe for Expression<C, V, A>
where
    V: Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn doc(&self) -> &str {
        &self.doc
    }
}

impl<C, V: fmt::Debug, A> fmt::Debug for Expression<C, V, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Expression")
            .field("name", &self.name)
            .field("args", &self.args)
            .field("name_pos", &self.name_pos)
            .field("catchall", &self.catchall)
            .finish()
    }
}

/// Strip leading indentation from every line and swap `"` for `` ` ``
pub fn clean_doc(doc: &str) -> String {
    doc.lines()
        .map(|line| line.trim_start().replace('"', "`"))
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

fn same_name(a: &str, b: &str) -> bool {
    a.trim().to_lowercase() == b.trim().to_lowercase()
}

fn validate_schema<C, V>(name: &str, args: &[Arg<C, V>]) -> Result<(), EngineError> {
    let invalid = |reason: String| EngineError::InvalidSchema {
        expression: name.to_string(),
        reason,
    };

    let variadics: Vec<&Arg<C, V>> = args.iter().filter(|a| a.is_variadic()).collect();
    if variadics.len() > 1 {
        return Err(invalid(format!(
            "{} variadic arguments, at most one allowed",
            variadics.len()
        )));
    }

    if let Some(pos) = args.iter().position(|a| a.is_variadic()) {
        if let Some(after) = args[pos + 1..].iter().find(|a| !a.is_implicit()) {
            return Err(invalid(format!(
                "argument {} follows variadic argument {}",
                after.name(),
                args[pos].name()
            )));
        }
    }

    Ok(())
}

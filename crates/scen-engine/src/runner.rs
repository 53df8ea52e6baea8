//! Line-by-line command loop

use scen_event::Event;

use crate::command::{process_command_event, Process};
use crate::world::Address;
use crate::EngineError;

/// Turns one line of scenario text into an event tree
pub trait Parser: Send + Sync {
    /// Parse a line
    fn parse(&self, line: &str) -> Result<Event, EngineError>;
}

/// Outcome of one evaluated line
#[derive(Debug, Clone, PartialEq)]
pub struct LineReport {
    /// 1-based line number in the input
    pub line_no: usize,
    /// Source text
    pub line: String,
    /// Error raised by the line, if any
    pub error: Option<EngineError>,
}

impl LineReport {
    /// Whether the line succeeded
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// Feeds lines through a parser and the first matching command.
///
/// A failing line keeps the world from before it; later lines still run.
pub struct CommandLoop<C, P> {
    kind: String,
    parser: P,
    commands: Vec<Box<dyn Process<C>>>,
    from: Option<Address>,
}

impl<C, P> CommandLoop<C, P>
where
    C: Clone + Send + 'static,
    P: Parser,
{
    /// Create a loop over `commands`, labelled `kind` in error messages
    pub fn new(kind: impl Into<String>, parser: P, commands: Vec<Box<dyn Process<C>>>) -> Self {
        Self {
            kind: kind.into(),
            parser,
            commands,
            from: None,
        }
    }

    /// Default caller identity for every line
    pub fn with_from(mut self, from: Address) -> Self {
        self.from = Some(from);
        self
    }

    /// Number of registered commands
    pub fn command_count(&self) -> usize {
        self.commands.len()
    }

    /// Evaluate a single line
    pub async fn eval(&self, world: C, line: &str) -> Result<C, EngineError> {
        let event = self.parser.parse(line)?;
        process_command_event(&self.kind, &self.commands, world, &event, self.from).await
    }

    /// Evaluate every line in order.
    ///
    /// Blank lines and `--` comments are skipped.
    pub async fn run<I, S>(&self, mut world: C, lines: I) -> (C, Vec<LineReport>)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut reports = Vec::new();

        for (idx, line) in lines.into_iter().enumerate() {
            let line = line.as_ref().trim();
            if line.is_empty() || line.starts_with("--") {
                continue;
            }

            let line_no = idx + 1;
            tracing::debug!("Evaluating line {}: {}", line_no, line);

            let error = match self.eval(world.clone(), line).await {
                Ok(next) => {
                    world = next;
                    None
                }
                Err(e) => {
                    tracing::error!("Line {} failed: {}", line_no, e);
                    Some(e)
                }
            };

            reports.push(LineReport {
                line_no,
                line: line.to_string(),
                error,
            });
        }

        let failed = reports.iter().filter(|r| !r.is_ok()).count();
        tracing::info!("Evaluated {} lines, {} failed", reports.len(), failed);

        (world, reports)
    }
}

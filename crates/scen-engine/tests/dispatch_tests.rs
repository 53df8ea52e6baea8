//! Dispatch tests over a small in-memory ledger world

use std::collections::HashMap;

use futures::FutureExt;
use primitive_types::U256;
use scen_engine::{
    extract, get_fetcher_value, process_command_event, Address, Arg, BoundArgs, Command,
    CommandLoop, EngineError, Fetch, Fetcher, FromArgs, Parser, Process, World,
};
use scen_event::{event, Event};

// ==================== Fixtures ====================

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_test_writer()
        .try_init();
}

#[derive(Clone, Debug, Default)]
struct Ledger {
    aliases: HashMap<String, Address>,
    balances: HashMap<Address, U256>,
    log: Vec<String>,
}

impl World for Ledger {
    fn resolve_alias(&self, alias: &str) -> Option<Address> {
        self.aliases.get(alias).copied()
    }
}

fn geoff() -> Address {
    Address::repeat_byte(0x11)
}

fn torrey() -> Address {
    Address::repeat_byte(0x22)
}

fn ledger() -> Ledger {
    let mut ledger = Ledger::default();
    ledger.aliases.insert("Geoff".to_string(), geoff());
    ledger.aliases.insert("Torrey".to_string(), torrey());
    ledger.balances.insert(geoff(), U256::from(100));
    ledger
}

#[derive(Clone, Debug, PartialEq)]
enum Value {
    Address(Address),
    Number(U256),
    Text(String),
}

fn address_arg(name: &str) -> Arg<Ledger, Value> {
    Arg::sync(name, |world, e| extract::address(world, e).map(Value::Address))
}

fn number_arg(name: &str) -> Arg<Ledger, Value> {
    Arg::sync(name, |_, e| extract::uint(e).map(Value::Number))
}

fn text_arg(name: &str) -> Arg<Ledger, Value> {
    Arg::sync(name, |_, e| extract::atom(e).map(Value::Text))
}

struct TransferArgs {
    to: Address,
    amount: U256,
}

impl FromArgs<Value> for TransferArgs {
    fn from_args(mut args: BoundArgs<Value>) -> Result<Self, EngineError> {
        let to = match args.value("to")? {
            Value::Address(a) => a,
            _ => return Err(EngineError::processor("to must be an address")),
        };
        let amount = match args.value("amount")? {
            Value::Number(n) => n,
            _ => return Err(EngineError::processor("amount must be a number")),
        };
        Ok(Self { to, amount })
    }
}

fn transfer() -> Box<dyn Process<Ledger>> {
    let command: Command<Ledger, Value, TransferArgs> = Command::new(
        "#### Transfer\n* \"Transfer <To> <Amount>\" - moves balance from the caller",
        "Transfer",
        vec![address_arg("to"), number_arg("amount")],
        |mut world: Ledger, from: Address, args: TransferArgs| {
            async move {
                let balance = world.balances.get(&from).copied().unwrap_or_default();
                if balance < args.amount {
                    return Err(EngineError::processor("insufficient balance"));
                }
                world.balances.insert(from, balance - args.amount);
                *world.balances.entry(args.to).or_default() += args.amount;
                world.log.push("Transfer".to_string());
                Ok(world)
            }
            .boxed()
        },
    )
    .unwrap();
    Box::new(command)
}

fn note() -> Box<dyn Process<Ledger>> {
    let view: Command<Ledger, Value> = Command::view(
        "#### Note\n* \"Note <Text>\" - records text",
        "Note",
        vec![text_arg("text")],
        |mut world: Ledger, mut args: BoundArgs<Value>| {
            async move {
                if let Value::Text(text) = args.value("text")? {
                    world.log.push(text);
                }
                Ok(world)
            }
            .boxed()
        },
    )
    .unwrap();
    Box::new(view)
}

fn fallback() -> Box<dyn Process<Ledger>> {
    let view: Command<Ledger, Value> = Command::view(
        "",
        "Fallback",
        vec![text_arg("words").variadic().mapped()],
        |mut world: Ledger, mut args: BoundArgs<Value>| {
            async move {
                let words = args.list("words")?;
                world.log.push(format!("fallback {}", words.len()));
                Ok(world)
            }
            .boxed()
        },
    )
    .unwrap()
    .catchall();
    Box::new(view)
}

fn balance_fetcher() -> Box<dyn Fetch<Ledger, U256>> {
    let fetcher: Fetcher<Ledger, Value, U256> = Fetcher::sync(
        "#### Balance\n* \"Balance <Account>\"",
        "Balance",
        vec![address_arg("account")],
        |world: &Ledger, mut args: BoundArgs<Value>| match args.value("account")? {
            Value::Address(a) => Ok(world.balances.get(&a).copied().unwrap_or_default()),
            _ => Err(EngineError::processor("expected address")),
        },
    )
    .unwrap();
    Box::new(fetcher)
}

fn total_fetcher() -> Box<dyn Fetch<Ledger, U256>> {
    let fetcher: Fetcher<Ledger, Value, U256> = Fetcher::new(
        "",
        "Total",
        vec![],
        |world: &Ledger, _args: BoundArgs<Value>| {
            async move {
                Ok(world
                    .balances
                    .values()
                    .fold(U256::zero(), |acc, b| acc + *b))
            }
            .boxed()
        },
    )
    .unwrap();
    Box::new(fetcher)
}

// ==================== Commands ====================

#[tokio::test]
async fn test_command_runs_processor() {
    let commands = vec![transfer(), note()];
    let world = process_command_event(
        "Token",
        &commands,
        ledger(),
        &event!["Transfer", "Torrey", "40"],
        Some(geoff()),
    )
    .await
    .unwrap();

    assert_eq!(world.balances[&geoff()], U256::from(60));
    assert_eq!(world.balances[&torrey()], U256::from(40));
}

#[tokio::test]
async fn test_command_requires_caller() {
    let commands = vec![transfer()];
    let err = process_command_event(
        "Token",
        &commands,
        ledger(),
        &event!["Transfer", "Torrey", "40"],
        None,
    )
    .await
    .unwrap_err();

    assert_eq!(err, EngineError::MissingCaller("Transfer".to_string()));
}

#[test]
fn test_requires_caller_follows_constructor() {
    let command: Command<Ledger, Value> = Command::new(
        "",
        "Mint",
        vec![],
        |world: Ledger, _from: Address, _args: BoundArgs<Value>| async move { Ok(world) }.boxed(),
    )
    .unwrap();
    let view: Command<Ledger, Value> = Command::view(
        "",
        "Peek",
        vec![],
        |world: Ledger, _args: BoundArgs<Value>| async move { Ok(world) }.boxed(),
    )
    .unwrap();

    assert!(command.requires_caller());
    assert!(!view.requires_caller());
}

#[tokio::test]
async fn test_binding_error_precedes_caller_check() {
    let commands = vec![transfer()];
    let err = process_command_event("Token", &commands, ledger(), &event!["Transfer", "Torrey"], None)
        .await
        .unwrap_err();

    assert!(matches!(err, EngineError::MissingArgument { .. }));
}

#[tokio::test]
async fn test_view_needs_no_caller() {
    let commands = vec![transfer(), note()];
    let world = process_command_event("Token", &commands, ledger(), &event!["note", "hi"], None)
        .await
        .unwrap();

    assert_eq!(world.log, vec!["hi".to_string()]);
}

#[tokio::test]
async fn test_processor_error_surfaces() {
    let commands = vec![transfer()];
    let err = process_command_event(
        "Token",
        &commands,
        ledger(),
        &event!["Transfer", "Torrey", "1000"],
        Some(geoff()),
    )
    .await
    .unwrap_err();

    assert_eq!(err.to_string(), "insufficient balance");
}

#[tokio::test]
async fn test_unknown_event_type() {
    let commands = vec![transfer(), note()];
    let err = process_command_event("Token", &commands, ledger(), &event!["Mint", "1"], None)
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "found unknown Token event type (Mint 1)");
}

#[tokio::test]
async fn test_first_match_wins_and_catchall_last() {
    let commands = vec![note(), fallback()];

    let world = process_command_event("Core", &commands, ledger(), &event!["Note", "x"], None)
        .await
        .unwrap();
    assert_eq!(world.log, vec!["x".to_string()]);

    let world = process_command_event("Core", &commands, ledger(), &event!["Whatever", "a", "b"], None)
        .await
        .unwrap();
    assert_eq!(world.log, vec!["fallback 3".to_string()]);
}

#[tokio::test]
async fn test_catchall_first_shadows_everything() {
    let commands = vec![fallback(), note()];
    let world = process_command_event("Core", &commands, ledger(), &event!["Note", "x"], None)
        .await
        .unwrap();
    assert_eq!(world.log, vec!["fallback 2".to_string()]);
}

// ==================== Fetchers ====================

#[tokio::test]
async fn test_fetcher_value() {
    let fetchers = vec![balance_fetcher(), total_fetcher()];
    let world = ledger();

    let balance = get_fetcher_value("Value", &fetchers, &world, &event!["Balance", "Geoff"])
        .await
        .unwrap();
    assert_eq!(balance, U256::from(100));

    let total = get_fetcher_value("Value", &fetchers, &world, &event!["total"])
        .await
        .unwrap();
    assert_eq!(total, U256::from(100));
}

#[tokio::test]
async fn test_fetcher_unknown_alias() {
    let fetchers = vec![balance_fetcher()];
    let err = get_fetcher_value("Value", &fetchers, &ledger(), &event!["Balance", "Nobody"])
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "unknown address or alias Nobody");
}

#[tokio::test]
async fn test_fetcher_unknown_event_type() {
    let fetchers = vec![balance_fetcher()];
    let err = get_fetcher_value("Value", &fetchers, &ledger(), &Event::atom("Supply"))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::UnknownEventType { .. }));
}

// ==================== Command loop ====================

struct Words;

impl Parser for Words {
    fn parse(&self, line: &str) -> Result<Event, EngineError> {
        if line.contains('(') {
            return Err(EngineError::Parse(format!("nested groups unsupported: {}", line)));
        }
        Ok(Event::List(line.split_whitespace().map(Event::atom).collect()))
    }
}

#[tokio::test]
async fn test_command_loop_continues_after_errors() {
    init_tracing();
    let runner = CommandLoop::new("Token", Words, vec![transfer(), note()]).with_from(geoff());
    assert_eq!(runner.command_count(), 2);

    let lines = [
        "-- setup",
        "Transfer Torrey 30",
        "",
        "Transfer Torrey 500",
        "Note (bad)",
        "Note done",
    ];
    let (world, reports) = runner.run(ledger(), lines).await;

    assert_eq!(reports.len(), 4);
    assert!(reports[0].is_ok());
    assert_eq!(reports[0].line_no, 2);
    assert_eq!(
        reports[1].error,
        Some(EngineError::Processor("insufficient balance".to_string()))
    );
    assert!(matches!(reports[2].error, Some(EngineError::Parse(_))));
    assert!(reports[3].is_ok());

    // failed lines leave the world as it was
    assert_eq!(world.balances[&geoff()], U256::from(70));
    assert_eq!(world.balances[&torrey()], U256::from(30));
    assert_eq!(world.log, vec!["Transfer".to_string(), "done".to_string()]);
}

#[tokio::test]
async fn test_command_loop_eval_single_line() {
    let runner = CommandLoop::new("Token", Words, vec![note()]);
    let world = runner.eval(ledger(), "Note hello").await.unwrap();
    assert_eq!(world.log, vec!["hello".to_string()]);
}

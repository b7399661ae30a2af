//! rowexpr - evaluate bitwise scalars and inspect the row field encoding

use anyhow::{anyhow, Context, Result};
use clap::{Parser as ClapParser, Subcommand};
use rowexpr::access::{encode_field, encoded_width, FieldDef, ValuesRow};
use rowexpr::expression::{
    compose_scalar, evaluate_expression, scalar_names, Expression, LiteralExpression,
};
use rowexpr::types::extract::convert;
use rowexpr::types::{TypeTag, Value};
use std::sync::Arc;

/// rowexpr - typed values, row encoding and bitwise expressions
#[derive(ClapParser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compose and evaluate a scalar over literal arguments
    Eval {
        /// Function name, e.g. bitand or leftshift
        function: String,

        /// Arguments as TYPE:VALUE, or `null`
        args: Vec<String>,
    },

    /// Encode one value as a field and print its bytes in hex
    Encode {
        /// Field type, e.g. U_BIGINT or VARCHAR
        #[arg(short = 't', long = "type")]
        type_tag: String,

        /// Declared field width
        #[arg(short, long)]
        width: Option<usize>,

        /// Value text, or `null`
        value: String,
    },

    /// List registered scalar functions
    Functions,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Set up logging
    let log_level = if args.debug { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    match args.command {
        Command::Eval { function, args } => run_eval(&function, &args),
        Command::Encode {
            type_tag,
            width,
            value,
        } => run_encode(&type_tag, width, &value),
        Command::Functions => {
            for name in scalar_names() {
                println!("{}", name);
            }
            Ok(())
        }
    }
}

fn run_eval(function: &str, args: &[String]) -> Result<()> {
    let arguments = args
        .iter()
        .map(|arg| -> Result<Box<dyn Expression>> {
            Ok(Box::new(LiteralExpression::new(parse_literal(arg)?)))
        })
        .collect::<Result<Vec<_>>>()?;

    let expression = compose_scalar(function, arguments)
        .with_context(|| format!("Failed to compose {}", function))?;
    log::debug!("evaluating {}", expression);

    let value = evaluate_expression(expression.as_ref(), Arc::new(ValuesRow::default()))
        .context("Evaluation failed")?;
    println!("{} ({})", value, expression.value_type());
    Ok(())
}

fn run_encode(type_tag: &str, width: Option<usize>, text: &str) -> Result<()> {
    let type_tag = parse_type(type_tag)?;
    let mut field = FieldDef::new("value", type_tag);
    if let Some(width) = width {
        field = field.with_width(width)?;
    }

    let value = parse_value(type_tag, text)?;
    let mut buf = vec![0u8; encoded_width(&field, &value)?];
    let written = encode_field(&field, &value, &mut buf, 0).context("Failed to encode value")?;

    let hex: String = buf[..written].iter().map(|b| format!("{:02X}", b)).collect();
    println!("{} bytes: {}", written, hex);
    Ok(())
}

/// Parse `TYPE:VALUE`, or `null` for an untyped null
fn parse_literal(arg: &str) -> Result<Value> {
    if arg.eq_ignore_ascii_case("null") {
        return Ok(Value::Null);
    }
    let (type_name, text) = arg
        .split_once(':')
        .ok_or_else(|| anyhow!("Expected TYPE:VALUE, got '{}'", arg))?;
    parse_value(parse_type(type_name)?, text)
}

fn parse_type(name: &str) -> Result<TypeTag> {
    name.parse::<TypeTag>().map_err(|e| anyhow!(e))
}

fn parse_value(type_tag: TypeTag, text: &str) -> Result<Value> {
    if text.eq_ignore_ascii_case("null") {
        return Ok(Value::Null);
    }
    convert(&Value::varchar(text), type_tag)
        .with_context(|| format!("Invalid {} literal '{}'", type_tag, text))
}

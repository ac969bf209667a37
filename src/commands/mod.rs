use anyhow::{anyhow, Result};

/// Default number of tokens listed by `tokens`.
pub const TOKEN_LIST_LIMIT: usize = 50;

/// A parsed terminal command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Tokens(String),
    From(String),
    To(String),
    Amount(String),
    Slippage(String),
    Quote,
    Swap,
    Cancel,
    Status,
    SwapNow {
        amount: String,
        from: String,
        to: String,
        slippage: Option<String>,
    },
    Refresh,
    Help,
    Quit,
}

impl Command {
    /// Parse one input line; `Ok(None)` for a blank line.
    ///
    /// A leading `/` is accepted so `/swapnow 1.5 SOL USDC 0.5%` works too.
    pub fn parse(line: &str) -> Result<Option<Command>> {
        let mut parts = line.split_whitespace();
        let Some(name) = parts.next() else {
            return Ok(None);
        };
        let args: Vec<&str> = parts.collect();
        let name = name.trim_start_matches('/').to_lowercase();

        let single = |usage: &str| -> Result<String> {
            match args.as_slice() {
                [value] => Ok(value.to_string()),
                _ => Err(anyhow!("Usage: {}", usage)),
            }
        };

        let command = match name.as_str() {
            "tokens" | "search" => Command::Tokens(args.join(" ")),
            "from" => Command::From(single("from <symbol|mint>")?),
            "to" => Command::To(single("to <symbol|mint>")?),
            "amount" => Command::Amount(single("amount <number>")?),
            "slippage" => Command::Slippage(single("slippage <percent>")?),
            "quote" => Command::Quote,
            "swap" => Command::Swap,
            "cancel" | "clear" => Command::Cancel,
            "status" => Command::Status,
            "swapnow" => match args.as_slice() {
                [amount, from, to] | [amount, from, to, _] => Command::SwapNow {
                    amount: amount.to_string(),
                    from: from.to_string(),
                    to: to.to_string(),
                    slippage: args.get(3).map(|s| s.to_string()),
                },
                _ => {
                    return Err(anyhow!(
                        "Usage: swapnow <amount> <from> <to> [<slippage>%]\nExample: swapnow 1.5 SOL USDC 0.5%"
                    ))
                }
            },
            "refresh" => Command::Refresh,
            "help" | "?" => Command::Help,
            "quit" | "exit" => Command::Quit,
            other => return Err(anyhow!("Unknown command '{}', type 'help'", other)),
        };

        Ok(Some(command))
    }
}

/// Usage and description of every command, for `help`.
pub fn register_commands() -> Vec<(&'static str, &'static str)> {
    vec![
        ("tokens [query]", "list tokens matching a symbol or mint"),
        ("from <symbol|mint>", "select the token to sell"),
        ("to <symbol|mint>", "select the token to buy"),
        ("amount <number>", "set the amount to sell"),
        ("slippage <percent>", "set slippage tolerance, e.g. 0.5%"),
        ("quote", "request a quote for the current selection"),
        ("swap", "sign and send the held quote"),
        ("cancel", "discard the held quote"),
        ("status", "show the current selection and quote"),
        ("swapnow <amount> <from> <to> [slip%]", "quote and swap in one step"),
        ("refresh", "reload the token list"),
        ("help", "display this help message"),
        ("quit", "exit"),
    ]
}

/// Arguments of a `go` command. Missing values fall back to the configured
/// defaults.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GoArgs {
    pub depth: Option<u32>,
    pub nodes: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UciCommand {
    Uci,
    IsReady,
    UciNewGame,
    Position(Vec<String>),
    Go(GoArgs),
    Perft(usize),
    Divide(usize),
    Display,
    SetOption(Vec<String>),
    Stop,
    Quit,
    Unknown(String),
}

fn parse_go(parts: &[&str]) -> GoArgs {
    let mut args = GoArgs::default();
    let mut i = 1;
    while i < parts.len() {
        match parts[i] {
            "depth" => {
                args.depth = parts.get(i + 1).and_then(|v| v.parse().ok());
                i += 1;
            }
            "nodes" => {
                args.nodes = parts.get(i + 1).and_then(|v| v.parse().ok());
                i += 1;
            }
            _ => {}
        }
        i += 1;
    }
    args
}

pub fn parse_uci_command(line: &str) -> Option<UciCommand> {
    let trimmed = line.trim();
    let parts: Vec<&str> = trimmed.split_whitespace().collect();
    if parts.is_empty() {
        return None;
    }

    let owned_parts = || parts.iter().map(|p| (*p).to_string()).collect::<Vec<String>>();
    let depth_arg = || parts.get(1).and_then(|v| v.parse::<usize>().ok()).unwrap_or(1);

    let cmd = match parts[0] {
        "uci" => UciCommand::Uci,
        "isready" => UciCommand::IsReady,
        "ucinewgame" => UciCommand::UciNewGame,
        "position" => UciCommand::Position(owned_parts()),
        "go" => UciCommand::Go(parse_go(&parts)),
        "perft" => UciCommand::Perft(depth_arg()),
        "divide" => UciCommand::Divide(depth_arg()),
        "d" => UciCommand::Display,
        "setoption" => UciCommand::SetOption(owned_parts()),
        "stop" => UciCommand::Stop,
        "quit" => UciCommand::Quit,
        _ => UciCommand::Unknown(trimmed.to_string()),
    };

    Some(cmd)
}

//! Scripted navigation commands.
//!
//! Stand-in for the next/previous buttons of an interactive viewer. A script
//! is a comma or whitespace separated list, e.g. `n,n,p,g4,log,linear`.

use crate::error::SimError;

/// One navigation request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NavCommand {
    /// `n` / `next`
    Next,
    /// `p` / `prev`
    Prev,
    /// `g<i>` / `goto:<i>`
    Goto(usize),
    /// `log`: switch to log display
    Log,
    /// `linear`: switch to raw display
    Linear,
    /// `eps:<value>`: change the log floor
    Epsilon(f64),
}

impl std::fmt::Display for NavCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NavCommand::Next => write!(f, "next"),
            NavCommand::Prev => write!(f, "prev"),
            NavCommand::Goto(i) => write!(f, "goto:{}", i),
            NavCommand::Log => write!(f, "log"),
            NavCommand::Linear => write!(f, "linear"),
            NavCommand::Epsilon(e) => write!(f, "eps:{:e}", e),
        }
    }
}

impl std::str::FromStr for NavCommand {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = s.trim().to_lowercase();
        match token.as_str() {
            "n" | "next" => return Ok(NavCommand::Next),
            "p" | "prev" | "previous" => return Ok(NavCommand::Prev),
            "log" => return Ok(NavCommand::Log),
            "linear" | "lin" => return Ok(NavCommand::Linear),
            _ => {}
        }

        if let Some(rest) = token.strip_prefix("goto:").or_else(|| token.strip_prefix('g')) {
            return rest
                .parse()
                .map(NavCommand::Goto)
                .map_err(|_| SimError::command(format!("'{}' needs a frame index", s.trim())));
        }

        if let Some(rest) = token.strip_prefix("eps:") {
            return rest
                .parse()
                .map(NavCommand::Epsilon)
                .map_err(|_| SimError::command(format!("'{}' needs a number", s.trim())));
        }

        Err(SimError::command(format!("unknown command '{}'", s.trim())))
    }
}

/// Parses a whole script; empty input gives an empty script.
pub fn parse_script(script: &str) -> Result<Vec<NavCommand>, SimError> {
    script
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|t| !t.is_empty())
        .map(|t| t.parse::<NavCommand>())
        .collect()
}

/// Default script: step forward through every frame.
pub fn play_through(frames: usize) -> Vec<NavCommand> {
    vec![NavCommand::Next; frames.saturating_sub(1)]
}

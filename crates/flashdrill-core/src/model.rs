//! Core data model types for flashdrill.
//!
//! These are the fundamental types the whole system uses to represent
//! problems, game modes, and the player's avatar.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// The arithmetic operation a problem asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Multiply,
    Add,
    Subtract,
}

impl Operation {
    /// All operations, in the order the mixed generator draws from.
    pub const ALL: [Operation; 3] = [Operation::Multiply, Operation::Add, Operation::Subtract];

    /// Apply the operation to two operands.
    pub fn apply(self, a: i64, b: i64) -> i64 {
        match self {
            Operation::Multiply => a * b,
            Operation::Add => a + b,
            Operation::Subtract => a - b,
        }
    }

    /// Symbol used when rendering a question.
    pub fn symbol(self) -> &'static str {
        match self {
            Operation::Multiply => "×",
            Operation::Add => "+",
            Operation::Subtract => "-",
        }
    }
}

/// A single arithmetic problem.
///
/// Every instance carries its own id, so two problems with the same operands
/// are still distinct deck entries.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Problem {
    /// Unique identifier for this problem instance.
    pub id: Uuid,
    /// Left-hand operand.
    pub operand_a: i64,
    /// Right-hand operand.
    pub operand_b: i64,
    /// Operation applied to the operands.
    pub operation: Operation,
    answer: i64,
}

impl Problem {
    pub fn new(operand_a: i64, operand_b: i64, operation: Operation) -> Self {
        Self {
            id: Uuid::new_v4(),
            operand_a,
            operand_b,
            operation,
            answer: operation.apply(operand_a, operand_b),
        }
    }

    /// The correct answer, fixed at creation time.
    pub fn answer(&self) -> i64 {
        self.answer
    }

    /// Question text, e.g. `"7 × 8"`.
    pub fn question(&self) -> String {
        format!(
            "{} {} {}",
            self.operand_a,
            self.operation.symbol(),
            self.operand_b
        )
    }

    /// Hint text revealed by a purchased hint: every digit but the last.
    ///
    /// Only meaningful for answers of 10 or more.
    pub fn hint_prefix(&self) -> i64 {
        self.answer / 10
    }
}

/// Which family of problems a deck is built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProblemSet {
    Multiplication,
    Addition,
    Subtraction,
    Mixed,
}

impl ProblemSet {
    pub const ALL: [ProblemSet; 4] = [
        ProblemSet::Multiplication,
        ProblemSet::Addition,
        ProblemSet::Subtraction,
        ProblemSet::Mixed,
    ];
}

impl fmt::Display for ProblemSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProblemSet::Multiplication => write!(f, "multiplication"),
            ProblemSet::Addition => write!(f, "addition"),
            ProblemSet::Subtraction => write!(f, "subtraction"),
            ProblemSet::Mixed => write!(f, "mixed"),
        }
    }
}

impl FromStr for ProblemSet {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "multiplication" | "mult" | "times" => Ok(ProblemSet::Multiplication),
            "addition" | "add" => Ok(ProblemSet::Addition),
            "subtraction" | "sub" => Ok(ProblemSet::Subtraction),
            "mixed" | "mix" => Ok(ProblemSet::Mixed),
            other => Err(format!("unknown problem set: {other}")),
        }
    }
}

/// How answers reach the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputMethod {
    /// Spoken answers, transcribed by a voice collaborator.
    Voice,
    /// Tapped answers chosen from four displayed options.
    Display,
}

impl fmt::Display for InputMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputMethod::Voice => write!(f, "voice"),
            InputMethod::Display => write!(f, "display"),
        }
    }
}

impl FromStr for InputMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "voice" | "speech" => Ok(InputMethod::Voice),
            "display" | "tap" => Ok(InputMethod::Display),
            other => Err(format!("unknown input method: {other}")),
        }
    }
}

/// A playable mode: a problem set answered through an input method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GameMode {
    pub problem_set: ProblemSet,
    pub input: InputMethod,
}

impl GameMode {
    pub fn new(problem_set: ProblemSet, input: InputMethod) -> Self {
        Self { problem_set, input }
    }

    /// Whether the mode shows four answer options.
    pub fn shows_options(&self) -> bool {
        self.input == InputMethod::Display
    }
}

impl Default for GameMode {
    fn default() -> Self {
        Self::new(ProblemSet::Multiplication, InputMethod::Display)
    }
}

impl fmt::Display for GameMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.problem_set, self.input)
    }
}

/// Animal the player's avatar is drawn as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CharacterKind {
    #[default]
    Cat,
    Dog,
    Rabbit,
    Bear,
    Fox,
    Owl,
    Panda,
    Tiger,
    Lion,
    Elephant,
}

impl CharacterKind {
    pub const ALL: [CharacterKind; 10] = [
        CharacterKind::Cat,
        CharacterKind::Dog,
        CharacterKind::Rabbit,
        CharacterKind::Bear,
        CharacterKind::Fox,
        CharacterKind::Owl,
        CharacterKind::Panda,
        CharacterKind::Tiger,
        CharacterKind::Lion,
        CharacterKind::Elephant,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            CharacterKind::Cat => "cat",
            CharacterKind::Dog => "dog",
            CharacterKind::Rabbit => "rabbit",
            CharacterKind::Bear => "bear",
            CharacterKind::Fox => "fox",
            CharacterKind::Owl => "owl",
            CharacterKind::Panda => "panda",
            CharacterKind::Tiger => "tiger",
            CharacterKind::Lion => "lion",
            CharacterKind::Elephant => "elephant",
        }
    }
}

impl fmt::Display for CharacterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CharacterKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        CharacterKind::ALL
            .into_iter()
            .find(|k| k.as_str() == lower)
            .ok_or_else(|| format!("unknown character kind: {s}"))
    }
}

/// Default avatar name when none was chosen.
pub const DEFAULT_AVATAR_NAME: &str = "Player";

/// The player's persisted avatar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Avatar {
    pub display_name: String,
    pub character_kind: CharacterKind,
}

impl Avatar {
    /// Build an avatar, falling back to the default name for blank input.
    pub fn new(display_name: &str, character_kind: CharacterKind) -> Self {
        let trimmed = display_name.trim();
        let display_name = if trimmed.is_empty() {
            DEFAULT_AVATAR_NAME.to_string()
        } else {
            trimmed.to_string()
        };
        Self {
            display_name,
            character_kind,
        }
    }
}

impl Default for Avatar {
    fn default() -> Self {
        Self::new(DEFAULT_AVATAR_NAME, CharacterKind::default())
    }
}

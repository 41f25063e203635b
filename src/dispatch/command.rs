//! Classification of one line of operator input

/// Built-in commands, matched case-insensitively by token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Builtin {
	/// Re-scan the inbox and report the file count
	Status,
	/// List configured aliases and their destinations
	Aliases,
	Help,
}

impl Builtin {
	pub const TOKENS: &'static [(&'static str, Builtin)] = &[
		("check", Builtin::Status),
		("list", Builtin::Status),
		("ls", Builtin::Status),
		("aliases", Builtin::Aliases),
		("help", Builtin::Help),
	];

	pub fn from_token(token: &str) -> Option<Self> {
		Self::TOKENS
			.iter()
			.find(|(name, _)| name.eq_ignore_ascii_case(token))
			.map(|(_, builtin)| *builtin)
	}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
	Exit,
	Empty,
	Reload,
	/// `open -s <alias>`; the alias may be empty
	OpenFolder(String),
	Builtin(Builtin),
	/// Anything else: the whole trimmed line is an alias
	Move(String),
}

const OPEN_PREFIX: &str = "open -s";

/// Classify a line read from the operator. `None` means end of input.
///
/// First match wins: end of input, exit/quit, empty, reload, `open -s`,
/// built-ins, then alias move.
pub fn classify(line: Option<&str>) -> Command {
	let Some(line) = line else {
		return Command::Exit;
	};
	let input = line.trim();

	if input.eq_ignore_ascii_case("exit") || input.eq_ignore_ascii_case("quit") {
		return Command::Exit;
	}
	if input.is_empty() {
		return Command::Empty;
	}
	if input.eq_ignore_ascii_case("reload") {
		return Command::Reload;
	}
	if let Some(prefix) = input.get(..OPEN_PREFIX.len()) {
		if prefix.eq_ignore_ascii_case(OPEN_PREFIX) {
			return Command::OpenFolder(input[OPEN_PREFIX.len()..].trim().to_string());
		}
	}
	if let Some(builtin) = Builtin::from_token(input) {
		return Command::Builtin(builtin);
	}
	Command::Move(input.to_string())
}

//! A line-based shell for using the expense tracker from a terminal.
//!
//! Each line holds one command, e.g. `add 3.50 food coffee`. Passwords are
//! never typed on the command line; they are read through a separate
//! password reader so the binary can hide them.

use std::{
    fs,
    io::{self, BufRead, Write},
    path::PathBuf,
    str::FromStr,
};

use crate::{Expense, ExpenseTracker};

const PROMPT: &str = "> ";

const HELP: &str = "Commands:
  register <username>                      create an account
  login <username>                         log in to an account
  add <amount> <category> <description>    record an expense
  list                                     show your expenses
  types                                    show your expense types
  add-type <name>                          add an expense type
  export <path>                            save your expenses as CSV
  graph                                    chart your expenses
  help                                     show this message
  quit                                     leave the shell";

/// The errors that may occur when parsing a command.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum CommandError {
    /// The line was empty.
    #[error("no command given")]
    Empty,

    /// The first word of the line is not a command.
    #[error("unknown command \"{0}\", type \"help\" for a list of commands")]
    Unknown(String),

    /// The command was given the wrong arguments.
    #[error("usage: {0}")]
    Usage(&'static str),
}

/// A request typed into the shell.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Create an account, the password is prompted for.
    Register {
        /// The name to register.
        username: String,
    },
    /// Log in, the password is prompted for.
    LogIn {
        /// The name to log in as.
        username: String,
    },
    /// Record an expense.
    AddExpense {
        /// The amount as typed.
        amount: String,
        /// The category label.
        category: String,
        /// The rest of the line.
        description: String,
    },
    /// Show the logged in user's expenses.
    ListExpenses,
    /// Show the logged in user's expense types.
    ListExpenseTypes,
    /// Add an expense type.
    AddExpenseType {
        /// The rest of the line.
        name: String,
    },
    /// Save the logged in user's expenses as CSV.
    Export {
        /// Where to write the file.
        path: PathBuf,
    },
    /// Chart the logged in user's expenses.
    Graph,
    /// Show the list of commands.
    Help,
    /// Leave the shell.
    Quit,
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let Some(name) = words.next() else {
            return Err(CommandError::Empty);
        };
        let args: Vec<&str> = words.collect();

        match (name, args.as_slice()) {
            ("register", [username]) => Ok(Command::Register {
                username: username.to_string(),
            }),
            ("register", _) => Err(CommandError::Usage("register <username>")),
            ("login", [username]) => Ok(Command::LogIn {
                username: username.to_string(),
            }),
            ("login", _) => Err(CommandError::Usage("login <username>")),
            ("add", [amount, category, description @ ..]) if !description.is_empty() => {
                Ok(Command::AddExpense {
                    amount: amount.to_string(),
                    category: category.to_string(),
                    description: description.join(" "),
                })
            }
            ("add", _) => Err(CommandError::Usage("add <amount> <category> <description>")),
            ("list", []) => Ok(Command::ListExpenses),
            ("types", []) => Ok(Command::ListExpenseTypes),
            ("add-type", words) if !words.is_empty() => Ok(Command::AddExpenseType {
                name: words.join(" "),
            }),
            ("add-type", _) => Err(CommandError::Usage("add-type <name>")),
            ("export", words) if !words.is_empty() => {
                // Paths keep their inner whitespace as typed.
                let path = line.trim()[name.len()..].trim_start();

                Ok(Command::Export {
                    path: PathBuf::from(path),
                })
            }
            ("export", _) => Err(CommandError::Usage("export <path>")),
            ("graph", []) => Ok(Command::Graph),
            ("help", []) => Ok(Command::Help),
            ("quit" | "exit", []) => Ok(Command::Quit),
            ("list" | "types" | "graph" | "help" | "quit" | "exit", _) => {
                Err(CommandError::Usage("the command takes no arguments"))
            }
            (unknown, _) => Err(CommandError::Unknown(unknown.to_owned())),
        }
    }
}

/// Read commands from `input` until EOF or `quit`, writing results to `output`.
///
/// `read_password` is called with a prompt whenever a command needs a
/// password. Errors from the tracker are reported to `output` and the shell
/// carries on; only I/O errors on `input` or `output` end it early.
pub fn run<R, W, P>(
    tracker: &mut ExpenseTracker,
    input: R,
    mut output: W,
    mut read_password: P,
) -> io::Result<()>
where
    R: BufRead,
    W: Write,
    P: FnMut(&str) -> io::Result<String>,
{
    writeln!(output, "E-Tracker. Type \"help\" for a list of commands.")?;

    let mut lines = input.lines();

    loop {
        write!(output, "{PROMPT}")?;
        output.flush()?;

        let Some(line) = lines.next() else {
            writeln!(output)?;
            break;
        };
        let line = line?;

        if line.trim().is_empty() {
            continue;
        }

        match line.parse::<Command>() {
            Ok(Command::Quit) => break,
            Ok(command) => execute(tracker, command, &mut output, &mut read_password)?,
            Err(error) => print_error(&mut output, error)?,
        }
    }

    Ok(())
}

fn execute<W, P>(
    tracker: &mut ExpenseTracker,
    command: Command,
    output: &mut W,
    read_password: &mut P,
) -> io::Result<()>
where
    W: Write,
    P: FnMut(&str) -> io::Result<String>,
{
    match command {
        Command::Register { username } => {
            let Some(password) = prompt_password(read_password, output)? else {
                return Ok(());
            };

            match tracker.register(&username, &password) {
                Ok(user) => writeln!(output, "Registered {}. You can now log in.", user.username),
                Err(error) => print_error(output, error),
            }
        }
        Command::LogIn { username } => {
            let Some(password) = prompt_password(read_password, output)? else {
                return Ok(());
            };

            match tracker.log_in(&username, &password) {
                Ok(_) => {
                    writeln!(output, "Welcome, {username}!")?;
                    show_expenses(tracker, output)
                }
                Err(error) => print_error(output, error),
            }
        }
        Command::AddExpense {
            amount,
            category,
            description,
        } => match tracker.add_expense(&description, &amount, &category) {
            Ok(expenses) => {
                writeln!(output, "Expense added.")?;
                writeln!(output, "{}", format_expense_list(&expenses))
            }
            Err(error) => print_error(output, error),
        },
        Command::ListExpenses => show_expenses(tracker, output),
        Command::ListExpenseTypes => match tracker.list_expense_types() {
            Ok(names) if names.is_empty() => writeln!(output, "No expense types yet."),
            Ok(names) => {
                for name in names {
                    writeln!(output, "{name}")?;
                }
                Ok(())
            }
            Err(error) => print_error(output, error),
        },
        Command::AddExpenseType { name } => match tracker.add_expense_type(&name) {
            Ok(expense_type) => writeln!(output, "Added expense type {}.", expense_type.name),
            Err(error) => print_error(output, error),
        },
        Command::Export { path } => {
            let mut buffer: Vec<u8> = Vec::new();

            if let Err(error) = tracker.export_expenses(&mut buffer) {
                return print_error(output, error);
            }

            match fs::write(&path, buffer) {
                Ok(()) => writeln!(output, "Exported expenses to {}.", path.display()),
                Err(error) => print_error(output, format!("could not write {path:?}: {error}")),
            }
        }
        Command::Graph => match tracker.show_graph() {
            Ok(()) => Ok(()),
            Err(error) => print_error(output, error),
        },
        Command::Help => writeln!(output, "{HELP}"),
        Command::Quit => Ok(()),
    }
}

/// Format expenses one per line, e.g. `coffee ($3.50) - food`.
pub fn format_expense_list(expenses: &[Expense]) -> String {
    if expenses.is_empty() {
        return "No expenses recorded yet.".to_owned();
    }

    expenses
        .iter()
        .map(|expense| expense.to_string())
        .collect::<Vec<_>>()
        .join("\n")
}

fn show_expenses<W: Write>(tracker: &ExpenseTracker, output: &mut W) -> io::Result<()> {
    match tracker.list_expenses() {
        Ok(expenses) => writeln!(output, "{}", format_expense_list(&expenses)),
        Err(error) => print_error(output, error),
    }
}

/// Returns `None` if the user closed the input instead of typing a password.
fn prompt_password<W, P>(read_password: &mut P, output: &mut W) -> io::Result<Option<String>>
where
    W: Write,
    P: FnMut(&str) -> io::Result<String>,
{
    match read_password("Password: ") {
        Ok(password) => Ok(Some(password)),
        Err(error) if error.kind() == io::ErrorKind::UnexpectedEof => Ok(None),
        Err(error) => {
            print_error(output, format!("could not read password: {error}"))?;
            Ok(None)
        }
    }
}

fn print_error<W: Write>(output: &mut W, error: impl ToString) -> io::Result<()> {
    writeln!(output, "Error: {}", capitalise_first_char(&error.to_string()))
}

/// From https://crates.io/crates/capitalize
fn capitalise_first_char(string: &str) -> String {
    let mut chars = string.chars();
    let Some(first) = chars.next() else {
        return String::with_capacity(0);
    };
    first.to_uppercase().chain(chars).collect()
}


#[cfg(test)]
mod shell_tests {
    use std::io::{self, Cursor};

    use rusqlite::Connection;

    use crate::{Expense, ExpenseTracker, UserID};

    use super::{capitalise_first_char, format_expense_list, run};

    fn run_script(script: &str) -> String {
        let connection = Connection::open_in_memory().unwrap();
        let mut tracker = ExpenseTracker::new(connection, 4).unwrap();
        let mut output = Vec::new();

        run(&mut tracker, Cursor::new(script), &mut output, |_| {
            Ok("pw1".to_owned())
        })
        .expect("Shell failed");

        String::from_utf8(output).unwrap()
    }

    #[test]
    fn register_log_in_and_add_prints_list() {
        let output = run_script("register alice\nlogin alice\nadd 3.50 food coffee\n");

        assert!(output.contains("Registered alice."), "got {output}");
        assert!(output.contains("Welcome, alice!"), "got {output}");
        assert!(output.contains("No expenses recorded yet."), "got {output}");
        assert!(output.contains("Expense added.\ncoffee ($3.50) - food\n"), "got {output}");
    }

    #[test]
    fn add_before_log_in_reports_error_and_continues() {
        let output = run_script("add 3.50 food coffee\nhelp\n");

        assert!(output.contains("Error: You must log in first"), "got {output}");
        assert!(output.contains("Commands:"), "got {output}");
    }

    #[test]
    fn bad_log_in_reports_invalid_credentials() {
        let output = run_script("login bob\nlist\n");

        assert!(output.contains("Error: Incorrect username or password"), "got {output}");
        assert!(output.contains("Error: You must log in first"), "got {output}");
    }

    #[test]
    fn invalid_amount_is_reported() {
        let output = run_script("register alice\nlogin alice\nadd abc food coffee\n");

        assert!(output.contains("Error: \"abc\" is not a valid amount"), "got {output}");
    }

    #[test]
    fn graph_is_reported_as_not_implemented() {
        let output = run_script("graph\n");

        assert!(
            output.contains("Error: The graph feature is not implemented yet"),
            "got {output}"
        );
    }

    #[test]
    fn unknown_command_is_reported() {
        let output = run_script("fly\n");

        assert!(output.contains("Error: Unknown command \"fly\""), "got {output}");
    }

    #[test]
    fn quit_stops_reading() {
        let output = run_script("quit\nregister alice\n");

        assert!(!output.contains("Registered"), "got {output}");
    }

    #[test]
    fn closed_password_prompt_cancels_command() {
        let connection = Connection::open_in_memory().unwrap();
        let mut tracker = ExpenseTracker::new(connection, 4).unwrap();
        let mut output = Vec::new();

        run(&mut tracker, Cursor::new("register alice\n"), &mut output, |_| {
            Err(io::Error::from(io::ErrorKind::UnexpectedEof))
        })
        .unwrap();

        let output = String::from_utf8(output).unwrap();
        assert!(!output.contains("Registered"), "got {output}");
        assert!(!output.contains("Error"), "got {output}");
    }

    #[test]
    fn export_writes_csv_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("expenses.csv");
        let script = format!(
            "register alice\nlogin alice\nadd 3.50 food coffee\nexport {}\n",
            path.display()
        );

        let output = run_script(&script);

        assert!(output.contains("Exported expenses to"), "got {output}");
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "description,amount,category\ncoffee,3.5,food\n"
        );
    }

    #[test]
    fn export_writes_to_path_with_spaces() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("my expenses.csv");
        let script = format!(
            "register alice\nlogin alice\nadd 3.50 food coffee\nexport {}\n",
            path.display()
        );

        let output = run_script(&script);

        assert!(output.contains("Exported expenses to"), "got {output}");
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "description,amount,category\ncoffee,3.5,food\n"
        );
    }

    #[test]
    fn types_and_add_type() {
        let output = run_script("register alice\nlogin alice\ntypes\nadd-type eating out\ntypes\n");

        assert!(output.contains("No expense types yet."), "got {output}");
        assert!(output.contains("Added expense type eating out."), "got {output}");
        assert!(output.ends_with("eating out\n> \n"), "got {output}");
    }

    #[test]
    fn formats_expenses_one_per_line() {
        let expenses = [
            Expense {
                id: 1,
                user_id: UserID::new(1),
                description: "coffee".to_owned(),
                amount: 3.5,
                category: "food".to_owned(),
            },
            Expense {
                id: 2,
                user_id: UserID::new(1),
                description: "refund".to_owned(),
                amount: -12.0,
                category: "shopping".to_owned(),
            },
        ];

        assert_eq!(
            format_expense_list(&expenses),
            "coffee ($3.50) - food\nrefund ($-12.00) - shopping"
        );
    }

    #[test]
    fn capitalises_first_char() {
        assert_eq!(capitalise_first_char("you must log in"), "You must log in");
        assert_eq!(capitalise_first_char(""), "");
    }
}
